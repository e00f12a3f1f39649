//! Reservation (advisory hold) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Reservation model from database.
///
/// Holds are advisory only: they carry no availability bookkeeping and may
/// exceed the number of available copies.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub reservation_date: NaiveDate,
}

/// Reservation with member and book display fields joined in
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationDetails {
    pub id: i32,
    pub member_id: i32,
    pub member_name: Option<String>,
    pub book_id: i32,
    pub book_title: Option<String>,
    pub reservation_date: NaiveDate,
}

/// Create reservation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservation {
    pub member_id: i32,
    pub book_id: i32,
    pub reservation_date: NaiveDate,
}

/// Update reservation request (full field replacement)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReservation {
    pub member_id: i32,
    pub book_id: i32,
    pub reservation_date: NaiveDate,
}
