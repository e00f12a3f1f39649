//! Reservations repository for database operations

use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult, EntityKind},
    models::reservation::{
        CreateReservation, Reservation, ReservationDetails, UpdateReservation,
    },
};

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound {
                kind: EntityKind::Reservation,
                id,
            })
    }

    /// List all reservations with member and book display fields
    pub async fn list(&self) -> AppResult<Vec<ReservationDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.member_id, r.book_id, r.reservation_date,
                   m.first_name, m.last_name, b.title
            FROM reservations r
            LEFT JOIN members m ON r.member_id = m.id
            LEFT JOIN books b ON r.book_id = b.id
            ORDER BY r.reservation_date DESC, r.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::details_from_row).collect())
    }

    /// Create a new reservation
    pub async fn create(&self, reservation: &CreateReservation) -> AppResult<Reservation> {
        let created = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (member_id, book_id, reservation_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(reservation.member_id)
        .bind(reservation.book_id)
        .bind(reservation.reservation_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an existing reservation
    pub async fn update(&self, id: i32, reservation: &UpdateReservation) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET member_id = $1,
                book_id = $2,
                reservation_date = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(reservation.member_id)
        .bind(reservation.book_id)
        .bind(reservation.reservation_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound {
            kind: EntityKind::Reservation,
            id,
        })
    }

    /// Delete a reservation
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let affected = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound {
                kind: EntityKind::Reservation,
                id,
            });
        }

        Ok(())
    }

    fn details_from_row(row: &PgRow) -> ReservationDetails {
        let first_name: Option<String> = row.get("first_name");
        let last_name: Option<String> = row.get("last_name");
        let member_name = match (first_name, last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        };

        ReservationDetails {
            id: row.get("id"),
            member_id: row.get("member_id"),
            member_name,
            book_id: row.get("book_id"),
            book_title: row.get("title"),
            reservation_date: row.get("reservation_date"),
        }
    }
}
