//! Reservation (advisory hold) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::reservation::{
        CreateReservation, Reservation, ReservationDetails, UpdateReservation,
    },
};

/// List all reservations
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    responses(
        (status = 200, description = "List of reservations", body = Vec<ReservationDetails>)
    )
)]
pub async fn list_reservations(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<ReservationDetails>>> {
    let reservations = state.services.reservations.list_reservations().await?;
    Ok(Json(reservations))
}

/// Get reservation by ID
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation record", body = Reservation),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.get_reservation(id).await?;
    Ok(Json(reservation))
}

/// Place a hold on a book. Holds do not affect copy availability.
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 404, description = "Member or book not found")
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    Json(reservation): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let created = state
        .services
        .reservations
        .create_reservation(reservation)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing reservation
#[utoipa::path(
    put,
    path = "/reservations/{id}",
    tag = "reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    request_body = UpdateReservation,
    responses(
        (status = 200, description = "Reservation updated", body = Reservation),
        (status = 404, description = "Reservation, member or book not found")
    )
)]
pub async fn update_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(reservation): Json<UpdateReservation>,
) -> AppResult<Json<Reservation>> {
    let updated = state
        .services
        .reservations
        .update_reservation(id, reservation)
        .await?;
    Ok(Json(updated))
}

/// Delete a reservation
#[utoipa::path(
    delete,
    path = "/reservations/{id}",
    tag = "reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn delete_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.reservations.delete_reservation(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
