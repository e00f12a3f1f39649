//! Reservation management service

use crate::{
    error::AppResult,
    models::reservation::{
        CreateReservation, Reservation, ReservationDetails, UpdateReservation,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get reservation by ID
    pub async fn get_reservation(&self, id: i32) -> AppResult<Reservation> {
        self.repository.reservations.get_by_id(id).await
    }

    /// List all reservations
    pub async fn list_reservations(&self) -> AppResult<Vec<ReservationDetails>> {
        self.repository.reservations.list().await
    }

    /// Place a hold on a book. Holds are advisory: availability is not
    /// checked and not modified.
    pub async fn create_reservation(
        &self,
        reservation: CreateReservation,
    ) -> AppResult<Reservation> {
        // Verify member and book exist
        self.repository
            .members
            .get_by_id(reservation.member_id)
            .await?;
        self.repository.books.get_by_id(reservation.book_id).await?;
        self.repository.reservations.create(&reservation).await
    }

    /// Update an existing reservation, re-validating the references
    pub async fn update_reservation(
        &self,
        id: i32,
        reservation: UpdateReservation,
    ) -> AppResult<Reservation> {
        self.repository
            .members
            .get_by_id(reservation.member_id)
            .await?;
        self.repository.books.get_by_id(reservation.book_id).await?;
        self.repository.reservations.update(id, &reservation).await
    }

    /// Delete a reservation
    pub async fn delete_reservation(&self, id: i32) -> AppResult<()> {
        self.repository.reservations.delete(id).await
    }
}
