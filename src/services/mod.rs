//! Business logic services

pub mod catalog;
pub mod loans;
pub mod members;
pub mod reservations;
pub mod stats;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub members: members::MembersService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub reservations: reservations::ReservationsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            members: members::MembersService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
