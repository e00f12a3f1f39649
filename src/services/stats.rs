//! Statistics service

use crate::{
    api::stats::{StatsResponse, StatsTotals},
    error::AppResult,
    models::loan::LoanState,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get dashboard statistics: entity totals plus the most recent loans
    /// and catalog additions
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let pool = &self.repository.pool;

        let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(pool)
            .await?;

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(pool)
            .await?;

        let open_loans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE state = $1")
            .bind(LoanState::Open)
            .fetch_one(pool)
            .await?;

        let overdue_loans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE state = $1 AND due_date < CURRENT_DATE",
        )
        .bind(LoanState::Open)
        .fetch_one(pool)
        .await?;

        let reservations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(pool)
            .await?;

        let recent_loans = self.repository.loans.list_recent(5).await?;
        let recent_books = self.repository.books.list_recent(5).await?;

        Ok(StatsResponse {
            totals: StatsTotals {
                members,
                books,
                open_loans,
                overdue_loans,
                reservations,
            },
            recent_loans,
            recent_books,
        })
    }
}
