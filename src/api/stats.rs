//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{book::Book, loan::LoanDetails},
};

/// Entity totals for the dashboard
#[derive(Serialize, ToSchema)]
pub struct StatsTotals {
    pub members: i64,
    pub books: i64,
    pub open_loans: i64,
    pub overdue_loans: i64,
    pub reservations: i64,
}

/// Dashboard statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    pub totals: StatsTotals,
    /// Most recent loans, joined for display
    pub recent_loans: Vec<LoanDetails>,
    /// Most recently catalogued books
    pub recent_books: Vec<Book>,
}

/// Get dashboard statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
