//! Loan ledger endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanDetails, UpdateLoan},
};

/// List all loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "List of loans", body = Vec<LoanDetails>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list_loans().await?;
    Ok(Json(loans))
}

/// Get loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan record", body = Loan),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.get_loan(id).await?;
    Ok(Json(loan))
}

/// Get loans for a specific member
#[utoipa::path(
    get,
    path = "/members/{id}/loans",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member's loans", body = Vec<LoanDetails>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member_loans(
    State(state): State<crate::AppState>,
    Path(member_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.get_member_loans(member_id).await?;
    Ok(Json(loans))
}

/// Get loans for a specific book
#[utoipa::path(
    get,
    path = "/books/{id}/loans",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Loans of this book", body = Vec<LoanDetails>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_loans(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.get_book_loans(book_id).await?;
    Ok(Json(loans))
}

/// Create a new loan (borrow a copy of a book)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 404, description = "Member or book not found"),
        (status = 422, description = "No available copies")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(loan): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let created = state.services.loans.create_loan(loan).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing loan. Marking an open loan as returned releases one
/// copy back to the book.
#[utoipa::path(
    put,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan updated", body = Loan),
        (status = 400, description = "Unsupported state transition"),
        (status = 404, description = "Loan, member or book not found")
    )
)]
pub async fn update_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(loan): Json<UpdateLoan>,
) -> AppResult<Json<Loan>> {
    let updated = state.services.loans.update_loan(id, loan).await?;
    Ok(Json(updated))
}

/// Delete a loan. Deleting an open loan restores the book's availability.
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.loans.delete_loan(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
