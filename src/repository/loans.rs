//! Loans repository: availability bookkeeping and the loan state machine.
//!
//! Every operation that touches a book's `available_copies` runs in a single
//! transaction with the loan row change, so no partial mutation is observable
//! after a failure. Creation uses an atomic conditional decrement; edits take
//! a row lock on the loan before deciding the state transition.

use chrono::{NaiveDate, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult, EntityKind},
    models::loan::{default_due_date, CreateLoan, Loan, LoanDetails, LoanState, UpdateLoan},
};

/// Deletion guard: true iff an open loan references the member.
///
/// Takes an executor so callers can evaluate the predicate inside their own
/// delete transaction; the result is never cached.
pub async fn member_has_open_loans<'e, E>(executor: E, member_id: i32) -> AppResult<bool>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM loans WHERE member_id = $1 AND state = $2)",
    )
    .bind(member_id)
    .bind(LoanState::Open)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}

/// Deletion guard: true iff an open loan references the book.
pub async fn book_has_open_loans<'e, E>(executor: E, book_id: i32) -> AppResult<bool>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM loans WHERE book_id = $1 AND state = $2)",
    )
    .bind(book_id)
    .bind(LoanState::Open)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound {
                kind: EntityKind::Loan,
                id,
            })
    }

    /// Create a new loan (borrow one copy of a book).
    ///
    /// The availability decrement is a conditional update checked by affected
    /// rows, in the same transaction as the insert: two concurrent creates
    /// against a book with one available copy cannot both succeed.
    pub async fn create(&self, loan: &CreateLoan) -> AppResult<Loan> {
        let due_date = loan
            .due_date
            .unwrap_or_else(|| default_due_date(loan.loan_date));

        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1 WHERE id = $1 AND available_copies > 0",
        )
        .bind(loan.book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                    .bind(loan.book_id)
                    .fetch_one(&mut *tx)
                    .await?;

            return Err(if exists {
                AppError::Unavailable {
                    book_id: loan.book_id,
                }
            } else {
                AppError::NotFound {
                    kind: EntityKind::Book,
                    id: loan.book_id,
                }
            });
        }

        let created = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (member_id, book_id, loan_date, due_date, state)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(loan.member_id)
        .bind(loan.book_id)
        .bind(loan.loan_date)
        .bind(due_date)
        .bind(LoanState::Open)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Update an existing loan.
    ///
    /// The current row is locked before the transition is decided. Open to
    /// Returned releases one copy back to the book the loan was holding
    /// (capped at the total); reopening a returned loan is rejected. A change
    /// of book reference never moves the availability decrement.
    pub async fn update(&self, id: i32, loan: &UpdateLoan) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound {
                kind: EntityKind::Loan,
                id,
            })?;

        if current.state == LoanState::Returned && loan.state == LoanState::Open {
            return Err(AppError::Validation(
                "Reopening a returned loan is not supported".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET member_id = $1,
                book_id = $2,
                loan_date = $3,
                due_date = $4,
                state = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(loan.member_id)
        .bind(loan.book_id)
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .bind(loan.state)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if current.state == LoanState::Open && loan.state == LoanState::Returned {
            // The copy comes back to the book it was borrowed from, even if
            // the same edit also changed the book reference.
            sqlx::query(
                "UPDATE books SET available_copies = LEAST(available_copies + 1, total_copies) WHERE id = $1",
            )
            .bind(current.book_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a loan.
    ///
    /// Deleting an open loan rolls back its availability decrement in the
    /// same transaction; deleting a returned loan only removes the record.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("DELETE FROM loans WHERE id = $1 RETURNING book_id, state")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound {
                kind: EntityKind::Loan,
                id,
            })?;

        if row.get::<LoanState, _>("state") == LoanState::Open {
            sqlx::query(
                "UPDATE books SET available_copies = LEAST(available_copies + 1, total_copies) WHERE id = $1",
            )
            .bind(row.get::<i32, _>("book_id"))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// List all loans with member and book display fields
    pub async fn list(&self) -> AppResult<Vec<LoanDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.member_id, l.book_id, l.loan_date, l.due_date, l.state,
                   m.first_name, m.last_name, b.title
            FROM loans l
            LEFT JOIN members m ON l.member_id = m.id
            LEFT JOIN books b ON l.book_id = b.id
            ORDER BY l.loan_date DESC, l.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(Self::details_from_rows(rows))
    }

    /// List loans for a member
    pub async fn list_by_member(&self, member_id: i32) -> AppResult<Vec<LoanDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.member_id, l.book_id, l.loan_date, l.due_date, l.state,
                   m.first_name, m.last_name, b.title
            FROM loans l
            LEFT JOIN members m ON l.member_id = m.id
            LEFT JOIN books b ON l.book_id = b.id
            WHERE l.member_id = $1
            ORDER BY l.loan_date DESC, l.id DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Self::details_from_rows(rows))
    }

    /// List loans for a book
    pub async fn list_by_book(&self, book_id: i32) -> AppResult<Vec<LoanDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.member_id, l.book_id, l.loan_date, l.due_date, l.state,
                   m.first_name, m.last_name, b.title
            FROM loans l
            LEFT JOIN members m ON l.member_id = m.id
            LEFT JOIN books b ON l.book_id = b.id
            WHERE l.book_id = $1
            ORDER BY l.loan_date DESC, l.id DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Self::details_from_rows(rows))
    }

    /// List the most recent loans
    pub async fn list_recent(&self, limit: i64) -> AppResult<Vec<LoanDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.member_id, l.book_id, l.loan_date, l.due_date, l.state,
                   m.first_name, m.last_name, b.title
            FROM loans l
            LEFT JOIN members m ON l.member_id = m.id
            LEFT JOIN books b ON l.book_id = b.id
            ORDER BY l.loan_date DESC, l.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(Self::details_from_rows(rows))
    }

    fn details_from_rows(rows: Vec<PgRow>) -> Vec<LoanDetails> {
        let today = Utc::now().date_naive();
        rows.iter().map(|row| Self::details_from_row(row, today)).collect()
    }

    fn details_from_row(row: &PgRow, today: NaiveDate) -> LoanDetails {
        let state: LoanState = row.get("state");
        let due_date: NaiveDate = row.get("due_date");

        let first_name: Option<String> = row.get("first_name");
        let last_name: Option<String> = row.get("last_name");
        let member_name = match (first_name, last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        };

        LoanDetails {
            id: row.get("id"),
            member_id: row.get("member_id"),
            member_name,
            book_id: row.get("book_id"),
            book_title: row.get("title"),
            loan_date: row.get("loan_date"),
            due_date,
            state,
            is_overdue: state == LoanState::Open && due_date < today,
        }
    }
}
