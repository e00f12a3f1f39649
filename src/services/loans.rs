//! Loan ledger service

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanDetails, UpdateLoan},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get loan by ID
    pub async fn get_loan(&self, id: i32) -> AppResult<Loan> {
        self.repository.loans.get_by_id(id).await
    }

    /// List all loans
    pub async fn list_loans(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list().await
    }

    /// Get loans for a member
    pub async fn get_member_loans(&self, member_id: i32) -> AppResult<Vec<LoanDetails>> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;
        self.repository.loans.list_by_member(member_id).await
    }

    /// Get loans for a book
    pub async fn get_book_loans(&self, book_id: i32) -> AppResult<Vec<LoanDetails>> {
        // Verify book exists
        self.repository.books.get_by_id(book_id).await?;
        self.repository.loans.list_by_book(book_id).await
    }

    /// Create a new loan (borrow a copy of a book)
    pub async fn create_loan(&self, loan: CreateLoan) -> AppResult<Loan> {
        // Verify member and book exist
        self.repository.members.get_by_id(loan.member_id).await?;
        self.repository.books.get_by_id(loan.book_id).await?;
        self.repository.loans.create(&loan).await
    }

    /// Update a loan, applying the availability transition when the state
    /// moves from open to returned
    pub async fn update_loan(&self, id: i32, loan: UpdateLoan) -> AppResult<Loan> {
        // Verify the referenced member and book exist
        self.repository.members.get_by_id(loan.member_id).await?;
        self.repository.books.get_by_id(loan.book_id).await?;
        self.repository.loans.update(id, &loan).await
    }

    /// Delete a loan, rolling back its availability decrement if still open
    pub async fn delete_loan(&self, id: i32) -> AppResult<()> {
        self.repository.loans.delete(id).await
    }
}
