//! Catalog (book title) management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// List all books
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Add a new title to the catalog. ISBN must be unique.
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Validation(
                "A book with this ISBN already exists".to_string(),
            ));
        }

        self.repository.books.create(&book).await
    }

    /// Update an existing book. ISBN uniqueness is re-checked; the copy
    /// counters follow the recompute rule in the repository.
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // Check if book exists
        self.repository.books.get_by_id(id).await?;

        if self
            .repository
            .books
            .isbn_exists(&book.isbn, Some(id))
            .await?
        {
            return Err(AppError::Validation(
                "A book with this ISBN already exists".to_string(),
            ));
        }

        self.repository.books.update(id, &book).await
    }

    /// Delete a book. Refused while an open loan references it.
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}
