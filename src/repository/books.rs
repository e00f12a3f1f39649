//! Books repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult, EntityKind},
    models::book::{copies_on_loan, recompute_available, Book, CreateBook, UpdateBook},
    repository::loans,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound {
                kind: EntityKind::Book,
                id,
            })
    }

    /// List all books
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// List the most recently added books
    pub async fn list_recent(&self, limit: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id DESC LIMIT $1")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Check if ISBN already exists
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new book. All copies start available.
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, category, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.category)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an existing book.
    ///
    /// The copy counters are recomputed under a row lock so a concurrent loan
    /// cannot slip between the read and the write: the count of copies on
    /// loan is preserved and availability is clamped at zero.
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT total_copies, available_copies FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound {
            kind: EntityKind::Book,
            id,
        })?;

        let on_loan = copies_on_loan(row.get("total_copies"), row.get("available_copies"));
        let available = recompute_available(book.total_copies, on_loan);

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1,
                author = $2,
                isbn = $3,
                category = $4,
                total_copies = $5,
                available_copies = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.category)
        .bind(book.total_copies)
        .bind(available)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a book.
    ///
    /// The deletion guard runs inside the delete transaction: a book with an
    /// open loan cannot be removed. Returned loans do not block deletion.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        if loans::book_has_open_loans(&mut *tx, id).await? {
            return Err(AppError::Conflict {
                kind: EntityKind::Book,
                id,
            });
        }

        let affected = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound {
                kind: EntityKind::Book,
                id,
            });
        }

        tx.commit().await?;
        Ok(())
    }
}
