//! Members repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, EntityKind},
    models::member::{CreateMember, Member, UpdateMember},
    repository::loans,
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound {
                kind: EntityKind::Member,
                id,
            })
    }

    /// List all members
    pub async fn list(&self) -> AppResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(
            "SELECT * FROM members ORDER BY first_name, last_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM members WHERE LOWER(email) = LOWER($1) AND id != $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM members WHERE LOWER(email) = LOWER($1))",
            )
            .bind(email)
            .fetch_one(&self.pool)
            .await?
        };
        Ok(exists)
    }

    /// Create a new member
    pub async fn create(&self, member: &CreateMember) -> AppResult<Member> {
        let created = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (first_name, last_name, email, address, birth_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(&member.email)
        .bind(&member.address)
        .bind(member.birth_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an existing member
    pub async fn update(&self, id: i32, member: &UpdateMember) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            UPDATE members
            SET first_name = $1,
                last_name = $2,
                email = $3,
                address = $4,
                birth_date = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(&member.email)
        .bind(&member.address)
        .bind(member.birth_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound {
            kind: EntityKind::Member,
            id,
        })
    }

    /// Delete a member.
    ///
    /// The deletion guard runs inside the delete transaction: a member with an
    /// open loan cannot be removed. Returned loans do not block deletion.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        if loans::member_has_open_loans(&mut *tx, id).await? {
            return Err(AppError::Conflict {
                kind: EntityKind::Member,
                id,
            });
        }

        let affected = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound {
                kind: EntityKind::Member,
                id,
            });
        }

        tx.commit().await?;
        Ok(())
    }
}
