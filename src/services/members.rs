//! Member management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, UpdateMember},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get member by ID
    pub async fn get_member(&self, id: i32) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    /// List all members
    pub async fn list_members(&self) -> AppResult<Vec<Member>> {
        self.repository.members.list().await
    }

    /// Register a new member. Email must be unique.
    pub async fn create_member(&self, member: CreateMember) -> AppResult<Member> {
        member
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.members.email_exists(&member.email, None).await? {
            return Err(AppError::Validation(
                "A member with this email already exists".to_string(),
            ));
        }

        self.repository.members.create(&member).await
    }

    /// Update an existing member. Email uniqueness is re-checked.
    pub async fn update_member(&self, id: i32, member: UpdateMember) -> AppResult<Member> {
        member
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // Check if member exists
        self.repository.members.get_by_id(id).await?;

        if self
            .repository
            .members
            .email_exists(&member.email, Some(id))
            .await?
        {
            return Err(AppError::Validation(
                "A member with this email already exists".to_string(),
            ));
        }

        self.repository.members.update(id, &member).await
    }

    /// Delete a member. Refused while an open loan references it.
    pub async fn delete_member(&self, id: i32) -> AppResult<()> {
        self.repository.members.delete(id).await
    }
}
