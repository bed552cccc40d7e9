//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Input policy and "not found" canonicalization only;
//! storage concerns stay in the repository.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use crate::domain::{CreateUser, UpdateUser, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;

const MSG_CREATE_FIELDS_REQUIRED: &str = "Name and email are required";
const MSG_UPDATE_FIELDS_REQUIRED: &str = "At least one of name or email must be provided";

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user; both name and email must be non-empty
    async fn create_user(&self, input: CreateUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: i64) -> AppResult<User>;

    /// List all users ordered by ID
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Replace the non-empty fields of `input`
    async fn update_user(&self, id: i64, input: UpdateUser) -> AppResult<User>;

    /// Delete user by ID
    async fn delete_user(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        input
            .validate()
            .map_err(|_| AppError::validation(MSG_CREATE_FIELDS_REQUIRED))?;

        let user = self.repo.create(input).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn update_user(&self, id: i64, input: UpdateUser) -> AppResult<User> {
        if !input.has_changes() {
            // An unknown ID is reported as such even when the payload is empty.
            self.repo.find_by_id(id).await?.ok_or_not_found()?;
            return Err(AppError::validation(MSG_UPDATE_FIELDS_REQUIRED));
        }

        let user = self.repo.update(id, input).await?.ok_or_not_found()?;
        tracing::info!(user_id = id, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::eq;
    use sea_orm::DbErr;

    fn create_test_user(id: i64) -> User {
        User {
            id,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    fn service(repo: MockUserRepository) -> UserManager {
        UserManager::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|input| {
                Ok(User {
                    name: input.name,
                    email: input.email,
                    ..create_test_user(1)
                })
            });

        let user = service(repo)
            .create_user(CreateUser::new("Jane", "jane@example.com"))
            .await
            .unwrap();

        assert_eq!(user.name, "Jane");
        assert_eq!(user.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_create_user_rejects_empty_fields_without_store_call() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();
        let service = service(repo);

        let result = service.create_user(CreateUser::new("", "a@b.c")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service.create_user(CreateUser::new("Jane", "")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(7))
            .returning(|id| Ok(Some(create_test_user(id))));

        let user = service(repo).get_user(7).await.unwrap();
        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repo).get_user(7).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_user_store_error_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(AppError::Database(DbErr::Custom("down".into()))));

        let result = service(repo).get_user(7).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_list_users_delegates() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .returning(|| Ok(vec![create_test_user(1), create_test_user(2)]));

        let users = service(repo).list_users().await.unwrap();
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_update_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .with(
                eq(3),
                eq(UpdateUser {
                    name: Some("Renamed".to_string()),
                    email: None,
                }),
            )
            .returning(|id, changes| {
                Ok(Some(User {
                    name: changes.name.unwrap_or_default(),
                    ..create_test_user(id)
                }))
            });

        let user = service(repo)
            .update_user(
                3,
                UpdateUser {
                    name: Some("Renamed".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(user.name, "Renamed");
        assert_eq!(user.email, "test@example.com");
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_update().returning(|_, _| Ok(None));

        let result = service(repo)
            .update_user(
                3,
                UpdateUser {
                    name: Some("Renamed".to_string()),
                    email: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_user_empty_payload_on_existing_user_is_invalid() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(create_test_user(id))));
        repo.expect_update().never();

        let result = service(repo)
            .update_user(
                3,
                UpdateUser {
                    name: Some(String::new()),
                    email: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_user_empty_payload_on_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let result = service(repo).update_user(3, UpdateUser::default()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().with(eq(4)).times(1).returning(|_| Ok(true));

        assert!(service(repo).delete_user(4).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Ok(false));
        repo.expect_find_by_id().never();

        let result = service(repo).delete_user(4).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
