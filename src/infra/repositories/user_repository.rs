//! User repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{CreateUser, UpdateUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Absence is reported through `None` / `false`, never as an error.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, stamping the creation time
    async fn create(&self, input: CreateUser) -> AppResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// List all users ordered by ID ascending
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Overwrite the non-empty fields of `changes` in one statement.
    /// Returns `None` when no row has this ID.
    async fn update(&self, id: i64, changes: UpdateUser) -> AppResult<Option<User>>;

    /// Delete user by ID, returning whether a row was removed
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance on a shared pool
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, input: CreateUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(input.name),
            email: Set(input.email),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(User::from(model))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(User::from))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn update(&self, id: i64, changes: UpdateUser) -> AppResult<Option<User>> {
        let changes = changes.normalized();
        if !changes.has_changes() {
            return self.find_by_id(id).await;
        }

        // Only columns marked Set appear in the UPDATE; RETURNING yields the merged row.
        let active = ActiveModel {
            id: Unchanged(id),
            name: changes.name.map_or(NotSet, Set),
            email: changes.email.map_or(NotSet, Set),
            created_at: NotSet,
        };

        match active.update(self.db.as_ref()).await {
            Ok(model) => Ok(Some(User::from(model))),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Ok(None),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(result.rows_affected > 0)
    }
}
