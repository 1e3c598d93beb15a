use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::user::{self, ActiveModel, Column, Entity as User, Model as UserModel};
use crate::errors::ServiceError;

use super::{read_back, storage_error, timestamp_now, write_error, BaseRepository, Repository};

const RESOURCE: &str = "user";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Already hashed
    pub password_hash: String,
}

/// Gateway over the `users` collection
#[derive(Debug, Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, input: NewUser) -> Result<UserModel, ServiceError> {
        let id = Uuid::new_v4();
        let now = timestamp_now();

        let model = ActiveModel {
            id: Set(id),
            name: Set(input.name),
            email: Set(input.email.to_lowercase()),
            password: Set(input.password_hash),
            role: Set(user::DEFAULT_ROLE.to_string()),
            verified: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        User::insert(model)
            .exec(self.base.get_db())
            .await
            .map_err(|e| write_error(e, RESOURCE, "email"))?;

        let created = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(RESOURCE));
        read_back(created, RESOURCE, id)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserModel>, ServiceError> {
        User::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(storage_error)
    }

    /// Case-insensitive lookup; emails are stored lowercased
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, ServiceError> {
        User::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(self.base.get_db())
            .await
            .map_err(storage_error)
    }
}
