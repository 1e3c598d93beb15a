use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::password::{burn_verification_cost, hash_password, verify_password},
    entities::user::Model as UserModel,
    errors::ServiceError,
    repositories::{user_repository::NewUser, UserRepository},
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUserInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginInput {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            users: UserRepository::new(db),
        }
    }

    /// Registers a new account. Emails are unique case-insensitively.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterUserInput) -> Result<UserModel, ServiceError> {
        input.validate()?;
        if input.password != input.password_confirm {
            return Err(ServiceError::ValidationError("passwords do not match".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .users
            .create(NewUser {
                name: input.name,
                email: input.email.trim().to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<UserModel, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    /// Unknown email and wrong password fail identically, in message and in cost.
    #[instrument(skip(self, input))]
    pub async fn verify_credentials(&self, input: LoginInput) -> Result<UserModel, ServiceError> {
        input.validate()?;

        let Some(user) = self.users.find_by_email(&input.email).await? else {
            burn_verification_cost(&input.password);
            warn!("login attempt for unknown email");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&input.password, &user.password)? {
            warn!(user_id = %user.id, "login attempt with wrong password");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }
}
