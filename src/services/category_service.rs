use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::category::Model as CategoryModel,
    errors::ServiceError,
    repositories::{
        category_repository::{CategoryPatch, NewCategory},
        CategoryRepository, PageRequest,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct CategoryService {
    categories: CategoryRepository,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            categories: CategoryRepository::new(db),
        }
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: CreateCategoryInput) -> Result<CategoryModel, ServiceError> {
        input.validate()?;

        let category = self
            .categories
            .create(NewCategory {
                title: input.title,
                description: input.description,
                image: input.image,
            })
            .await?;

        info!(category_id = %category.id, "category created");
        Ok(category)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<CategoryModel, ServiceError> {
        self.categories
            .update_by_id(
                id,
                CategoryPatch {
                    title: input.title,
                    description: input.description,
                    image: input.image,
                },
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<CategoryModel, ServiceError> {
        self.categories.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> Result<Vec<CategoryModel>, ServiceError> {
        self.categories.find_paged(page).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.categories.delete_by_id(id).await?;
        info!(category_id = %id, "category deleted");
        Ok(())
    }
}
