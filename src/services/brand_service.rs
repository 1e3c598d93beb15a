use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::brand::Model as BrandModel,
    errors::ServiceError,
    repositories::{
        brand_repository::{BrandPatch, NewBrand},
        BrandRepository, PageRequest,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBrandInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBrandInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Brands are free-standing catalog labels; products reference them by title only.
#[derive(Clone)]
pub struct BrandService {
    brands: BrandRepository,
}

impl BrandService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            brands: BrandRepository::new(db),
        }
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: CreateBrandInput) -> Result<BrandModel, ServiceError> {
        input.validate()?;

        let brand = self
            .brands
            .create(NewBrand {
                title: input.title,
                description: input.description,
                image: input.image,
            })
            .await?;

        info!(brand_id = %brand.id, "brand created");
        Ok(brand)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateBrandInput) -> Result<BrandModel, ServiceError> {
        let patch = BrandPatch {
            title: input.title,
            description: input.description,
            image: input.image,
        };
        self.brands.update_by_id(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<BrandModel, ServiceError> {
        self.brands.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> Result<Vec<BrandModel>, ServiceError> {
        self.brands.find_paged(page).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.brands.delete_by_id(id).await?;
        info!(brand_id = %id, "brand deleted");
        Ok(())
    }
}
