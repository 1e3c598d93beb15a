use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::review::Model as ReviewModel,
    errors::ServiceError,
    repositories::{
        review_repository::{NewReview, ReviewPatch},
        PageRequest, ProductRepository, ReviewRepository,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReviewInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "rating is required"))]
    #[schema(example = "5")]
    pub rating: String,
    #[validate(length(min = 1, message = "comment is required"))]
    pub comment: String,
    /// Id of an existing product
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewInput {
    pub name: Option<String>,
    pub rating: Option<String>,
    pub comment: Option<String>,
}

#[derive(Clone)]
pub struct ReviewService {
    reviews: ReviewRepository,
    products: ProductRepository,
}

impl ReviewService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            reviews: ReviewRepository::new(db.clone()),
            products: ProductRepository::new(db),
        }
    }

    /// Creates a review authored by `user_id`. The referenced product must exist.
    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateReviewInput,
    ) -> Result<ReviewModel, ServiceError> {
        input.validate()?;

        // Malformed ids can never resolve, so they get the same answer as unknown ones
        let product_id = Uuid::parse_str(input.product_id.trim())
            .map_err(|_| ServiceError::not_found("product"))?;
        if !self.products.exists(product_id).await? {
            warn!("review references an unknown product");
            return Err(ServiceError::not_found("product"));
        }

        let review = self
            .reviews
            .create(NewReview {
                name: input.name,
                rating: input.rating,
                comment: input.comment,
                user_id,
                product_id,
            })
            .await?;

        info!(review_id = %review.id, "review created");
        Ok(review)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateReviewInput) -> Result<ReviewModel, ServiceError> {
        self.reviews
            .update_by_id(
                id,
                ReviewPatch {
                    name: input.name,
                    rating: input.rating,
                    comment: input.comment,
                },
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<ReviewModel, ServiceError> {
        self.reviews.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> Result<Vec<ReviewModel>, ServiceError> {
        self.reviews.find_paged(page, None).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.reviews.delete_by_id(id).await?;
        info!(review_id = %id, "review deleted");
        Ok(())
    }
}
