use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{product::Model as ProductModel, review::Model as ReviewModel},
    errors::ServiceError,
    repositories::{
        product_repository::{NewProduct, ProductPatch},
        PageRequest, ProductFacet, ProductFilter, ProductRepository, ReviewRepository,
    },
};
use sea_orm::DatabaseConnection;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "price is required"))]
    #[schema(example = "19.99")]
    pub price: String,
    pub category: Option<String>,
    #[validate(length(min = 1, message = "brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub image: Option<String>,
    pub qty: Option<String>,
}

/// Every field optional; empty strings are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub qty: Option<String>,
}

/// One page of search results plus the catalog-wide facets
#[derive(Debug, Clone)]
pub struct ProductSearchResult {
    pub products: Vec<ProductModel>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Clone)]
pub struct ProductService {
    products: ProductRepository,
    reviews: ReviewRepository,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            reviews: ReviewRepository::new(db),
        }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateProductInput) -> Result<ProductModel, ServiceError> {
        input.validate()?;

        let product = self
            .products
            .create(NewProduct {
                name: input.name,
                price: input.price,
                category: input.category,
                brand: input.brand,
                description: input.description,
                image: input.image,
                qty: input.qty,
            })
            .await?;

        info!(product_id = %product.id, "product created");
        Ok(product)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<ProductModel, ServiceError> {
        let product = self
            .products
            .update_by_id(
                id,
                ProductPatch {
                    name: input.name,
                    price: input.price,
                    category: input.category,
                    brand: input.brand,
                    description: input.description,
                    image: input.image,
                    qty: input.qty,
                },
            )
            .await?;

        info!(product_id = %id, "product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<ProductModel, ServiceError> {
        self.products.find_by_id(id).await
    }

    /// Filtered page with a true total count and the brand/category facets
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        page: PageRequest,
        filter: ProductFilter,
    ) -> Result<ProductSearchResult, ServiceError> {
        let products = self.products.find_paged(page, &filter).await?;
        let total = self.products.count(&filter).await?;
        let brands = self.products.distinct_values(ProductFacet::Brand).await?;
        let categories = self.products.distinct_values(ProductFacet::Category).await?;

        Ok(ProductSearchResult {
            products,
            total,
            page: page.page,
            pages: page.page_count(total),
            brands,
            categories,
        })
    }

    /// Reviews attached to a product. Unknown products are a 404, not an empty page.
    #[instrument(skip(self))]
    pub async fn reviews(
        &self,
        product_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<ReviewModel>, ServiceError> {
        if !self.products.exists(product_id).await? {
            return Err(ServiceError::not_found("product"));
        }
        self.reviews.find_paged(page, Some(product_id)).await
    }

    /// Hard delete; refused while reviews still reference the product
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let review_count = self.reviews.count_for_product(id).await?;
        if review_count > 0 {
            warn!(product_id = %id, review_count, "refusing to orphan reviews");
            return Err(ServiceError::AlreadyExists("product has reviews".to_string()));
        }

        self.products.delete_by_id(id).await?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }
}
