pub mod auth;
pub mod brands;
pub mod categories;
pub mod common;
pub mod posts;
pub mod products;
pub mod reviews;
pub mod users;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::services::{
    BrandService, CategoryService, PostService, ProductService, ReviewService, UserService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub categories: Arc<CategoryService>,
    pub brands: Arc<BrandService>,
    pub reviews: Arc<ReviewService>,
    pub posts: Arc<PostService>,
    pub users: Arc<UserService>,
}

impl AppServices {
    /// Builds every resource service over one shared connection pool
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            products: Arc::new(ProductService::new(db.clone())),
            categories: Arc::new(CategoryService::new(db.clone())),
            brands: Arc::new(BrandService::new(db.clone())),
            reviews: Arc::new(ReviewService::new(db.clone())),
            posts: Arc::new(PostService::new(db.clone())),
            users: Arc::new(UserService::new(db)),
        }
    }
}
