// Catalog
pub mod brand_service;
pub mod category_service;
pub mod product_service;
pub mod review_service;

// Content and accounts
pub mod post_service;
pub mod user_service;

pub use brand_service::BrandService;
pub use category_service::CategoryService;
pub use post_service::PostService;
pub use product_service::ProductService;
pub use review_service::ReviewService;
pub use user_service::UserService;
