pub mod brand;
pub mod category;
pub mod post;
pub mod product;
pub mod review;
pub mod user;

pub use brand::Entity as Brand;
pub use category::Entity as Category;
pub use post::Entity as Post;
pub use product::Entity as Product;
pub use review::Entity as Review;
pub use user::Entity as User;
