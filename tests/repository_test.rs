//! Gateway-level checks against a migrated SQLite file, below the HTTP layer.

use std::sync::Arc;

use assert_matches::assert_matches;
use sea_orm::{Database, DatabaseConnection};
use storefront_api::{
    db,
    errors::ServiceError,
    repositories::{
        product_repository::{NewProduct, ProductPatch},
        review_repository::NewReview,
        user_repository::NewUser,
        PageRequest, ProductFacet, ProductFilter, ProductRepository, ReviewRepository,
        UserRepository,
    },
};
use tempfile::TempDir;
use uuid::Uuid;

async fn migrated_db() -> (Arc<DatabaseConnection>, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("repo.db").display());
    let conn = Database::connect(url).await.expect("connect sqlite");
    db::run_migrations(&conn).await.expect("migrate");
    (Arc::new(conn), dir)
}

fn product(name: &str, brand: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price: "10".to_string(),
        brand: brand.to_string(),
        description: "d".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn second_insert_with_same_name_conflicts_and_first_survives() {
    let (conn, _dir) = migrated_db().await;
    let products = ProductRepository::new(conn);

    let first = products.create(product("Shirt", "Acme")).await.expect("first insert");
    let err = products.create(product("Shirt", "Other")).await.unwrap_err();
    assert_matches!(err, ServiceError::AlreadyExists(ref msg) if msg == "product with that name already exists");

    let stored = products.find_by_id(first.id).await.expect("first still stored");
    assert_eq!(stored.brand, "Acme");
}

#[tokio::test]
async fn patch_touches_only_supplied_columns() {
    let (conn, _dir) = migrated_db().await;
    let products = ProductRepository::new(conn);
    let original = products.create(product("Cap", "Acme")).await.expect("insert");

    let updated = products
        .update_by_id(
            original.id,
            ProductPatch {
                price: Some("19.99".to_string()),
                brand: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.price, "19.99");
    assert_eq!(updated.brand, original.brand);
    assert_eq!(updated.name, original.name);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= original.updated_at);
}

#[tokio::test]
async fn paging_counts_and_facets() {
    let (conn, _dir) = migrated_db().await;
    let products = ProductRepository::new(conn);
    for n in 1..=15 {
        let brand = if n % 2 == 0 { "Even" } else { "Odd" };
        products
            .create(product(&format!("P{:02}", n), brand))
            .await
            .expect("insert");
    }

    let filter = ProductFilter::default();
    let second = products
        .find_paged(PageRequest::new(Some(2), Some(10)), &filter)
        .await
        .expect("page 2");
    let names: Vec<&str> = second.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["P11", "P12", "P13", "P14", "P15"]);

    let odd = ProductFilter {
        brand: Some("Odd".to_string()),
        ..Default::default()
    };
    assert_eq!(products.count(&odd).await.expect("count"), 8);

    let brands = products
        .distinct_values(ProductFacet::Brand)
        .await
        .expect("facets");
    assert_eq!(brands, ["Even", "Odd"]);
    let categories = products
        .distinct_values(ProductFacet::Category)
        .await
        .expect("facets");
    assert!(categories.is_empty());

    let empty = products
        .find_paged(PageRequest::new(Some(9), Some(10)), &filter)
        .await
        .expect("past the end");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn delete_then_find_is_not_found() {
    let (conn, _dir) = migrated_db().await;
    let products = ProductRepository::new(conn);
    let created = products.create(product("Scarf", "Acme")).await.expect("insert");

    products.delete_by_id(created.id).await.expect("delete");
    assert_matches!(products.find_by_id(created.id).await, Err(ServiceError::NotFound(_)));
    assert_matches!(products.delete_by_id(created.id).await, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn reviews_are_counted_per_product() {
    let (conn, _dir) = migrated_db().await;
    let products = ProductRepository::new(conn.clone());
    let reviews = ReviewRepository::new(conn.clone());
    let users = UserRepository::new(conn);

    let author = users
        .create(NewUser {
            name: "Reviewer".to_string(),
            email: "Reviewer@Example.com".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        })
        .await
        .expect("user");
    assert_eq!(author.email, "reviewer@example.com");

    let boots = products.create(product("Boots", "Trail")).await.expect("insert");
    let socks = products.create(product("Socks", "Trail")).await.expect("insert");

    for (name, product_id) in [("A", boots.id), ("B", boots.id), ("C", socks.id)] {
        reviews
            .create(NewReview {
                name: name.to_string(),
                rating: "4".to_string(),
                comment: "ok".to_string(),
                user_id: author.id,
                product_id,
            })
            .await
            .expect("review");
    }

    assert_eq!(reviews.count_for_product(boots.id).await.expect("count"), 2);
    assert_eq!(reviews.count_for_product(Uuid::new_v4()).await.expect("count"), 0);

    let scoped = reviews
        .find_paged(PageRequest::default(), Some(socks.id))
        .await
        .expect("scoped page");
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].name, "C");
}

#[tokio::test]
async fn store_refuses_reviews_that_point_nowhere() {
    let (conn, _dir) = migrated_db().await;
    let products = ProductRepository::new(conn.clone());
    let reviews = ReviewRepository::new(conn);

    let lamp = products.create(product("Lamp", "Lumen")).await.expect("insert");
    let review = |product_id| NewReview {
        name: "Bright".to_string(),
        rating: "5".to_string(),
        comment: "ok".to_string(),
        user_id: Uuid::new_v4(),
        product_id,
    };

    let err = reviews.create(review(Uuid::new_v4())).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
    assert_eq!(err.to_string(), ServiceError::not_found("product").to_string());

    reviews.create(review(lamp.id)).await.expect("review");
    let err = products.delete_by_id(lamp.id).await.unwrap_err();
    assert_matches!(err, ServiceError::AlreadyExists(ref msg) if msg == "product has reviews");
    assert_eq!(products.find_by_id(lamp.id).await.expect("still there").name, "Lamp");
}

#[tokio::test]
async fn emails_are_unique_case_insensitively() {
    let (conn, _dir) = migrated_db().await;
    let users = UserRepository::new(conn);
    let new_user = |email: &str| NewUser {
        name: "U".to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
    };

    users.create(new_user("sam@example.com")).await.expect("first");
    let err = users.create(new_user("SAM@example.com")).await.unwrap_err();
    assert_matches!(err, ServiceError::AlreadyExists(_));

    let found = users
        .find_by_email(" Sam@Example.com ")
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(found.email, "sam@example.com");
}
