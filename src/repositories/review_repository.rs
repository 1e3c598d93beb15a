use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::review::{ActiveModel, Column, Entity as Review, Model as ReviewModel};
use crate::errors::ServiceError;

use super::{
    changed_fields, is_reference_violation, read_back, storage_error, timestamp_now, write_error,
    BaseRepository, PageRequest, Repository,
};

const RESOURCE: &str = "review";
const UNIQUE_FIELD: &str = "name";

#[derive(Debug, Clone)]
pub struct NewReview {
    pub name: String,
    pub rating: String,
    pub comment: String,
    pub user_id: Uuid,
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub name: Option<String>,
    pub rating: Option<String>,
    pub comment: Option<String>,
}

/// Gateway over the `reviews` collection
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, input: NewReview) -> Result<ReviewModel, ServiceError> {
        let id = Uuid::new_v4();
        let now = timestamp_now();

        let model = ActiveModel {
            id: Set(id),
            name: Set(input.name),
            rating: Set(input.rating),
            comment: Set(input.comment),
            user_id: Set(input.user_id),
            product_id: Set(input.product_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Review::insert(model)
            .exec(self.base.get_db())
            .await
            .map_err(|e| {
                if is_reference_violation(&e) {
                    ServiceError::not_found("product")
                } else {
                    write_error(e, RESOURCE, UNIQUE_FIELD)
                }
            })?;

        read_back(self.find_by_id(id).await, RESOURCE, id)
    }

    pub async fn update_by_id(
        &self,
        id: Uuid,
        patch: ReviewPatch,
    ) -> Result<ReviewModel, ServiceError> {
        let fields = changed_fields(vec![
            (Column::Name, patch.name),
            (Column::Rating, patch.rating),
            (Column::Comment, patch.comment),
        ]);

        let mut update = Review::update_many()
            .col_expr(Column::UpdatedAt, Expr::value(timestamp_now()))
            .filter(Column::Id.eq(id));
        for (column, value) in fields {
            update = update.col_expr(column, Expr::value(value));
        }

        let result = update
            .exec(self.base.get_db())
            .await
            .map_err(|e| write_error(e, RESOURCE, UNIQUE_FIELD))?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found(RESOURCE));
        }

        self.find_by_id(id).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<ReviewModel, ServiceError> {
        Review::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(storage_error)?
            .ok_or_else(|| ServiceError::not_found(RESOURCE))
    }

    /// Reviews in insertion order, optionally restricted to one product
    pub async fn find_paged(
        &self,
        page: PageRequest,
        product_id: Option<Uuid>,
    ) -> Result<Vec<ReviewModel>, ServiceError> {
        let Some(offset) = page.offset() else {
            return Ok(Vec::new());
        };
        Review::find()
            .filter(Self::product_condition(product_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .offset(offset)
            .limit(page.limit)
            .all(self.base.get_db())
            .await
            .map_err(storage_error)
    }

    pub async fn count_for_product(&self, product_id: Uuid) -> Result<u64, ServiceError> {
        Review::find()
            .filter(Self::product_condition(Some(product_id)))
            .count(self.base.get_db())
            .await
            .map_err(storage_error)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = Review::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(storage_error)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found(RESOURCE));
        }
        Ok(())
    }

    fn product_condition(product_id: Option<Uuid>) -> Condition {
        match product_id {
            Some(id) => Condition::all().add(Column::ProductId.eq(id)),
            None => Condition::all(),
        }
    }
}
