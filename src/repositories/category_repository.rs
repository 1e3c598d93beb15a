use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::category::{ActiveModel, Column, Entity as Category, Model as CategoryModel};
use crate::errors::ServiceError;

use super::{
    changed_fields, read_back, storage_error, timestamp_now, write_error, BaseRepository,
    PageRequest, Repository,
};

const RESOURCE: &str = "category";
const UNIQUE_FIELD: &str = "title";

#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Gateway over the `categories` collection
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, input: NewCategory) -> Result<CategoryModel, ServiceError> {
        let id = Uuid::new_v4();
        let now = timestamp_now();

        let model = ActiveModel {
            id: Set(id),
            title: Set(input.title),
            description: Set(input.description),
            image: Set(input.image),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Category::insert(model)
            .exec(self.base.get_db())
            .await
            .map_err(|e| write_error(e, RESOURCE, UNIQUE_FIELD))?;

        read_back(self.find_by_id(id).await, RESOURCE, id)
    }

    pub async fn update_by_id(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<CategoryModel, ServiceError> {
        let fields = changed_fields(vec![
            (Column::Title, patch.title),
            (Column::Description, patch.description),
            (Column::Image, patch.image),
        ]);

        let mut update = Category::update_many()
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

    pub async fn find_by_id(&self, id: Uuid) -> Result<CategoryModel, ServiceError> {
        Category::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(storage_error)?
            .ok_or_else(|| ServiceError::not_found(RESOURCE))
    }

    pub async fn find_paged(&self, page: PageRequest) -> Result<Vec<CategoryModel>, ServiceError> {
        let Some(offset) = page.offset() else {
            return Ok(Vec::new());
        };
        Category::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .offset(offset)
            .limit(page.limit)
            .all(self.base.get_db())
            .await
            .map_err(storage_error)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = Category::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(storage_error)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found(RESOURCE));
        }
        Ok(())
    }
}
