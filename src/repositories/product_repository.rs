use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::entities::product::{ActiveModel, Column, Entity as Product, Model as ProductModel};
use crate::errors::ServiceError;

use super::{
    changed_fields, is_reference_violation, read_back, storage_error, timestamp_now, write_error,
    BaseRepository, PageRequest, Repository,
};

const RESOURCE: &str = "product";
const UNIQUE_FIELD: &str = "name";

/// Fields supplied when creating a product
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub price: String,
    pub category: Option<String>,
    pub brand: String,
    pub description: String,
    pub image: Option<String>,
    pub qty: Option<String>,
}

/// Partial update; `None` and empty strings leave the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub qty: Option<String>,
}

/// Search filters: `category` and `brand` match exactly, `query` is a
/// case-insensitive substring of `name`
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub query: Option<String>,
}

impl ProductFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(category) = non_blank(&self.category) {
            condition = condition.add(Column::Category.eq(category));
        }
        if let Some(brand) = non_blank(&self.brand) {
            condition = condition.add(Column::Brand.eq(brand));
        }
        if let Some(query) = non_blank(&self.query) {
            let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col(Column::Name)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        condition
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Columns that can be summarized into facets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductFacet {
    Brand,
    Category,
}

impl ProductFacet {
    fn column(self) -> Column {
        match self {
            ProductFacet::Brand => Column::Brand,
            ProductFacet::Category => Column::Category,
        }
    }
}

/// Gateway over the `products` collection
#[derive(Debug, Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Inserts a product and returns it as stored
    pub async fn create(&self, input: NewProduct) -> Result<ProductModel, ServiceError> {
        let id = Uuid::new_v4();
        let now = timestamp_now();

        let model = ActiveModel {
            id: Set(id),
            name: Set(input.name),
            price: Set(input.price),
            category: Set(input.category),
            brand: Set(input.brand),
            description: Set(input.description),
            image: Set(input.image),
            qty: Set(input.qty),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Product::insert(model)
            .exec(self.base.get_db())
            .await
            .map_err(|e| write_error(e, RESOURCE, UNIQUE_FIELD))?;

        read_back(self.find_by_id(id).await, RESOURCE, id)
    }

    /// Applies the non-empty fields of `patch` and refreshes `updated_at`
    pub async fn update_by_id(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<ProductModel, ServiceError> {
        let fields = changed_fields(vec![
            (Column::Name, patch.name),
            (Column::Price, patch.price),
            (Column::Category, patch.category),
            (Column::Brand, patch.brand),
            (Column::Description, patch.description),
            (Column::Image, patch.image),
            (Column::Qty, patch.qty),
        ]);
        debug!(product_id = %id, fields = fields.len(), "updating product");

        let mut update = Product::update_many()
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

    pub async fn find_by_id(&self, id: Uuid) -> Result<ProductModel, ServiceError> {
        Product::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(storage_error)?
            .ok_or_else(|| ServiceError::not_found(RESOURCE))
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        let count = Product::find()
            .filter(Column::Id.eq(id))
            .count(self.base.get_db())
            .await
            .map_err(storage_error)?;
        Ok(count > 0)
    }

    /// One page of matching products in insertion order. Never fails on an empty result.
    pub async fn find_paged(
        &self,
        page: PageRequest,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        let Some(offset) = page.offset() else {
            return Ok(Vec::new());
        };
        Product::find()
            .filter(filter.condition())
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .offset(offset)
            .limit(page.limit)
            .all(self.base.get_db())
            .await
            .map_err(storage_error)
    }

    /// Total number of products matching `filter`
    pub async fn count(&self, filter: &ProductFilter) -> Result<u64, ServiceError> {
        Product::find()
            .filter(filter.condition())
            .count(self.base.get_db())
            .await
            .map_err(storage_error)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = Product::delete_many()
            .filter(Column::Id.eq(id))
            .exec(self.base.get_db())
            .await
            .map_err(|e| {
                if is_reference_violation(&e) {
                    ServiceError::AlreadyExists("product has reviews".to_string())
                } else {
                    storage_error(e)
                }
            })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found(RESOURCE));
        }
        Ok(())
    }

    /// Sorted distinct non-empty values of `facet` across the whole collection
    pub async fn distinct_values(&self, facet: ProductFacet) -> Result<Vec<String>, ServiceError> {
        let column = facet.column();
        Product::find()
            .select_only()
            .column(column)
            .distinct()
            .filter(column.is_not_null())
            .filter(column.ne(""))
            .order_by_asc(column)
            .into_tuple::<String>()
            .all(self.base.get_db())
            .await
            .map_err(storage_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("shirt"), "shirt");
    }

    #[test]
    fn blank_filters_are_ignored() {
        assert_eq!(non_blank(&Some("  ".into())), None);
        assert_eq!(non_blank(&Some(" Acme ".into())), Some("Acme"));
        assert_eq!(non_blank(&None), None);
    }
}
