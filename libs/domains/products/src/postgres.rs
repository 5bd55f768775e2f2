use async_trait::async_trait;
use sea_orm::sea_query::{Expr, ExprTrait, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{NewProduct, Pagination, Product, ProductFilter, UpdateProduct},
    repository::ProductRepository,
};

/// PostgreSQL-backed product store
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(filter: &ProductFilter) -> Select<entity::Entity> {
        let mut query = entity::Entity::find();

        if let Some(name) = &filter.name {
            let pattern = format!("%{}%", escape_like(name));
            query = query.filter(
                Expr::col((entity::Entity, entity::Column::Name))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        if let Some(category) = &filter.category {
            query = query.filter(entity::Column::Category.eq(category.as_str()));
        }

        query
    }
}

/// Backslash-escape `%`, `_` and `\` so `value` matches literally in a LIKE pattern
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let product = Product::try_new(input)?;

        let active_model: entity::ActiveModel = (&product).into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_page(
        &self,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> ProductResult<(u64, Vec<Product>)> {
        let query = Self::filtered(&filter);

        let total = query.clone().count(&self.db).await?;

        let models = query
            .order_by_asc(entity::Column::CreatedAt)
            .order_by_asc(entity::Column::Id)
            .limit(pagination.limit)
            .offset(pagination.offset())
            .all(&self.db)
            .await?;

        Ok((total, models.into_iter().map(Into::into).collect()))
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let existing: Product = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?
            .into();

        let product = existing.with_update(input)?;

        let active_model: entity::ActiveModel = (&product).into();
        let model = active_model.update(&self.db).await.map_err(|e| match e {
            // Deleted between the read and the write
            DbErr::RecordNotUpdated => ProductError::NotFound(id),
            other => other.into(),
        })?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
