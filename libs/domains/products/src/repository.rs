use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Pagination, Product, ProductFilter, UpdateProduct};

/// Repository trait for Product persistence
///
/// Implementations keep products in insertion order (`created_at`, then `id`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Validate and store a new product
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Count all products matching `filter` and return the requested page of them
    async fn find_page(
        &self,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> ProductResult<(u64, Vec<Product>)>;

    /// Merge `input` into an existing product; `NotFound` when absent
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product>;

    /// Delete a product by ID, returning whether a row was removed
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}

/// Process-local store used when no database is configured, and by tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let product = Product::try_new(input)?;
        self.products.write().await.push(product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_page(
        &self,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> ProductResult<(u64, Vec<Product>)> {
        let products = self.products.read().await;
        let matching: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();

        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);
        let page = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|p| (*p).clone())
            .collect();

        Ok((matching.len() as u64, page))
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ProductError::NotFound(id))?;

        let updated = slot.clone().with_update(input)?;
        *slot = updated.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);

        let deleted = products.len() < before;
        if deleted {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }
}
