use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductStatus};

/// Product persistence. The cart reads products through this trait as well.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> ProductResult<Product>;

    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// All of a seller's products regardless of status, newest first
    async fn find_by_seller_id(&self, seller_id: Uuid) -> ProductResult<Vec<Product>>;

    /// Listed (approved and available) products in a category, newest first
    async fn find_by_category_id(&self, category_id: Uuid) -> ProductResult<Vec<Product>>;

    /// One page of listed products, newest first
    async fn find_approved_page(&self, skip: u64, limit: i64) -> ProductResult<Vec<Product>>;

    async fn count_approved(&self) -> ProductResult<u64>;
}

/// In-memory store for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moderation hook; the HTTP API never changes status after creation.
    pub async fn set_status(&self, id: Uuid, status: ProductStatus, is_available: bool) -> bool {
        let mut products = self.products.write().await;
        match products.get_mut(&id) {
            Some(product) => {
                product.status = status;
                product.is_available = is_available;
                product.updated_at = chrono::Utc::now();
                true
            }
            None => false,
        }
    }

    async fn newest_first<F>(&self, keep: F) -> Vec<Product>
    where
        F: Fn(&Product) -> bool,
    {
        let products = self.products.read().await;
        let mut matching: Vec<Product> = products.values().filter(|&p| keep(p)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matching
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn find_by_seller_id(&self, seller_id: Uuid) -> ProductResult<Vec<Product>> {
        Ok(self.newest_first(|p| p.seller_id == seller_id).await)
    }

    async fn find_by_category_id(&self, category_id: Uuid) -> ProductResult<Vec<Product>> {
        Ok(self
            .newest_first(|p| p.category_id == category_id && p.is_listed())
            .await)
    }

    async fn find_approved_page(&self, skip: u64, limit: i64) -> ProductResult<Vec<Product>> {
        let listed = self.newest_first(Product::is_listed).await;
        Ok(listed
            .into_iter()
            .skip(skip as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_approved(&self) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.values().filter(|p| p.is_listed()).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductCondition;
    use chrono::{Duration, Utc};

    fn product(seller_id: Uuid, category_id: Uuid, age_minutes: i64) -> Product {
        let created_at = Utc::now() - Duration::minutes(age_minutes);
        Product {
            id: Uuid::now_v7(),
            title: format!("Item {age_minutes}"),
            description: None,
            category_id,
            brand: None,
            size: None,
            color: None,
            material: None,
            gender: None,
            style: None,
            price: 100,
            condition: ProductCondition::Good,
            defects: None,
            defect_images: Vec::new(),
            images: vec!["https://cdn.example.com/a.jpg".to_string()],
            quantity: 1,
            seller_id,
            authenticity: None,
            status: ProductStatus::Approved,
            is_available: true,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_page_is_newest_first_and_skips_unlisted() {
        let repo = InMemoryProductRepository::new();
        let seller = Uuid::now_v7();
        let category = Uuid::now_v7();

        let old = repo.create(product(seller, category, 30)).await.unwrap();
        let new = repo.create(product(seller, category, 1)).await.unwrap();
        let hidden = repo.create(product(seller, category, 10)).await.unwrap();
        assert!(repo.set_status(hidden.id, ProductStatus::Rejected, true).await);

        let page = repo.find_approved_page(0, 9).await.unwrap();
        let ids: Vec<Uuid> = page.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![new.id, old.id]);
        assert_eq!(repo.count_approved().await.unwrap(), 2);

        let second = repo.find_approved_page(1, 1).await.unwrap();
        assert_eq!(second[0].id, old.id);

        // Seller listing includes everything
        assert_eq!(repo.find_by_seller_id(seller).await.unwrap().len(), 3);
        assert_eq!(repo.find_by_category_id(category).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_set_status_unknown_product() {
        let repo = InMemoryProductRepository::new();
        assert!(!repo.set_status(Uuid::now_v7(), ProductStatus::Approved, false).await);
    }
}
