//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use database::mongodb::uuid_bson;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductStatus};
use crate::repository::ProductRepository;

/// Newest first; `_id` breaks ties between equal timestamps
fn newest_first(skip: Option<u64>, limit: Option<i64>) -> FindOptions {
    FindOptions::builder()
        .sort(doc! { "createdAt": -1, "_id": -1 })
        .skip(skip)
        .limit(limit)
        .build()
}

#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Product>("products");
        Self { collection }
    }

    /// Initialize indexes for the seller, category and listing queries
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "sellerId": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_seller".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "categoryId": 1, "status": 1, "isAvailable": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category_listed".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "status": 1, "isAvailable": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_listed_newest".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Approved and available
    fn listed_filter() -> Document {
        doc! {
            "status": ProductStatus::Approved.to_string(),
            "isAvailable": true,
        }
    }

    async fn find_many(&self, filter: Document, options: FindOptions) -> ProductResult<Vec<Product>> {
        let cursor = self.collection.find(filter).with_options(options).await?;
        let products: Vec<Product> = cursor.try_collect().await?;
        Ok(products)
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.collection.insert_one(&product).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(doc! { "_id": uuid_bson(&id) }).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_by_seller_id(&self, seller_id: Uuid) -> ProductResult<Vec<Product>> {
        self.find_many(doc! { "sellerId": uuid_bson(&seller_id) }, newest_first(None, None))
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_category_id(&self, category_id: Uuid) -> ProductResult<Vec<Product>> {
        let mut filter = Self::listed_filter();
        filter.insert("categoryId", uuid_bson(&category_id));
        self.find_many(filter, newest_first(None, None)).await
    }

    #[instrument(skip(self))]
    async fn find_approved_page(&self, skip: u64, limit: i64) -> ProductResult<Vec<Product>> {
        self.find_many(Self::listed_filter(), newest_first(Some(skip), Some(limit)))
            .await
    }

    #[instrument(skip(self))]
    async fn count_approved(&self) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(Self::listed_filter())
            .await?;
        Ok(count)
    }
}
