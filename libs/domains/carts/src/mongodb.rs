//! MongoDB implementation of CartRepository

use async_trait::async_trait;
use database::mongodb::{to_stored_bson, uuid_bson};
use chrono::Utc;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CartError, CartResult};
use crate::models::{Cart, CartItem};
use crate::repository::CartRepository;

const DUPLICATE_KEY_CODE: i32 = 11000;

fn to_document_value<T: serde::Serialize>(value: &T) -> CartResult<Bson> {
    to_stored_bson(value).map_err(|e| CartError::Database(e.to_string()))
}

/// Two upserts for the same user can race on `uniq_user`
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => command.code == DUPLICATE_KEY_CODE,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

#[derive(Clone)]
pub struct MongoCartRepository {
    collection: Collection<Cart>,
}

impl MongoCartRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Cart>("carts");
        Self { collection }
    }

    /// One cart per user
    pub async fn init_indexes(&self) -> CartResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "userId": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("uniq_user".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Cart indexes created successfully");
        Ok(())
    }

    /// Fields written only when the upsert inserts
    fn on_insert() -> CartResult<Document> {
        Ok(doc! {
            "_id": uuid_bson(&Uuid::now_v7()),
            "createdAt": to_document_value(&Utc::now())?,
        })
    }

    async fn upsert(&self, user_id: Uuid, update: Document) -> CartResult<Cart> {
        let filter = doc! { "userId": uuid_bson(&user_id) };

        let result = self
            .collection
            .find_one_and_update(filter.clone(), update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await;

        let cart = match result {
            Ok(cart) => cart,
            // Lost the insert race; the other writer's cart exists now
            Err(err) if is_duplicate_key(&err) => self.collection.find_one(filter).await?,
            Err(err) => return Err(err.into()),
        };

        cart.ok_or_else(|| CartError::Database(format!("cart upsert for {user_id} returned nothing")))
    }
}

#[async_trait]
impl CartRepository for MongoCartRepository {
    #[instrument(skip(self))]
    async fn find_by_user_id(&self, user_id: Uuid) -> CartResult<Option<Cart>> {
        let cart = self
            .collection
            .find_one(doc! { "userId": uuid_bson(&user_id) })
            .await?;
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn get_or_create(&self, user_id: Uuid) -> CartResult<Cart> {
        let mut on_insert = Self::on_insert()?;
        on_insert.insert("items", Bson::Array(Vec::new()));
        on_insert.insert("updatedAt", to_document_value(&Utc::now())?);

        self.upsert(user_id, doc! { "$setOnInsert": on_insert }).await
    }

    #[instrument(skip(self, items), fields(items = items.len()))]
    async fn replace_items(&self, user_id: Uuid, items: Vec<CartItem>) -> CartResult<Cart> {
        let update = doc! {
            "$set": {
                "items": to_document_value(&items)?,
                "updatedAt": to_document_value(&Utc::now())?,
            },
            "$setOnInsert": Self::on_insert()?,
        };

        self.upsert(user_id, update).await
    }

    #[instrument(skip(self))]
    async fn pull_item(&self, user_id: Uuid, product_id: Uuid) -> CartResult<Option<Cart>> {
        let update = doc! {
            "$pull": { "items": { "productId": uuid_bson(&product_id) } },
            "$set": { "updatedAt": to_document_value(&Utc::now())? },
        };

        let cart = self
            .collection
            .find_one_and_update(doc! { "userId": uuid_bson(&user_id) }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(cart)
    }
}
