//! MongoDB implementations of the user and shipping-address repositories

use async_trait::async_trait;
use database::mongodb::{to_stored_bson, uuid_bson};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, doc},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{Profile, SellerInfo, ShippingAddress, User};
use crate::repository::{ShippingAddressRepository, UserRepository};

fn to_document_value<T: serde::Serialize>(value: &T) -> UserResult<Bson> {
    to_stored_bson(value).map_err(|e| UserError::Database(e.to_string()))
}

/// Users live in the `users` collection shared with the identity service
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<User>("users");
        Self { collection }
    }

    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("uniq_email".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }

    async fn set_field(&self, id: Uuid, field: &str, value: Bson) -> UserResult<Option<User>> {
        let update = doc! {
            "$set": {
                field: value,
                "updatedAt": to_document_value(&Utc::now())?,
            }
        };

        let user = self
            .collection
            .find_one_and_update(doc! { "_id": uuid_bson(&id) }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let user = self.collection.find_one(doc! { "_id": uuid_bson(&id) }).await?;
        Ok(user)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn insert(&self, user: User) -> UserResult<User> {
        self.collection.insert_one(&user).await?;
        Ok(user)
    }

    #[instrument(skip(self, profile))]
    async fn update_profile(&self, id: Uuid, profile: Profile) -> UserResult<Option<User>> {
        let value = to_document_value(&profile)?;
        self.set_field(id, "profile", value).await
    }

    #[instrument(skip(self, seller_info))]
    async fn update_seller_info(
        &self,
        id: Uuid,
        seller_info: SellerInfo,
    ) -> UserResult<Option<User>> {
        let value = to_document_value(&seller_info)?;
        self.set_field(id, "sellerInfo", value).await
    }
}

#[derive(Clone)]
pub struct MongoShippingAddressRepository {
    collection: Collection<ShippingAddress>,
}

impl MongoShippingAddressRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<ShippingAddress>("shippingaddresses");
        Self { collection }
    }

    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "userId": 1, "isDefault": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_user_default".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Shipping address indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl ShippingAddressRepository for MongoShippingAddressRepository {
    #[instrument(skip(self))]
    async fn find_by_user_id(&self, user_id: Uuid) -> UserResult<Vec<ShippingAddress>> {
        let options = FindOptions::builder()
            .sort(doc! { "isDefault": -1, "createdAt": -1, "_id": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "userId": uuid_bson(&user_id) })
            .with_options(options)
            .await?;
        let addresses: Vec<ShippingAddress> = cursor.try_collect().await?;

        Ok(addresses)
    }

    #[instrument(skip(self))]
    async fn find_by_id_and_user_id(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> UserResult<Option<ShippingAddress>> {
        let filter = doc! { "_id": uuid_bson(&id), "userId": uuid_bson(&user_id) };
        let address = self.collection.find_one(filter).await?;
        Ok(address)
    }

    #[instrument(skip(self, address), fields(address_id = %address.id))]
    async fn create(&self, address: ShippingAddress) -> UserResult<ShippingAddress> {
        self.collection.insert_one(&address).await?;
        Ok(address)
    }

    #[instrument(skip(self, address), fields(address_id = %address.id))]
    async fn replace(&self, address: ShippingAddress) -> UserResult<ShippingAddress> {
        let filter = doc! { "_id": uuid_bson(&address.id), "userId": uuid_bson(&address.user_id) };
        self.collection.replace_one(filter, &address).await?;
        Ok(address)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid, user_id: Uuid) -> UserResult<bool> {
        let filter = doc! { "_id": uuid_bson(&id), "userId": uuid_bson(&user_id) };
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn unset_default(&self, user_id: Uuid) -> UserResult<()> {
        self.collection
            .update_many(
                doc! { "userId": uuid_bson(&user_id), "isDefault": true },
                doc! { "$set": { "isDefault": false } },
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn unset_default_pickup(&self, user_id: Uuid) -> UserResult<()> {
        self.collection
            .update_many(
                doc! { "userId": uuid_bson(&user_id), "isDefaultPickup": true },
                doc! { "$set": { "isDefaultPickup": false } },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_helpers::Role;

    #[test]
    fn test_stored_ids_match_lookup_filters() {
        let user = User::new("buyer@example.com", Role::User);
        let stored = mongodb::bson::to_raw_document_buf(&user)
            .unwrap()
            .to_document()
            .unwrap();
        assert_eq!(stored.get("_id"), Some(&uuid_bson(&user.id)));

        let now = Utc::now();
        let address = ShippingAddress {
            id: Uuid::now_v7(),
            user_id: user.id,
            full_name: "Tran Thi B".to_string(),
            phone: "0909000000".to_string(),
            province: "Hà Nội".to_string(),
            district: "Ba Đình".to_string(),
            ward: "Điện Biên".to_string(),
            street: None,
            note: None,
            is_default: true,
            is_default_pickup: false,
            created_at: now,
            updated_at: now,
        };
        let stored = mongodb::bson::to_raw_document_buf(&address)
            .unwrap()
            .to_document()
            .unwrap();
        assert_eq!(stored.get("_id"), Some(&uuid_bson(&address.id)));
        assert_eq!(stored.get("userId"), Some(&uuid_bson(&user.id)));
    }
}
