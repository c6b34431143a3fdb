use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{Profile, SellerInfo, ShippingAddress, User};

/// User persistence. Other domains read users through this trait as well.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Store a provisioned account
    async fn insert(&self, user: User) -> UserResult<User>;

    /// Replace the embedded profile. `None` when the user does not exist.
    async fn update_profile(&self, id: Uuid, profile: Profile) -> UserResult<Option<User>>;

    async fn update_seller_info(
        &self,
        id: Uuid,
        seller_info: SellerInfo,
    ) -> UserResult<Option<User>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShippingAddressRepository: Send + Sync {
    /// Default address first, then newest first
    async fn find_by_user_id(&self, user_id: Uuid) -> UserResult<Vec<ShippingAddress>>;

    /// Scoped to the owner so one user cannot touch another's addresses
    async fn find_by_id_and_user_id(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> UserResult<Option<ShippingAddress>>;

    async fn create(&self, address: ShippingAddress) -> UserResult<ShippingAddress>;

    async fn replace(&self, address: ShippingAddress) -> UserResult<ShippingAddress>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> UserResult<bool>;

    /// Clear `isDefault` on every address of the user
    async fn unset_default(&self, user_id: Uuid) -> UserResult<()>;

    /// Clear `isDefaultPickup` on every address of the user
    async fn unset_default_pickup(&self, user_id: Uuid) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, profile: Profile) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.profile = Some(profile);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_seller_info(
        &self,
        id: Uuid,
        seller_info: SellerInfo,
    ) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.seller_info = Some(seller_info);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

/// In-memory implementation of ShippingAddressRepository (for development/testing)
#[derive(Clone, Default)]
pub struct InMemoryShippingAddressRepository {
    addresses: Arc<RwLock<HashMap<Uuid, ShippingAddress>>>,
}

impl InMemoryShippingAddressRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShippingAddressRepository for InMemoryShippingAddressRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> UserResult<Vec<ShippingAddress>> {
        let addresses = self.addresses.read().await;
        let mut owned: Vec<ShippingAddress> = addresses
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();

        owned.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(owned)
    }

    async fn find_by_id_and_user_id(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> UserResult<Option<ShippingAddress>> {
        let addresses = self.addresses.read().await;
        Ok(addresses.get(&id).filter(|a| a.user_id == user_id).cloned())
    }

    async fn create(&self, address: ShippingAddress) -> UserResult<ShippingAddress> {
        let mut addresses = self.addresses.write().await;
        addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn replace(&self, address: ShippingAddress) -> UserResult<ShippingAddress> {
        let mut addresses = self.addresses.write().await;
        addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> UserResult<bool> {
        let mut addresses = self.addresses.write().await;
        if addresses.get(&id).is_some_and(|a| a.user_id == user_id) {
            addresses.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn unset_default(&self, user_id: Uuid) -> UserResult<()> {
        let mut addresses = self.addresses.write().await;
        addresses
            .values_mut()
            .filter(|a| a.user_id == user_id)
            .for_each(|a| a.is_default = false);
        Ok(())
    }

    async fn unset_default_pickup(&self, user_id: Uuid) -> UserResult<()> {
        let mut addresses = self.addresses.write().await;
        addresses
            .values_mut()
            .filter(|a| a.user_id == user_id)
            .for_each(|a| a.is_default_pickup = false);
        Ok(())
    }
}
