use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::CartResult;
use crate::models::{Cart, CartItem};

/// Cart persistence, keyed by user
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: Uuid) -> CartResult<Option<Cart>>;

    /// The user's cart, created empty if absent
    async fn get_or_create(&self, user_id: Uuid) -> CartResult<Cart>;

    /// Overwrite the line items, creating the cart if absent
    async fn replace_items(&self, user_id: Uuid, items: Vec<CartItem>) -> CartResult<Cart>;

    /// Remove the line for `product_id` if present. `None` when there is no cart.
    async fn pull_item(&self, user_id: Uuid, product_id: Uuid) -> CartResult<Option<Cart>>;
}

#[derive(Clone, Default)]
pub struct InMemoryCartRepository {
    carts: Arc<RwLock<HashMap<Uuid, Cart>>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> CartResult<Option<Cart>> {
        Ok(self.carts.read().await.get(&user_id).cloned())
    }

    async fn get_or_create(&self, user_id: Uuid) -> CartResult<Cart> {
        let mut carts = self.carts.write().await;
        let cart = carts.entry(user_id).or_insert_with(|| Cart::new(user_id));
        Ok(cart.clone())
    }

    async fn replace_items(&self, user_id: Uuid, items: Vec<CartItem>) -> CartResult<Cart> {
        let mut carts = self.carts.write().await;
        let cart = carts.entry(user_id).or_insert_with(|| Cart::new(user_id));
        cart.items = items;
        cart.updated_at = Utc::now();
        Ok(cart.clone())
    }

    async fn pull_item(&self, user_id: Uuid, product_id: Uuid) -> CartResult<Option<Cart>> {
        let mut carts = self.carts.write().await;
        let Some(cart) = carts.get_mut(&user_id) else {
            return Ok(None);
        };

        cart.items.retain(|item| item.product_id != product_id);
        cart.updated_at = Utc::now();
        Ok(Some(cart.clone()))
    }
}
