//! Cart Service - per-user carts checked against live product stock

use domain_products::{Product, ProductRepository};
use domain_users::UserRepository;
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CartError, CartResult, QUANTITY_TOO_LOW};
use crate::models::{CartItem, CartLine, CartProduct, CartView};
use crate::repository::CartRepository;

/// Stock checks are advisory reads of `product.quantity`; nothing is reserved.
pub struct CartService<R: CartRepository> {
    repository: Arc<R>,
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(
        repository: R,
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            users,
            products,
        }
    }

    async fn ensure_user(&self, user_id: Uuid) -> CartResult<()> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(CartError::UserNotFound),
        }
    }

    /// Snapshot line for `item`, or `None` if its product is no longer listed.
    async fn line(&self, item: CartItem) -> CartResult<Option<CartLine>> {
        let Some(product) = self
            .products
            .find_by_id(item.product_id)
            .await?
            .filter(Product::is_listed)
        else {
            return Ok(None);
        };

        let seller_email = self
            .users
            .find_by_id(product.seller_id)
            .await?
            .map(|seller| seller.email);

        Ok(Some(CartLine {
            product_id: item.product_id,
            quantity: item.quantity,
            product: CartProduct::new(product, seller_email),
        }))
    }

    /// Attach live product snapshots, skipping items whose product is gone
    /// or no longer approved and available.
    pub async fn enrich(&self, items: &[CartItem]) -> CartResult<Vec<CartLine>> {
        let lines = try_join_all(items.iter().map(|item| self.line(*item))).await?;
        Ok(lines.into_iter().flatten().collect())
    }

    /// The caller's cart. Stale items are dropped and the cart is saved.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: Uuid) -> CartResult<CartView> {
        self.ensure_user(user_id).await?;

        let cart = self.repository.get_or_create(user_id).await?;
        let lines = self.enrich(&cart.items).await?;

        if lines.len() != cart.items.len() {
            let kept: Vec<CartItem> = lines.iter().map(CartLine::item).collect();
            self.repository.replace_items(user_id, kept).await?;
            tracing::warn!(
                user_id = %user_id,
                removed = cart.items.len() - lines.len(),
                "Pruned unavailable items from cart"
            );
        }

        Ok(CartView::new(lines))
    }

    /// Add `quantity` of a product, merging with an existing line.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> CartResult<CartView> {
        self.ensure_user(user_id).await?;

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        if !product.is_listed() {
            return Err(CartError::ProductUnavailable);
        }
        if quantity < 1 {
            return Err(CartError::Validation(QUANTITY_TOO_LOW.to_string()));
        }
        if quantity > product.quantity {
            return Err(CartError::InsufficientQuantity);
        }

        let mut cart = self.repository.get_or_create(user_id).await?;
        match cart.items.iter_mut().find(|item| item.product_id == product_id) {
            Some(item) => {
                let total = item.quantity.saturating_add(quantity);
                if total > product.quantity {
                    return Err(CartError::InsufficientQuantity);
                }
                item.quantity = total;
            }
            None => cart.items.push(CartItem {
                product_id,
                quantity,
            }),
        }

        let cart = self.repository.replace_items(user_id, cart.items).await?;
        Ok(CartView::new(self.enrich(&cart.items).await?))
    }

    /// Set a line's quantity outright.
    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> CartResult<CartView> {
        self.ensure_user(user_id).await?;

        if quantity < 1 {
            return Err(CartError::Validation(QUANTITY_TOO_LOW.to_string()));
        }

        let mut cart = self
            .repository
            .find_by_user_id(user_id)
            .await?
            .ok_or(CartError::CartNotFound)?;

        let index = cart
            .items
            .iter()
            .position(|item| item.product_id == product_id)
            .ok_or(CartError::ItemNotFound)?;

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        if quantity > product.quantity {
            return Err(CartError::InsufficientQuantity);
        }

        cart.items[index].quantity = quantity;
        let cart = self.repository.replace_items(user_id, cart.items).await?;
        Ok(CartView::new(self.enrich(&cart.items).await?))
    }

    /// Remove a line. Removing an absent line is not an error.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: Uuid, product_id: Uuid) -> CartResult<CartView> {
        self.ensure_user(user_id).await?;

        let cart = self
            .repository
            .pull_item(user_id, product_id)
            .await?
            .ok_or(CartError::CartNotFound)?;

        Ok(CartView::new(self.enrich(&cart.items).await?))
    }

    #[instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: Uuid) -> CartResult<CartView> {
        self.ensure_user(user_id).await?;

        self.repository.replace_items(user_id, Vec::new()).await?;
        Ok(CartView::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryCartRepository, MockCartRepository};
    use axum_helpers::Role;
    use chrono::Utc;
    use domain_products::{InMemoryProductRepository, ProductCondition, ProductStatus};
    use domain_users::{InMemoryUserRepository, User};

    struct Fixture {
        carts: InMemoryCartRepository,
        users: InMemoryUserRepository,
        products: InMemoryProductRepository,
        service: CartService<InMemoryCartRepository>,
        buyer: Uuid,
    }

    async fn fixture() -> Fixture {
        let carts = InMemoryCartRepository::new();
        let users = InMemoryUserRepository::new();
        let products = InMemoryProductRepository::new();

        let buyer = users
            .insert(User::new("buyer@example.com", Role::User))
            .await
            .unwrap()
            .id;

        let service = CartService::new(
            carts.clone(),
            Arc::new(users.clone()),
            Arc::new(products.clone()),
        );

        Fixture {
            carts,
            users,
            products,
            service,
            buyer,
        }
    }

    async fn listed(f: &Fixture, price: i64, quantity: i32) -> Product {
        let seller = f
            .users
            .insert(User::new("seller@example.com", Role::User))
            .await
            .unwrap();
        let now = Utc::now();
        f.products
            .create(Product {
                id: Uuid::now_v7(),
                title: "Wool coat".to_string(),
                description: None,
                category_id: Uuid::now_v7(),
                brand: None,
                size: None,
                color: None,
                material: None,
                gender: None,
                style: None,
                price,
                condition: ProductCondition::Good,
                defects: None,
                defect_images: Vec::new(),
                images: vec!["https://cdn.example.com/coat.jpg".to_string()],
                quantity,
                seller_id: seller.id,
                authenticity: None,
                status: ProductStatus::Approved,
                is_available: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_cart_creates_empty_cart() {
        let f = fixture().await;

        let view = f.service.get_cart(f.buyer).await.unwrap();
        assert_eq!(view, CartView::default());
        assert!(f.carts.find_by_user_id(f.buyer).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let f = fixture().await;
        let stranger = Uuid::now_v7();

        assert!(matches!(
            f.service.get_cart(stranger).await,
            Err(CartError::UserNotFound)
        ));
        assert!(matches!(
            f.service.clear_cart(stranger).await,
            Err(CartError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_add_merges_and_respects_stock() {
        let f = fixture().await;
        let coat = listed(&f, 300_000, 4).await;

        let view = f.service.add_item(f.buyer, coat.id, 3).await.unwrap();
        assert_eq!(view.total_items, 3);
        assert_eq!(view.total_price, 900_000);
        assert_eq!(
            view.items[0].product.seller_email.as_deref(),
            Some("seller@example.com")
        );

        let over = f.service.add_item(f.buyer, coat.id, 2).await;
        assert!(matches!(over, Err(CartError::InsufficientQuantity)));

        // Nothing was persisted by the failed add
        let cart = f.carts.find_by_user_id(f.buyer).await.unwrap().unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);

        let view = f.service.add_item(f.buyer, coat.id, 1).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_add_item_check_order() {
        let f = fixture().await;

        assert!(matches!(
            f.service.add_item(f.buyer, Uuid::now_v7(), 1).await,
            Err(CartError::ProductNotFound)
        ));

        let hidden = listed(&f, 100, 5).await;
        f.products
            .set_status(hidden.id, ProductStatus::Pending, true)
            .await;
        // Unavailable is reported before a bad quantity
        assert!(matches!(
            f.service.add_item(f.buyer, hidden.id, 0).await,
            Err(CartError::ProductUnavailable)
        ));

        let coat = listed(&f, 100, 5).await;
        let Err(CartError::Validation(message)) = f.service.add_item(f.buyer, coat.id, 0).await
        else {
            panic!("expected validation error");
        };
        assert_eq!(message, QUANTITY_TOO_LOW);

        assert!(matches!(
            f.service.add_item(f.buyer, coat.id, 6).await,
            Err(CartError::InsufficientQuantity)
        ));
    }

    #[tokio::test]
    async fn test_get_cart_prunes_unlisted_items() {
        let f = fixture().await;
        let keep = listed(&f, 100, 5).await;
        let flip = listed(&f, 200, 5).await;

        f.service.add_item(f.buyer, keep.id, 1).await.unwrap();
        f.service.add_item(f.buyer, flip.id, 2).await.unwrap();

        f.products
            .set_status(flip.id, ProductStatus::Approved, false)
            .await;

        let view = f.service.get_cart(f.buyer).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].product_id, keep.id);
        assert_eq!(view.total_price, 100);

        let stored = f.carts.find_by_user_id(f.buyer).await.unwrap().unwrap();
        assert_eq!(stored.items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_item() {
        let f = fixture().await;
        let coat = listed(&f, 100, 5).await;

        assert!(matches!(
            f.service.update_item(f.buyer, coat.id, 2).await,
            Err(CartError::CartNotFound)
        ));

        f.service.add_item(f.buyer, coat.id, 1).await.unwrap();

        assert!(matches!(
            f.service.update_item(f.buyer, Uuid::now_v7(), 2).await,
            Err(CartError::ItemNotFound)
        ));
        assert!(matches!(
            f.service.update_item(f.buyer, coat.id, 0).await,
            Err(CartError::Validation(_))
        ));
        assert!(matches!(
            f.service.update_item(f.buyer, coat.id, 6).await,
            Err(CartError::InsufficientQuantity)
        ));

        let view = f.service.update_item(f.buyer, coat.id, 5).await.unwrap();
        assert_eq!(view.total_items, 5);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let f = fixture().await;
        let coat = listed(&f, 100, 5).await;
        let scarf = listed(&f, 50, 5).await;

        assert!(matches!(
            f.service.remove_item(f.buyer, coat.id).await,
            Err(CartError::CartNotFound)
        ));

        f.service.add_item(f.buyer, coat.id, 1).await.unwrap();
        f.service.add_item(f.buyer, scarf.id, 1).await.unwrap();

        let view = f.service.remove_item(f.buyer, coat.id).await.unwrap();
        assert_eq!(view.items.len(), 1);
        let view = f.service.remove_item(f.buyer, coat.id).await.unwrap();
        assert_eq!(view.items.len(), 1);

        let view = f.service.clear_cart(f.buyer).await.unwrap();
        assert_eq!(view, CartView::default());
        let stored = f.carts.find_by_user_id(f.buyer).await.unwrap().unwrap();
        assert!(stored.items.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let users = InMemoryUserRepository::new();
        let buyer = users
            .insert(User::new("buyer@example.com", Role::User))
            .await
            .unwrap();

        let mut repo = MockCartRepository::new();
        repo.expect_get_or_create()
            .returning(|_| Err(CartError::Database("timeout".to_string())));

        let service = CartService::new(
            repo,
            Arc::new(users),
            Arc::new(InMemoryProductRepository::new()),
        );

        assert!(matches!(
            service.get_cart(buyer.id).await,
            Err(CartError::Database(_))
        ));
    }
}
