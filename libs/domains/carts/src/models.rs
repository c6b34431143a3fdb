use chrono::{DateTime, Utc};
use domain_products::{Product, ProductCondition};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One product line. Quantity is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Stored cart, one per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Live product snapshot shown next to a cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: i64,
    pub images: Vec<String>,
    pub condition: ProductCondition,
    /// Stock currently available
    pub quantity: i32,
    pub seller_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_email: Option<String>,
}

impl CartProduct {
    pub fn new(product: Product, seller_email: Option<String>) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            images: product.images,
            condition: product.condition,
            quantity: product.quantity,
            seller_id: product.seller_id,
            seller_email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub product: CartProduct,
}

impl CartLine {
    pub fn item(&self) -> CartItem {
        CartItem {
            product_id: self.product_id,
            quantity: self.quantity,
        }
    }
}

/// Cart as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    /// Sum of line quantities
    pub total_items: i64,
    /// Sum of price times quantity
    pub total_price: i64,
}

impl CartView {
    pub fn new(items: Vec<CartLine>) -> Self {
        let total_items = items.iter().map(|line| i64::from(line.quantity)).sum();
        let total_price = items
            .iter()
            .map(|line| line.product.price * i64::from(line.quantity))
            .sum();

        Self {
            items,
            total_items,
            total_price,
        }
    }
}

/// Body of `POST /cart/items`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddItem {
    pub product_id: Option<Uuid>,
    /// Defaults to 1
    pub quantity: Option<i32>,
}

/// Body of `PUT /cart/items/{productId}`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateItem {
    pub quantity: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: i64, quantity: i32) -> CartLine {
        let product_id = Uuid::now_v7();
        CartLine {
            product_id,
            quantity,
            product: CartProduct {
                id: product_id,
                title: "Scarf".to_string(),
                description: None,
                price,
                images: Vec::new(),
                condition: ProductCondition::Good,
                quantity: 10,
                seller_id: Uuid::now_v7(),
                seller_email: None,
            },
        }
    }

    #[test]
    fn test_totals() {
        let view = CartView::new(vec![line(50_000, 2), line(120_000, 1)]);
        assert_eq!(view.total_items, 3);
        assert_eq!(view.total_price, 220_000);

        let empty = CartView::new(Vec::new());
        assert_eq!(empty, CartView::default());
    }

    #[test]
    fn test_view_wire_format() {
        let value = serde_json::to_value(CartView::new(vec![line(10, 1)])).unwrap();
        assert!(value["items"][0]["productId"].is_string());
        assert!(value["items"][0]["product"]["sellerId"].is_string());
        assert_eq!(value["totalPrice"], 10);
    }
}
