use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::locale::LocalizedText;

/// Public user shape. The password hash never leaves the persistence layer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub price: i64,
    pub original_price: Option<i64>,
    pub image: String,
    /// Resolved, always-fetchable image URL.
    pub image_url: String,
    pub category: LocalizedText,
    #[serde(rename = "type")]
    pub product_type: LocalizedText,
    pub weight: LocalizedText,
    pub origin: LocalizedText,
    pub is_new: bool,
    pub is_on_sale: bool,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewsArticle {
    pub id: Uuid,
    pub title: LocalizedText,
    pub excerpt: LocalizedText,
    pub content: LocalizedText,
    pub author: String,
    pub image: String,
    pub image_url: String,
    pub category: String,
    pub featured: bool,
    pub read_time: i32,
    pub published_at: DateTime<Utc>,
}

/// One line of a cart or an order snapshot. Kept as the client sends it: the
/// id is the product id, price and labels are frozen at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub image: String,
    pub quantity: i64,
    #[serde(rename = "type")]
    pub item_type: String,
    pub weight: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub items: Vec<CartLine>,
    pub total: i64,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Favorite {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub read: bool,
    pub related_id: Option<String>,
    pub related_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct AdminLogEntry {
    pub id: Uuid,
    pub admin_id: Option<Uuid>,
    pub admin_email: String,
    pub action: String,
    pub details: Option<serde_json::Value>,
    pub ip: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_round_trips_through_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("paid"), None);
    }

    #[test]
    fn cart_line_accepts_wire_shape() {
        let line: CartLine = serde_json::from_value(serde_json::json!({
            "id": "64a1b2c3d4e5f6a7b8c9d0e1",
            "name": "Арабіка Колумбія",
            "price": 350,
            "image": "64a1b2c3d4e5f6a7b8c9d0e1",
            "quantity": 2,
            "type": "beans",
            "weight": "250г"
        }))
        .unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.item_type, "beans");
    }
}
