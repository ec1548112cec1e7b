use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{AdminLogEntry, Notification, Order};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_products: i64,
    pub total_news: i64,
    pub total_users: i64,
    pub total_orders: i64,
    pub new_products: i64,
    pub sale_products: i64,
    pub recent_news: i64,
    pub total_revenue: i64,
    pub recent_orders: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationList {
    pub unread_count: i64,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    pub related_id: Option<String>,
    pub related_type: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotificationUpdateRequest {
    pub notification_id: uuid::Uuid,
    pub action: NotificationAction,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum NotificationAction {
    MarkAsRead,
    MarkAsUnread,
    Delete,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLogRequest {
    pub action: String,
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogList {
    pub items: Vec<AdminLogEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrderList {
    pub items: Vec<Order>,
}
