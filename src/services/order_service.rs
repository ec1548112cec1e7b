use chrono::Utc;
use rand::Rng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, CreateOrderResponse, OrderList},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::notification_service,
    state::AppState,
};

const ORDER_NUMBER_ATTEMPTS: usize = 5;

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize(20);
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<Order>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<CreateOrderResponse>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order items are required".into()));
    }
    // Zero stays rejected: a free order has no path through the storefront.
    if payload.total <= 0 {
        return Err(AppError::BadRequest("Order total is required".into()));
    }
    for line in &payload.items {
        if line.quantity <= 0 {
            return Err(AppError::BadRequest("Order has invalid quantity".into()));
        }
    }

    let order_number = unique_order_number(state).await?;
    let items = serde_json::to_value(&payload.items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        order_number: Set(order_number),
        items: Set(items),
        total: Set(payload.total),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        delivery_address: Set(payload.delivery_address.unwrap_or_default()),
        payment_method: Set(payload.payment_method.unwrap_or_default()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) =
        notification_service::notify_new_order(state, &order.order_number, &user.email, order.total)
            .await
    {
        tracing::warn!(error = %err, "order notification failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        CreateOrderResponse {
            order_id: order.id,
            order_number: order.order_number,
        },
        Some(Meta::empty()),
    ))
}

/// `ORD-YYYYMMDD-XXXX` with a random 4-digit suffix. The suffix space is
/// small enough to collide within a busy day, so the generated number is
/// checked against existing orders and regenerated a bounded number of times.
async fn unique_order_number(state: &AppState) -> AppResult<String> {
    for _ in 0..ORDER_NUMBER_ATTEMPTS {
        let candidate = generate_order_number();
        let taken = Orders::find()
            .filter(OrderCol::OrderNumber.eq(candidate.clone()))
            .count(&state.orm)
            .await?;
        if taken == 0 {
            return Ok(candidate);
        }
    }
    Err(AppError::Internal(anyhow::anyhow!(
        "could not allocate a unique order number"
    )))
}

fn generate_order_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix: u32 = rand::thread_rng().gen_range(1000..=9999);
    format!("ORD-{date}-{suffix}")
}

pub fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let items = serde_json::from_value(model.items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    let status = OrderStatus::parse(&model.status)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown order status")))?;
    Ok(Order {
        id: model.id,
        order_number: model.order_number,
        items,
        total: model.total,
        status,
        delivery_address: model.delivery_address,
        payment_method: model.payment_method,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn order_number_matches_wire_format() {
        let pattern = Regex::new(r"^ORD-\d{8}-\d{4}$").unwrap();
        for _ in 0..50 {
            let number = generate_order_number();
            assert!(pattern.is_match(&number), "bad order number {number}");
        }
    }

    #[test]
    fn order_number_suffix_stays_in_range() {
        for _ in 0..50 {
            let number = generate_order_number();
            let suffix: u32 = number.rsplit('-').next().unwrap().parse().unwrap();
            assert!((1000..=9999).contains(&suffix));
        }
    }
}
