use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_admin_action,
    dto::admin::{AdminOrderList, CreateLogRequest, LogList, StatsResponse, UpdateOrderStatusRequest},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{AdminLogEntry, Order, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, Pagination, SortOrder},
    services::order_service::order_from_entity,
    state::AppState,
};

pub async fn stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<StatsResponse>> {
    ensure_admin(user)?;

    let total_products: (i64,) = sqlx::query_as("SELECT count(*) FROM products")
        .fetch_one(&state.pool)
        .await?;
    let total_news: (i64,) = sqlx::query_as("SELECT count(*) FROM news")
        .fetch_one(&state.pool)
        .await?;
    let total_users: (i64,) = sqlx::query_as("SELECT count(*) FROM users")
        .fetch_one(&state.pool)
        .await?;
    let total_orders: (i64,) = sqlx::query_as("SELECT count(*) FROM orders")
        .fetch_one(&state.pool)
        .await?;
    let new_products: (i64,) = sqlx::query_as("SELECT count(*) FROM products WHERE is_new")
        .fetch_one(&state.pool)
        .await?;
    let sale_products: (i64,) = sqlx::query_as("SELECT count(*) FROM products WHERE is_on_sale")
        .fetch_one(&state.pool)
        .await?;
    let recent_news: (i64,) =
        sqlx::query_as("SELECT count(*) FROM news WHERE published_at >= now() - interval '7 days'")
            .fetch_one(&state.pool)
            .await?;
    let total_revenue: (Option<i64>,) = sqlx::query_as("SELECT sum(total) FROM orders")
        .fetch_one(&state.pool)
        .await?;

    let recent_orders = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .limit(5)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<Order>>>()?;

    Ok(ApiResponse::success(
        "Stats",
        StatsResponse {
            total_products: total_products.0,
            total_news: total_news.0,
            total_users: total_users.0,
            total_orders: total_orders.0,
            new_products: new_products.0,
            sale_products: sale_products.0,
            recent_news: recent_news.0,
            total_revenue: total_revenue.0.unwrap_or(0),
            recent_orders,
        },
        None,
    ))
}

pub async fn list_logs(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<LogList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize(50);

    let items: Vec<AdminLogEntry> = sqlx::query_as(
        "SELECT id, admin_id, admin_email, action, details, ip, created_at \
         FROM admin_logs ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT count(*) FROM admin_logs")
        .fetch_one(&state.pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("Logs", LogList { items }, Some(meta)))
}

pub async fn create_log(
    state: &AppState,
    user: &AuthUser,
    payload: CreateLogRequest,
    ip: Option<&str>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if payload.action.is_empty() {
        return Err(AppError::BadRequest("action is required".into()));
    }

    log_admin_action(&state.pool, user, &payload.action, payload.details, ip).await?;

    Ok(ApiResponse::success(
        "Log created",
        serde_json::json!({}),
        None,
    ))
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<AdminOrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize(20);

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
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
        AdminOrderList { items: orders },
        Some(meta),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status = OrderStatus::parse(&payload.status)
        .ok_or_else(|| AppError::BadRequest("Invalid order status".into()))?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_admin_action(
        &state.pool,
        user,
        "order_status_update",
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "admin log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}
