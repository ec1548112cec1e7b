use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::{
    dto::admin::{CreateNotificationRequest, NotificationAction, NotificationList, NotificationUpdateRequest},
    entity::notifications::{ActiveModel, Column, Entity as Notifications, Model as NotificationModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Notification,
    response::{ApiResponse, Meta},
    state::AppState,
};

const RECENT_LIMIT: u64 = 20;

pub async fn list_notifications(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<NotificationList>> {
    ensure_admin(user)?;

    let unread_count = Notifications::find()
        .filter(Column::Read.eq(false))
        .filter(Column::Kind.eq("admin"))
        .count(&state.orm)
        .await? as i64;

    let notifications = Notifications::find()
        .filter(Column::Kind.eq("admin"))
        .order_by_desc(Column::CreatedAt)
        .limit(RECENT_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(notification_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Notifications",
        NotificationList {
            unread_count,
            notifications,
        },
        None,
    ))
}

pub async fn create_notification(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNotificationRequest,
) -> AppResult<ApiResponse<Notification>> {
    ensure_admin(user)?;
    if payload.title.is_empty() || payload.message.is_empty() {
        return Err(AppError::BadRequest("title and message are required".into()));
    }

    let model = insert_notification(
        state,
        &payload.title,
        &payload.message,
        payload.related_id.as_deref(),
        payload.related_type.as_deref(),
    )
    .await?;

    Ok(ApiResponse::success(
        "Notification created",
        notification_from_entity(model),
        Some(Meta::empty()),
    ))
}

pub async fn update_notification(
    state: &AppState,
    user: &AuthUser,
    payload: NotificationUpdateRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let existing = Notifications::find_by_id(payload.notification_id)
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(n) => n,
        None => return Err(AppError::NotFound),
    };

    match payload.action {
        NotificationAction::MarkAsRead | NotificationAction::MarkAsUnread => {
            let read = matches!(payload.action, NotificationAction::MarkAsRead);
            let mut active: ActiveModel = existing.into();
            active.read = Set(read);
            active.update(&state.orm).await?;
        }
        NotificationAction::Delete => {
            Notifications::delete_by_id(payload.notification_id)
                .exec(&state.orm)
                .await?;
        }
    }

    Ok(ApiResponse::success(
        "Notification updated",
        serde_json::json!({}),
        None,
    ))
}

/// Best-effort admin notification for a freshly created order; the caller
/// logs failures and moves on.
pub async fn notify_new_order(
    state: &AppState,
    order_number: &str,
    customer_email: &str,
    total: i64,
) -> AppResult<()> {
    insert_notification(
        state,
        "Нове замовлення",
        &format!(
            "Отримано нове замовлення №{order_number} від {customer_email} на суму ₴{total}"
        ),
        Some(order_number),
        Some("order"),
    )
    .await?;
    Ok(())
}

async fn insert_notification(
    state: &AppState,
    title: &str,
    message: &str,
    related_id: Option<&str>,
    related_type: Option<&str>,
) -> AppResult<NotificationModel> {
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title.to_string()),
        message: Set(message.to_string()),
        kind: Set("admin".to_string()),
        read: Set(false),
        related_id: Set(related_id.map(str::to_string)),
        related_type: Set(related_type.map(str::to_string)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(model)
}

fn notification_from_entity(model: NotificationModel) -> Notification {
    Notification {
        id: model.id,
        title: model.title,
        message: model.message,
        kind: model.kind,
        read: model.read,
        related_id: model.related_id,
        related_type: model.related_type,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
