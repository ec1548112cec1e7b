use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult, middleware::auth::AuthUser};

/// Append an entry to the admin action log. Callers treat failures as
/// non-fatal and log them instead of aborting the primary operation.
pub async fn log_admin_action(
    pool: &DbPool,
    admin: &AuthUser,
    action: &str,
    details: Option<Value>,
    ip: Option<&str>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO admin_logs (id, admin_id, admin_email, action, details, ip)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(admin.user_id)
    .bind(&admin.email)
    .bind(action)
    .bind(details)
    .bind(ip.unwrap_or("unknown"))
    .execute(pool)
    .await?;

    Ok(())
}
