use uuid::Uuid;

use crate::{
    cart::CartStore,
    db::DbPool,
    dto::cart::{CartAction, CartContents, CartUpdateRequest, SaveCartRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartLine,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Remote adapter for [`CartStore`]: the per-user cart document, upserted as
/// a whole on every save.
pub struct DbCartStore {
    pool: DbPool,
    user_id: Uuid,
}

impl DbCartStore {
    pub fn new(pool: DbPool, user_id: Uuid) -> Self {
        Self { pool, user_id }
    }

    async fn load_document(&self) -> Result<Option<Vec<CartLine>>, AppError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT items FROM carts WHERE user_id = $1")
                .bind(self.user_id)
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some((value,)) => {
                let items = serde_json::from_value(value)
                    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
                Ok(Some(items))
            }
            None => Ok(None),
        }
    }
}

impl CartStore for DbCartStore {
    type Error = AppError;

    async fn load(&self) -> Result<Vec<CartLine>, Self::Error> {
        Ok(self.load_document().await?.unwrap_or_default())
    }

    async fn save(&mut self, items: &[CartLine]) -> Result<(), Self::Error> {
        let value = serde_json::to_value(items).map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        sqlx::query(
            r#"
            INSERT INTO carts (user_id, items)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET items = EXCLUDED.items, updated_at = now()
            "#,
        )
        .bind(self.user_id)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), Self::Error> {
        sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(self.user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartContents>> {
    let store = DbCartStore::new(state.pool.clone(), user.user_id);
    let items = store.load().await?;
    Ok(ApiResponse::success("OK", CartContents { items }, None))
}

pub async fn save_cart(
    state: &AppState,
    user: &AuthUser,
    payload: SaveCartRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let mut store = DbCartStore::new(state.pool.clone(), user.user_id);
    store.save(&payload.items).await?;
    Ok(ApiResponse::success(
        "Cart saved successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn update_cart(
    state: &AppState,
    user: &AuthUser,
    payload: CartUpdateRequest,
) -> AppResult<ApiResponse<CartContents>> {
    if payload.item_id.is_empty() {
        return Err(AppError::BadRequest("itemId is required".into()));
    }

    let mut store = DbCartStore::new(state.pool.clone(), user.user_id);
    let mut items = match store.load_document().await? {
        Some(items) => items,
        None => return Err(AppError::NotFound),
    };

    match payload.action {
        CartAction::Remove => items.retain(|line| line.id != payload.item_id),
        CartAction::Update => {
            let quantity = payload
                .quantity
                .ok_or_else(|| AppError::BadRequest("quantity is required".into()))?;
            if quantity <= 0 {
                items.retain(|line| line.id != payload.item_id);
            } else if let Some(line) = items.iter_mut().find(|line| line.id == payload.item_id) {
                line.quantity = quantity;
            }
        }
    }

    store.save(&items).await?;

    Ok(ApiResponse::success(
        "Cart updated successfully",
        CartContents { items },
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let mut store = DbCartStore::new(state.pool.clone(), user.user_id);
    store.clear().await?;
    Ok(ApiResponse::success(
        "Cart cleared successfully",
        serde_json::json!({}),
        None,
    ))
}
