use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CartLine;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveCartRequest {
    pub items: Vec<CartLine>,
}

/// Partial server-side mutation mirroring the storefront's PUT contract.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CartUpdateRequest {
    pub action: CartAction,
    pub item_id: String,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CartAction {
    Remove,
    Update,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CartContents {
    #[schema(value_type = Vec<CartLine>)]
    pub items: Vec<CartLine>,
}
