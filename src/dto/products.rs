use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::locale::LocalizedInput;
use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: LocalizedInput,
    pub description: LocalizedInput,
    pub price: i64,
    pub original_price: Option<i64>,
    pub image: String,
    pub category: LocalizedInput,
    #[serde(rename = "type")]
    pub product_type: LocalizedInput,
    pub weight: LocalizedInput,
    pub origin: LocalizedInput,
    pub is_new: Option<bool>,
    pub is_on_sale: Option<bool>,
    pub in_stock: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<LocalizedInput>,
    pub description: Option<LocalizedInput>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub image: Option<String>,
    pub category: Option<LocalizedInput>,
    #[serde(rename = "type")]
    pub product_type: Option<LocalizedInput>,
    pub weight: Option<LocalizedInput>,
    pub origin: Option<LocalizedInput>,
    pub is_new: Option<bool>,
    pub is_on_sale: Option<bool>,
    pub in_stock: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
