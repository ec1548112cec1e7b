use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteImageQuery {
    pub public_id: String,
}
