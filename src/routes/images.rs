use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
    routing::get,
};

use crate::{
    error::{AppError, AppResult},
    services::image_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(serve_image))
}

#[utoipa::path(
    get,
    path = "/api/images/{id}",
    params(
        ("id" = String, Path, description = "Content-store object id (24 hex chars)")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*"),
        (status = 400, description = "Invalid image id"),
        (status = 404, description = "Image not found"),
    ),
    tag = "Images"
)]
pub async fn serve_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let stored = match image_service::find_image(&state.pool, &id).await? {
        Some(stored) => stored,
        None => return Err(AppError::NotFound),
    };

    let stream = image_service::image_stream(state.pool.clone(), stored.id);
    let body = Body::from_stream(stream);

    Response::builder()
        .header(header::CONTENT_TYPE, stored.content_type)
        .header(header::CONTENT_LENGTH, stored.length)
        .header(header::CACHE_CONTROL, "public, max-age=31536000")
        .body(body)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))
}
