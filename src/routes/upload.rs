use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    routing::post,
};

use crate::{
    dto::uploads::{DeleteImageQuery, UploadResponse},
    error::{AppError, AppResult},
    images,
    middleware::auth::{AuthUser, ensure_admin},
    response::ApiResponse,
    services::image_service,
    state::AppState,
};

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new().route("/image", post(upload_image).delete(delete_image))
}

#[utoipa::path(
    post,
    path = "/api/upload/image",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image uploaded", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Missing file, wrong type or too large"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Uploads"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    ensure_admin(&user)?;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file = Some((filename, content_type, data.to_vec()));
        break;
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Файл не надано".into()))?;

    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest("Файл повинен бути зображенням".into()));
    }
    if data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest(
            "Розмір файлу не повинен перевищувати 10MB".into(),
        ));
    }

    let resp = match &state.image_host {
        Some(host) => {
            let uploaded = host
                .upload(&filename, &content_type, data)
                .await
                .map_err(AppError::Internal)?;
            UploadResponse {
                url: uploaded.url,
                public_id: uploaded.public_id,
            }
        }
        // No external host configured: the internal chunk store serves it.
        None => {
            let id = image_service::store_image(&state.pool, &filename, &content_type, &data)
                .await?;
            UploadResponse {
                url: images::resolve(&id),
                public_id: id,
            }
        }
    };

    Ok(Json(ApiResponse::success(
        "Зображення успішно завантажено",
        resp,
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/upload/image",
    params(
        ("public_id" = String, Query, description = "External public id or internal object id")
    ),
    responses(
        (status = 200, description = "Image deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown internal image id"),
    ),
    security(("bearer_auth" = [])),
    tag = "Uploads"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DeleteImageQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;

    if query.public_id.is_empty() {
        return Err(AppError::BadRequest("Public ID зображення не надано".into()));
    }

    if let Some(id) = images::extract_object_id(&query.public_id) {
        image_service::delete_image(&state.pool, id).await?;
    } else {
        let host = state
            .image_host
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Image host is not configured".into()))?;
        host.delete(&query.public_id).await.map_err(AppError::Internal)?;
    }

    Ok(Json(ApiResponse::success(
        "Зображення успішно видалено",
        serde_json::json!({}),
        None,
    )))
}
