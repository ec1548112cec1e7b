use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::news::{CreateNewsRequest, NewsList, UpdateNewsRequest},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::NewsArticle,
    response::ApiResponse,
    routes::params::NewsQuery,
    services::news_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_news).post(create_news))
        .route("/{id}", get(get_news).put(update_news).delete(delete_news))
}

#[utoipa::path(
    get,
    path = "/api/news",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 10"),
        ("category" = Option<String>, Query, description = "Exact category match"),
        ("search" = Option<String>, Query, description = "Substring search over title/excerpt/author"),
        ("featured" = Option<bool>, Query, description = "Featured articles only"),
        ("sort_by" = Option<String>, Query, description = "published_at or created_at"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "List news", body = ApiResponse<NewsList>)
    ),
    tag = "News"
)]
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> AppResult<Json<ApiResponse<NewsList>>> {
    let resp = news_service::list_news(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/news/{id}",
    params(
        ("id" = Uuid, Path, description = "News ID")
    ),
    responses(
        (status = 200, description = "Get news article", body = ApiResponse<NewsArticle>),
        (status = 404, description = "Not found"),
    ),
    tag = "News"
)]
pub async fn get_news(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<NewsArticle>>> {
    let resp = news_service::get_news(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/news",
    request_body = CreateNewsRequest,
    responses(
        (status = 201, description = "Create news article", body = ApiResponse<NewsArticle>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "News"
)]
pub async fn create_news(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateNewsRequest>,
) -> AppResult<(axum::http::StatusCode, Json<ApiResponse<NewsArticle>>)> {
    ensure_admin(&user)?;
    let resp = news_service::create_news(&state, payload).await?;
    Ok((axum::http::StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/news/{id}",
    params(
        ("id" = Uuid, Path, description = "News ID")
    ),
    request_body = UpdateNewsRequest,
    responses(
        (status = 200, description = "Updated news article", body = ApiResponse<NewsArticle>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "News"
)]
pub async fn update_news(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNewsRequest>,
) -> AppResult<Json<ApiResponse<NewsArticle>>> {
    ensure_admin(&user)?;
    let resp = news_service::update_news(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/news/{id}",
    params(
        ("id" = Uuid, Path, description = "News ID")
    ),
    responses(
        (status = 200, description = "Deleted news article"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "News"
)]
pub async fn delete_news(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let resp = news_service::delete_news(&state, id).await?;
    Ok(Json(resp))
}
