use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::news::{CreateNewsRequest, NewsList, UpdateNewsRequest},
    entity::news::{ActiveModel, Column, Entity as News, Model as NewsModel},
    error::{AppError, AppResult},
    images,
    locale::{FieldKind, LocalizedText, from_stored, to_stored},
    models::NewsArticle,
    response::{ApiResponse, Meta},
    routes::params::{NewsQuery, NewsSortBy, SortOrder},
    state::AppState,
};

/// Reading-time heuristic: one minute per 200 words of the Ukrainian body,
/// never reported as zero.
pub fn estimate_read_time(content: &LocalizedText) -> i32 {
    let words = content.uk.split_whitespace().count() as i32;
    ((words + 199) / 200).max(1)
}

pub async fn list_news(state: &AppState, query: NewsQuery) -> AppResult<ApiResponse<NewsList>> {
    let (page, limit, offset) = query.pagination().normalize(10);
    let mut condition = Condition::all();

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        let mut any = Condition::any().add(Expr::col(Column::Author).ilike(pattern.clone()));
        for field in ["title", "excerpt"] {
            for lang in ["uk", "en"] {
                any = any.add(Expr::cust_with_values(
                    format!("{field}->>'{lang}' ILIKE ?"),
                    [pattern.clone()],
                ));
            }
        }
        condition = condition.add(any);
    }

    if let Some(featured) = query.featured {
        condition = condition.add(Column::Featured.eq(featured));
    }

    let sort_by = query.sort_by.unwrap_or(NewsSortBy::PublishedAt);
    let sort_order = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };

    let mut finder = News::find().filter(condition);
    finder = match sort_by {
        NewsSortBy::PublishedAt => finder.order_by(Column::PublishedAt, sort_order),
        NewsSortBy::CreatedAt => finder.order_by(Column::CreatedAt, sort_order),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(news_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("News", NewsList { items }, Some(meta)))
}

pub async fn get_news(state: &AppState, id: Uuid) -> AppResult<ApiResponse<NewsArticle>> {
    let result = News::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(news_from_entity);
    let result = match result {
        Some(n) => n,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("News article", result, None))
}

pub async fn create_news(
    state: &AppState,
    payload: CreateNewsRequest,
) -> AppResult<ApiResponse<NewsArticle>> {
    if payload.author.is_empty() || payload.image.is_empty() || payload.category.is_empty() {
        return Err(AppError::BadRequest(
            "author, image and category are required".into(),
        ));
    }

    let content = payload.content.normalize(FieldKind::FreeText);
    let read_time = estimate_read_time(&content);

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(to_stored(&payload.title.normalize(FieldKind::FreeText))),
        excerpt: Set(to_stored(&payload.excerpt.normalize(FieldKind::FreeText))),
        content: Set(to_stored(&content)),
        author: Set(payload.author),
        image: Set(payload.image),
        category: Set(payload.category),
        featured: Set(payload.featured.unwrap_or(false)),
        read_time: Set(read_time),
        published_at: match payload.published_at {
            Some(at) => Set(at.into()),
            None => NotSet,
        },
        created_at: NotSet,
        updated_at: NotSet,
    };
    let article = active.insert(&state.orm).await?;

    Ok(ApiResponse::success(
        "News created",
        news_from_entity(article),
        Some(Meta::empty()),
    ))
}

pub async fn update_news(
    state: &AppState,
    id: Uuid,
    payload: UpdateNewsRequest,
) -> AppResult<ApiResponse<NewsArticle>> {
    let existing = News::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(n) => n,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(to_stored(&title.normalize(FieldKind::FreeText)));
    }
    if let Some(excerpt) = payload.excerpt {
        active.excerpt = Set(to_stored(&excerpt.normalize(FieldKind::FreeText)));
    }
    if let Some(content) = payload.content {
        let content = content.normalize(FieldKind::FreeText);
        active.read_time = Set(estimate_read_time(&content));
        active.content = Set(to_stored(&content));
    }
    if let Some(author) = payload.author {
        active.author = Set(author);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(featured) = payload.featured {
        active.featured = Set(featured);
    }
    if let Some(published_at) = payload.published_at {
        active.published_at = Set(published_at.into());
    }
    active.updated_at = Set(Utc::now().into());

    let article = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        news_from_entity(article),
        Some(Meta::empty()),
    ))
}

pub async fn delete_news(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = News::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn news_from_entity(model: NewsModel) -> NewsArticle {
    let image_url = images::resolve(&model.image);
    NewsArticle {
        id: model.id,
        title: from_stored(model.title, FieldKind::FreeText),
        excerpt: from_stored(model.excerpt, FieldKind::FreeText),
        content: from_stored(model.content, FieldKind::FreeText),
        author: model.author,
        image: model.image,
        image_url,
        category: model.category,
        featured: model.featured,
        read_time: model.read_time,
        published_at: model.published_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_time_rounds_up_and_never_reports_zero() {
        let short = LocalizedText::new("одне два три", "one two three");
        assert_eq!(estimate_read_time(&short), 1);

        let words = vec!["слово"; 401].join(" ");
        let long = LocalizedText::new(words, "");
        assert_eq!(estimate_read_time(&long), 3);
    }

    #[test]
    fn read_time_of_empty_content_is_at_least_one() {
        let empty = LocalizedText::uniform("");
        assert!(estimate_read_time(&empty) >= 1);
    }
}
