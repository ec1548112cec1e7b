use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::locale::LocalizedInput;
use crate::models::NewsArticle;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNewsRequest {
    pub title: LocalizedInput,
    pub excerpt: LocalizedInput,
    pub content: LocalizedInput,
    pub author: String,
    pub image: String,
    pub category: String,
    pub featured: Option<bool>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNewsRequest {
    pub title: Option<LocalizedInput>,
    pub excerpt: Option<LocalizedInput>,
    pub content: Option<LocalizedInput>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct NewsList {
    #[schema(value_type = Vec<NewsArticle>)]
    pub items: Vec<NewsArticle>,
}
