use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub category: Option<String>,
    pub catid: Option<Uuid>,
    pub author_id: Uuid,
    pub likes: i64,
    pub views: i64,
    pub publish_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when an author creates an article.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub category: Option<String>,
    pub catid: Option<Uuid>,
    pub author_id: Uuid,
    pub publish_type: String,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub category: Option<String>,
    pub catid: Option<Uuid>,
    pub publish_type: Option<String>,
}

/// Counter columns that can be bumped atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleCounter {
    Views,
    Likes,
}

impl ArticleCounter {
    pub fn column(self) -> &'static str {
        match self {
            ArticleCounter::Views => "views",
            ArticleCounter::Likes => "likes",
        }
    }
}
