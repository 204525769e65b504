//! Data access layer.
//!
//! Handlers never touch SQL directly; they go through the `Store` trait carried
//! in `AppState` as `Arc<dyn Store>`. `PgStore` is the production backend,
//! `MemoryStore` backs the handler tests.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::ai_article::AiArticle;
use crate::models::article::{Article, ArticleChanges, ArticleCounter, NewArticle};
use crate::models::category::Category;
use crate::models::user::{ProfileView, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// A profile view about to be appended to the log.
#[derive(Debug, Clone)]
pub struct NewProfileView {
    pub user_id: Uuid,
    pub viewer_id: Option<Uuid>,
    pub ip_address: String,
}

#[async_trait]
pub trait Store: Send + Sync {
    // ── Users ───────────────────────────────────────────────────────────────
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn count_users(&self) -> Result<i64, AppError>;

    // ── Follows ─────────────────────────────────────────────────────────────
    async fn follower_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError>;
    /// Followers of every user that has at least one, keyed by followee.
    async fn followers_by_user(&self) -> Result<HashMap<Uuid, Vec<Uuid>>, AppError>;
    /// Flips the follow edge and returns whether `follower` now follows `followee`.
    async fn toggle_follow(&self, follower: Uuid, followee: Uuid) -> Result<bool, AppError>;

    // ── Profile views ───────────────────────────────────────────────────────
    /// Appends to the view log, bumps the user's lifetime counter, and trims the
    /// log to the newest `retention` rows for that user.
    async fn record_profile_view(
        &self,
        view: NewProfileView,
        retention: i64,
    ) -> Result<ProfileView, AppError>;
    /// Retained views for a user, newest first.
    async fn profile_views(&self, user_id: Uuid) -> Result<Vec<ProfileView>, AppError>;

    // ── Articles ────────────────────────────────────────────────────────────
    async fn list_articles(&self, catid: Option<Uuid>) -> Result<Vec<Article>, AppError>;
    async fn articles_by_author(&self, author_id: Uuid) -> Result<Vec<Article>, AppError>;
    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError>;
    async fn insert_article(&self, article: NewArticle) -> Result<Article, AppError>;
    async fn update_article(
        &self,
        id: Uuid,
        changes: &ArticleChanges,
    ) -> Result<Article, AppError>;
    /// Atomically adds one to a counter; `None` if the slug is unknown.
    async fn increment_article_counter(
        &self,
        slug: &str,
        counter: ArticleCounter,
    ) -> Result<Option<i64>, AppError>;
    async fn distinct_author_ids(&self) -> Result<Vec<Uuid>, AppError>;
    async fn count_articles(&self) -> Result<i64, AppError>;
    async fn total_article_views(&self) -> Result<i64, AppError>;

    // ── Categories ──────────────────────────────────────────────────────────
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError>;
    async fn insert_category(&self, name: &str, description: &str)
        -> Result<Category, AppError>;

    // ── AI studio ───────────────────────────────────────────────────────────
    async fn list_ai_articles(&self, author: Uuid) -> Result<Vec<AiArticle>, AppError>;
    async fn insert_ai_article(&self, author: Uuid, content: &str)
        -> Result<AiArticle, AppError>;
}
