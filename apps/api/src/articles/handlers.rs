//! Axum route handlers for the Articles API.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::articles::prompts::{MAX_SUMMARY_INPUT_CHARS, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::articles::slug::slugify;
use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::extract::{Json, Path, Query};
use crate::models::article::{Article, ArticleChanges, ArticleCounter, NewArticle};
use crate::models::user::User;
use crate::session::Session;
use crate::state::AppState;

const PUBLISH_TYPES: &[&str] = &["draft", "published"];

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    pub category: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ArticleList {
    pub articles: Vec<Article>,
}

#[derive(Debug, Serialize)]
pub struct ArticleWithAuthor {
    pub article: Article,
    pub author: Option<User>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    pub featured_image: Option<String>,
    pub catid: Option<Uuid>,
    pub category: Option<String>,
    pub publish_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedArticle {
    pub article: Article,
}

/// Every field is optional; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub catid: Option<Uuid>,
    pub category: Option<String>,
    pub publish_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CounterValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn normalize_slug(raw: &str) -> Result<String, AppError> {
    let slug = slugify(raw);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "Slug must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(slug)
}

fn require_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn validate_publish_type(value: &str) -> Result<String, AppError> {
    if PUBLISH_TYPES.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(AppError::Validation(format!(
            "publishType must be one of: {}",
            PUBLISH_TYPES.join(", ")
        )))
    }
}

/// Checks `catid` exists and fills the category name from it when not supplied.
async fn resolve_category(
    state: &AppState,
    catid: Option<Uuid>,
    category: Option<String>,
) -> Result<Option<String>, AppError> {
    let Some(id) = catid else {
        return Ok(category);
    };
    let found = state
        .store
        .find_category(id)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown category {id}")))?;
    Ok(Some(category.unwrap_or(found.category)))
}

async fn load_article(state: &AppState, slug: &str) -> Result<Article, AppError> {
    state
        .store
        .find_article_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/articles
pub async fn handle_list_articles(
    State(state): State<AppState>,
    Query(params): Query<ListArticlesQuery>,
) -> Result<Envelope<ArticleList>, AppError> {
    let articles = state.store.list_articles(params.category).await?;
    Ok(Envelope::ok(ArticleList { articles }))
}

/// POST /api/v1/articles
///
/// The caller becomes the author. The slug is derived from the title unless given.
pub async fn handle_create_article(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateArticleRequest>,
) -> Result<Envelope<CreatedArticle>, AppError> {
    session.require_verified()?;
    let title = require_text(&req.title, "title")?;
    let content = require_text(&req.content, "content")?;
    let slug = normalize_slug(req.slug.as_deref().unwrap_or(&title))?;
    let publish_type = validate_publish_type(req.publish_type.as_deref().unwrap_or("draft"))?;
    let category = resolve_category(&state, req.catid, req.category).await?;

    let article = state
        .store
        .insert_article(NewArticle {
            slug,
            title,
            content,
            featured_image: req.featured_image,
            category,
            catid: req.catid,
            author_id: session.user_id,
            publish_type,
        })
        .await?;

    info!("{} created article '{}'", session.email, article.slug);
    Ok(Envelope::created(CreatedArticle { article }).with_message("Article created successfully"))
}

/// GET /api/v1/articles/:slug
///
/// Returns the article and its author; `author` is null if the user record is gone.
pub async fn handle_get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Envelope<ArticleWithAuthor>, AppError> {
    let article = load_article(&state, &slug).await?;
    let author = state.store.find_user_by_id(article.author_id).await?;
    Ok(Envelope::ok(ArticleWithAuthor { article, author }))
}

/// PUT /api/v1/articles/:slug
///
/// Only the article's author may update it.
pub async fn handle_update_article(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Json(req): Json<UpdateArticleRequest>,
) -> Result<Envelope<ArticleWithAuthor>, AppError> {
    let article = load_article(&state, &slug).await?;

    let author = state
        .store
        .find_user_by_id(article.author_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;

    if session.user_id != author.id {
        warn!(
            "User {} attempted to edit article '{}' owned by {}",
            session.user_id, article.slug, author.id
        );
        return Err(AppError::Forbidden(
            "Only author can update/edit the article".to_string(),
        ));
    }

    let changes = ArticleChanges {
        slug: req.slug.as_deref().map(normalize_slug).transpose()?,
        title: req
            .title
            .as_deref()
            .map(|t| require_text(t, "title"))
            .transpose()?,
        content: req
            .content
            .as_deref()
            .map(|c| require_text(c, "content"))
            .transpose()?,
        featured_image: req.featured_image,
        category: resolve_category(&state, req.catid, req.category).await?,
        catid: req.catid,
        publish_type: req
            .publish_type
            .as_deref()
            .map(validate_publish_type)
            .transpose()?,
    };

    let updated = state.store.update_article(article.id, &changes).await?;
    info!("Article '{}' updated by its author", updated.slug);

    Ok(Envelope::ok(ArticleWithAuthor {
        article: updated,
        author: Some(author),
    })
    .with_message("Article updated successfully"))
}

async fn bump(
    state: &AppState,
    slug: &str,
    counter: ArticleCounter,
) -> Result<CounterValue, AppError> {
    let value = state
        .store
        .increment_article_counter(slug, counter)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;
    Ok(match counter {
        ArticleCounter::Views => CounterValue {
            views: Some(value),
            likes: None,
        },
        ArticleCounter::Likes => CounterValue {
            views: None,
            likes: Some(value),
        },
    })
}

/// POST /api/v1/articles/:slug/view
pub async fn handle_record_article_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Envelope<CounterValue>, AppError> {
    Ok(Envelope::ok(bump(&state, &slug, ArticleCounter::Views).await?))
}

/// POST /api/v1/articles/:slug/like
pub async fn handle_like_article(
    State(state): State<AppState>,
    _session: Session,
    Path(slug): Path<String>,
) -> Result<Envelope<CounterValue>, AppError> {
    Ok(Envelope::ok(bump(&state, &slug, ArticleCounter::Likes).await?))
}

/// POST /api/v1/articles/:slug/summary
pub async fn handle_summarize_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Envelope<SummaryResponse>, AppError> {
    let article = load_article(&state, &slug).await?;
    if article.content.trim().is_empty() {
        return Err(AppError::Validation("Article has no content to summarize".to_string()));
    }

    let content: String = article.content.chars().take(MAX_SUMMARY_INPUT_CHARS).collect();
    let prompt = SUMMARY_PROMPT_TEMPLATE
        .replace("{title}", &article.title)
        .replace("{content}", &content);

    let summary = state
        .ai
        .complete(&prompt, SUMMARY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to summarize '{slug}': {e}")))?;

    Ok(Envelope::ok(SummaryResponse {
        message: summary.trim().to_string(),
    }))
}
