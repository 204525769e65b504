use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::extract::Json;
use crate::models::ai_article::AiArticle;
use crate::session::Session;
use crate::state::AppState;
use crate::studio::meta::{extract_meta, ArticleMeta};
use crate::studio::prompts::{NO_KEYWORDS, STUDIO_PROMPT_TEMPLATE, STUDIO_SYSTEM};

#[derive(Debug, Deserialize)]
pub struct StudioRequest {
    pub topic: String,
    #[serde(default)]
    pub keywords: Option<String>,
}

/// A saved studio article with its metadata pulled out of the content.
#[derive(Debug, Serialize)]
pub struct SavedArticle {
    #[serde(flatten)]
    pub article: AiArticle,
    #[serde(flatten)]
    pub meta: ArticleMeta,
}

impl From<AiArticle> for SavedArticle {
    fn from(article: AiArticle) -> Self {
        let meta = extract_meta(&article.content);
        Self { article, meta }
    }
}

#[derive(Debug, Serialize)]
pub struct StudioResponse {
    pub article: SavedArticle,
}

#[derive(Debug, Serialize)]
pub struct SavedList {
    pub articles: Vec<SavedArticle>,
}

/// POST /api/v1/ai/studio
pub async fn handle_generate_article(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<StudioRequest>,
) -> Result<Envelope<StudioResponse>, AppError> {
    session.require_verified()?;
    let topic = req.topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("topic is required".to_string()));
    }
    let keywords = req
        .keywords
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(NO_KEYWORDS);

    let prompt = STUDIO_PROMPT_TEMPLATE
        .replace("{topic}", topic)
        .replace("{keywords}", keywords);

    let content = state
        .ai
        .complete(&prompt, STUDIO_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Studio generation failed: {e}")))?;

    let saved = state
        .store
        .insert_ai_article(session.user_id, content.trim())
        .await?;
    info!("Saved studio article {} for {}", saved.id, session.email);

    Ok(Envelope::created(StudioResponse {
        article: saved.into(),
    })
    .with_message("Article generated successfully"))
}

/// GET /api/v1/ai/saved
pub async fn handle_list_saved(
    State(state): State<AppState>,
    session: Session,
) -> Result<Envelope<SavedList>, AppError> {
    let articles = state
        .store
        .list_ai_articles(session.user_id)
        .await?
        .into_iter()
        .map(SavedArticle::from)
        .collect();
    Ok(Envelope::ok(SavedList { articles }))
}
