use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::categories::accordion::{AccordionView, CategoryAccordion, Column};
use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::extract::{Json, Path, Query};
use crate::models::article::Article;
use crate::models::category::Category;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub category: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedCategory {
    pub category: Category,
}

#[derive(Debug, Serialize)]
pub struct CategoryWithArticles {
    pub category: Category,
    pub articles: Vec<Article>,
}

/// Items to toggle open, one per column.
#[derive(Debug, Deserialize)]
pub struct AccordionQuery {
    pub left: Option<usize>,
    pub right: Option<usize>,
}

/// GET /api/v1/category
pub async fn handle_list_categories(
    State(state): State<AppState>,
) -> Result<Envelope<CategoryList>, AppError> {
    let categories = state.store.list_categories().await?;
    Ok(Envelope::ok(CategoryList { categories }))
}

/// POST /api/v1/category
pub async fn handle_create_category(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<Envelope<CreatedCategory>, AppError> {
    session.require_admin()?;

    let name = req.category.trim();
    if name.is_empty() {
        return Err(AppError::Validation("category is required".to_string()));
    }

    let category = state
        .store
        .insert_category(name, req.description.trim())
        .await?;
    info!("Admin {} created category '{}'", session.user_id, category.category);

    Ok(Envelope::created(CreatedCategory { category }))
}

/// GET /api/v1/category/:id
pub async fn handle_get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Envelope<CategoryWithArticles>, AppError> {
    let category = state
        .store
        .find_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
    let articles = state.store.list_articles(Some(id)).await?;
    Ok(Envelope::ok(CategoryWithArticles { category, articles }))
}

/// GET /api/v1/category/accordion
pub async fn handle_category_accordion(
    State(state): State<AppState>,
    Query(params): Query<AccordionQuery>,
) -> Result<Envelope<AccordionView<Category>>, AppError> {
    let categories = state.store.list_categories().await?;
    let mut accordion = CategoryAccordion::new(categories);
    if let Some(i) = params.left {
        accordion.toggle(Column::Left, i);
    }
    if let Some(i) = params.right {
        accordion.toggle(Column::Right, i);
    }
    Ok(Envelope::ok(accordion.into_view()))
}
