//! Admin dashboard totals.

use axum::extract::State;
use serde::Serialize;

use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub users: i64,
    pub articles: i64,
    /// Sum of every article's view counter.
    pub views: i64,
}

/// GET /api/v1/admin
pub async fn handle_admin_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<Envelope<DashboardStats>, AppError> {
    session.require_admin()?;

    let users = state.store.count_users().await?;
    let articles = state.store.count_articles().await?;
    let views = state.store.total_article_views().await?;

    Ok(Envelope::ok(DashboardStats {
        users,
        articles,
        views,
    }))
}
