use axum::{extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::extract::{Json, Path};
use crate::models::article::Article;
use crate::models::user::{ProfileView, User};
use crate::session::Session;
use crate::state::AppState;
use crate::store::NewProfileView;

const UNKNOWN_IP: &str = "unknown";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordViewRequest {
    pub viewer_id: Option<Uuid>,
    pub ip_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordedView {
    pub view: ProfileView,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub followers: Vec<Uuid>,
    pub views: Vec<ProfileView>,
    pub articles: Vec<Article>,
}

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub following: bool,
    pub followers: usize,
}

async fn load_user(state: &AppState, email: &str) -> Result<User, AppError> {
    state
        .store
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// First hop of `X-Forwarded-For`, when the caller did not report its own address.
fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// GET /api/v1/profile/:email
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Envelope<ProfileResponse>, AppError> {
    let user = load_user(&state, &email).await?;
    let followers = state.store.follower_ids(user.id).await?;
    let views = state.store.profile_views(user.id).await?;
    let articles = state.store.articles_by_author(user.id).await?;

    Ok(Envelope::ok(ProfileResponse {
        user,
        followers,
        views,
        articles,
    }))
}

/// POST /api/v1/profile/:email/view
///
/// Appends a view; repeated views from the same viewer are all kept.
pub async fn handle_record_view(
    State(state): State<AppState>,
    Path(email): Path<String>,
    headers: HeaderMap,
    Json(req): Json<RecordViewRequest>,
) -> Result<Envelope<RecordedView>, AppError> {
    let user = load_user(&state, &email).await?;

    let ip_address = req
        .ip_address
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| forwarded_ip(&headers))
        .unwrap_or_else(|| UNKNOWN_IP.to_string());

    let view = state
        .store
        .record_profile_view(
            NewProfileView {
                user_id: user.id,
                viewer_id: req.viewer_id,
                ip_address,
            },
            state.config.profile_view_retention,
        )
        .await?;

    Ok(Envelope::ok(RecordedView { view }).with_message("View recorded successfully"))
}

/// POST /api/v1/profile/:email/follow
///
/// Toggles the caller's follow of the profile owner.
pub async fn handle_toggle_follow(
    State(state): State<AppState>,
    session: Session,
    Path(email): Path<String>,
) -> Result<Envelope<FollowResponse>, AppError> {
    let target = load_user(&state, &email).await?;
    if target.id == session.user_id {
        return Err(AppError::Validation("You cannot follow yourself".to_string()));
    }

    let following = state.store.toggle_follow(session.user_id, target.id).await?;
    let followers = state.store.follower_ids(target.id).await?.len();

    info!(
        "User {} {} {}",
        session.user_id,
        if following { "followed" } else { "unfollowed" },
        target.id
    );

    Ok(Envelope::ok(FollowResponse {
        following,
        followers,
    }))
}
