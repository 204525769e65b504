use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Identity record. Rows are created by the auth provider at signup.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub role: String,
    pub is_verified: bool,
    /// Lifetime profile views; unaffected by log retention.
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One entry of a user's profile-view log.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub viewer_id: Option<Uuid>,
    pub ip_address: String,
    pub viewed_at: DateTime<Utc>,
}
