use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::authors::listing::{annotate_authors, paginate, AuthorEntry, AUTHORS_PAGE_SIZE};
use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::extract::Query;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuthorsQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorsResponse {
    pub users: Vec<AuthorEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_next: Option<bool>,
}

/// GET /api/v1/authors
///
/// All users, each flagged with `profile` when they have written an article.
/// With `?page=N`, only authors are returned, six per page.
pub async fn handle_list_authors(
    State(state): State<AppState>,
    Query(params): Query<AuthorsQuery>,
) -> Result<Envelope<AuthorsResponse>, AppError> {
    let users = state.store.list_users().await?;
    let author_ids = state.store.distinct_author_ids().await?;
    let followers = state.store.followers_by_user().await?;

    let entries = annotate_authors(users, &author_ids, followers);

    let response = match params.page {
        None => AuthorsResponse {
            users: entries,
            page: None,
            total: None,
            has_next: None,
        },
        Some(page) => {
            let authors: Vec<_> = entries.into_iter().filter(|e| e.profile).collect();
            let sliced = paginate(authors, page, AUTHORS_PAGE_SIZE);
            AuthorsResponse {
                users: sliced.items,
                page: Some(sliced.page),
                total: Some(sliced.total),
                has_next: Some(sliced.has_next),
            }
        }
    };

    Ok(Envelope::ok(response).with_message("Users loaded successfully"))
}
