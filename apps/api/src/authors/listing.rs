//! Author annotation and page slicing for the authors directory.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::models::user::User;

/// Authors shown per directory page.
pub const AUTHORS_PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorEntry {
    #[serde(flatten)]
    pub user: User,
    pub followers: Vec<Uuid>,
    /// True iff the user has authored at least one article.
    pub profile: bool,
}

/// Marks every user with whether they appear among the article authors.
pub fn annotate_authors(
    users: Vec<User>,
    author_ids: &[Uuid],
    mut followers: HashMap<Uuid, Vec<Uuid>>,
) -> Vec<AuthorEntry> {
    let authors: HashSet<Uuid> = author_ids.iter().copied().collect();
    users
        .into_iter()
        .map(|user| AuthorEntry {
            profile: authors.contains(&user.id),
            followers: followers.remove(&user.id).unwrap_or_default(),
            user,
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total: usize,
    pub has_next: bool,
}

/// 1-based page slice; page 0 is treated as page 1.
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> Page<T> {
    let page = page.max(1);
    let total = items.len();
    let start = (page - 1).saturating_mul(limit);
    let items: Vec<T> = items.into_iter().skip(start).take(limit).collect();
    Page {
        has_next: start.saturating_add(limit) < total,
        items,
        page,
        total,
    }
}
