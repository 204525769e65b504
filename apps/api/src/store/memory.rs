//! In-memory `Store` used by the handler tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::ai_article::AiArticle;
use crate::models::article::{Article, ArticleChanges, ArticleCounter, NewArticle};
use crate::models::category::Category;
use crate::models::user::{ProfileView, User};
use crate::store::{NewProfileView, Store};

fn apply_changes(changes: &ArticleChanges, article: &mut Article) {
    if let Some(slug) = &changes.slug {
        article.slug = slug.clone();
    }
    if let Some(title) = &changes.title {
        article.title = title.clone();
    }
    if let Some(content) = &changes.content {
        article.content = content.clone();
    }
    if let Some(image) = &changes.featured_image {
        article.featured_image = Some(image.clone());
    }
    if let Some(category) = &changes.category {
        article.category = Some(category.clone());
    }
    if let Some(catid) = changes.catid {
        article.catid = Some(catid);
    }
    if let Some(publish_type) = &changes.publish_type {
        article.publish_type = publish_type.clone();
    }
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    follows: Vec<(Uuid, Uuid)>,
    views: Vec<ProfileView>,
    articles: Vec<Article>,
    categories: Vec<Category>,
    ai_articles: Vec<AiArticle>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user; signup itself lives with the auth provider.
    pub async fn add_user(&self, email: &str, name: &str, role: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            bio: None,
            image: None,
            role: role.to_string(),
            is_verified: true,
            view_count: 0,
            created_at: Utc::now(),
        };
        self.inner.write().await.users.push(user.clone());
        user
    }

    pub async fn add_article(&self, slug: &str, author_id: Uuid, catid: Option<Uuid>) -> Article {
        self.insert_article(NewArticle {
            slug: slug.to_string(),
            title: format!("Title of {slug}"),
            content: format!("Content of {slug}"),
            featured_image: None,
            category: None,
            catid,
            author_id,
            publish_type: "published".to_string(),
        })
        .await
        .expect("seed article")
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(self.inner.read().await.users.len() as i64)
    }

    async fn follower_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .follows
            .iter()
            .filter(|(_, followee)| *followee == user_id)
            .map(|(follower, _)| *follower)
            .collect())
    }

    async fn followers_by_user(&self) -> Result<HashMap<Uuid, Vec<Uuid>>, AppError> {
        let inner = self.inner.read().await;
        let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (follower, followee) in &inner.follows {
            map.entry(*followee).or_default().push(*follower);
        }
        Ok(map)
    }

    async fn toggle_follow(&self, follower: Uuid, followee: Uuid) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let before = inner.follows.len();
        inner.follows.retain(|edge| *edge != (follower, followee));
        if inner.follows.len() < before {
            return Ok(false);
        }
        inner.follows.push((follower, followee));
        Ok(true)
    }

    async fn record_profile_view(
        &self,
        view: NewProfileView,
        retention: i64,
    ) -> Result<ProfileView, AppError> {
        let mut inner = self.inner.write().await;

        // Keep timestamps strictly increasing per user so ordering is stable.
        let last = inner
            .views
            .iter()
            .filter(|v| v.user_id == view.user_id)
            .map(|v| v.viewed_at)
            .max();
        let now = Utc::now();
        let viewed_at = match last {
            Some(last) if last >= now => last + Duration::microseconds(1),
            _ => now,
        };

        let recorded = ProfileView {
            id: Uuid::new_v4(),
            user_id: view.user_id,
            viewer_id: view.viewer_id,
            ip_address: view.ip_address,
            viewed_at,
        };
        inner.views.push(recorded.clone());

        if let Some(user) = inner.users.iter_mut().find(|u| u.id == view.user_id) {
            user.view_count += 1;
        }

        let retained = inner
            .views
            .iter()
            .filter(|v| v.user_id == view.user_id)
            .count() as i64;
        let mut excess = (retained - retention).max(0);
        // Views are appended chronologically, so the first matches are the oldest.
        inner.views.retain(|v| {
            if excess > 0 && v.user_id == view.user_id {
                excess -= 1;
                false
            } else {
                true
            }
        });

        Ok(recorded)
    }

    async fn profile_views(&self, user_id: Uuid) -> Result<Vec<ProfileView>, AppError> {
        let inner = self.inner.read().await;
        let mut views: Vec<_> = inner
            .views
            .iter()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        views.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
        Ok(views)
    }

    async fn list_articles(&self, catid: Option<Uuid>) -> Result<Vec<Article>, AppError> {
        let inner = self.inner.read().await;
        let mut articles: Vec<_> = inner
            .articles
            .iter()
            .filter(|a| catid.is_none() || a.catid == catid)
            .cloned()
            .collect();
        articles.reverse();
        Ok(articles)
    }

    async fn articles_by_author(&self, author_id: Uuid) -> Result<Vec<Article>, AppError> {
        let inner = self.inner.read().await;
        let mut articles: Vec<_> = inner
            .articles
            .iter()
            .filter(|a| a.author_id == author_id)
            .cloned()
            .collect();
        articles.reverse();
        Ok(articles)
    }

    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.articles.iter().find(|a| a.slug == slug).cloned())
    }

    async fn insert_article(&self, article: NewArticle) -> Result<Article, AppError> {
        let mut inner = self.inner.write().await;
        if inner.articles.iter().any(|a| a.slug == article.slug) {
            return Err(AppError::Conflict(
                "An article with this slug already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let stored = Article {
            id: Uuid::new_v4(),
            slug: article.slug,
            title: article.title,
            content: article.content,
            featured_image: article.featured_image,
            category: article.category,
            catid: article.catid,
            author_id: article.author_id,
            likes: 0,
            views: 0,
            publish_type: article.publish_type,
            created_at: now,
            updated_at: now,
        };
        inner.articles.push(stored.clone());
        Ok(stored)
    }

    async fn update_article(
        &self,
        id: Uuid,
        changes: &ArticleChanges,
    ) -> Result<Article, AppError> {
        let mut inner = self.inner.write().await;
        if let Some(slug) = &changes.slug {
            if inner.articles.iter().any(|a| &a.slug == slug && a.id != id) {
                return Err(AppError::Conflict(
                    "An article with this slug already exists".to_string(),
                ));
            }
        }
        let article = inner
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;
        apply_changes(changes, article);
        article.updated_at = Utc::now();
        Ok(article.clone())
    }

    async fn increment_article_counter(
        &self,
        slug: &str,
        counter: ArticleCounter,
    ) -> Result<Option<i64>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .articles
            .iter_mut()
            .find(|a| a.slug == slug)
            .map(|a| {
                let value = match counter {
                    ArticleCounter::Views => &mut a.views,
                    ArticleCounter::Likes => &mut a.likes,
                };
                *value += 1;
                *value
            }))
    }

    async fn distinct_author_ids(&self) -> Result<Vec<Uuid>, AppError> {
        let inner = self.inner.read().await;
        let ids: HashSet<Uuid> = inner.articles.iter().map(|a| a.author_id).collect();
        Ok(ids.into_iter().collect())
    }

    async fn count_articles(&self) -> Result<i64, AppError> {
        Ok(self.inner.read().await.articles.len() as i64)
    }

    async fn total_article_views(&self) -> Result<i64, AppError> {
        Ok(self.inner.read().await.articles.iter().map(|a| a.views).sum())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut categories = self.inner.read().await.categories.clone();
        categories.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_category(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Category, AppError> {
        let mut inner = self.inner.write().await;
        if inner.categories.iter().any(|c| c.category == name) {
            return Err(AppError::Conflict("Category already exists".to_string()));
        }
        let category = Category {
            id: Uuid::new_v4(),
            category: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn list_ai_articles(&self, author: Uuid) -> Result<Vec<AiArticle>, AppError> {
        let inner = self.inner.read().await;
        let mut articles: Vec<_> = inner
            .ai_articles
            .iter()
            .filter(|a| a.author == author)
            .cloned()
            .collect();
        articles.reverse();
        Ok(articles)
    }

    async fn insert_ai_article(
        &self,
        author: Uuid,
        content: &str,
    ) -> Result<AiArticle, AppError> {
        let article = AiArticle {
            id: Uuid::new_v4(),
            author,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.inner.write().await.ai_articles.push(article.clone());
        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_retention_trims_oldest_but_counter_keeps_total() {
        let store = MemoryStore::new();
        let user = store.add_user("a@example.com", "A", "user").await;

        for i in 0..5 {
            store
                .record_profile_view(
                    NewProfileView {
                        user_id: user.id,
                        viewer_id: None,
                        ip_address: format!("10.0.0.{i}"),
                    },
                    3,
                )
                .await
                .unwrap();
        }

        let views = store.profile_views(user.id).await.unwrap();
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].ip_address, "10.0.0.4");
        assert_eq!(views[2].ip_address, "10.0.0.2");

        let user = store.find_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(user.view_count, 5);
    }

    #[tokio::test]
    async fn test_toggle_follow_flips_edge() {
        let store = MemoryStore::new();
        let a = store.add_user("a@example.com", "A", "user").await;
        let b = store.add_user("b@example.com", "B", "user").await;

        assert!(store.toggle_follow(a.id, b.id).await.unwrap());
        assert_eq!(store.follower_ids(b.id).await.unwrap(), vec![a.id]);
        assert!(!store.toggle_follow(a.id, b.id).await.unwrap());
        assert!(store.follower_ids(b.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_article_keeps_unsupplied_fields() {
        let store = MemoryStore::new();
        let author = store.add_user("a@example.com", "A", "user").await;
        let article = store.add_article("first-post", author.id, None).await;

        let changes = ArticleChanges {
            title: Some("Renamed".to_string()),
            featured_image: Some("https://cdn.example/cover.png".to_string()),
            ..Default::default()
        };
        let updated = store.update_article(article.id, &changes).await.unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.featured_image.as_deref(), Some("https://cdn.example/cover.png"));
        assert_eq!(updated.slug, "first-post");
        assert_eq!(updated.content, "Content of first-post");
        assert_eq!(updated.publish_type, "published");
        assert!(updated.updated_at >= article.updated_at);
    }
}
