use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::ai_article::AiArticle;
use crate::models::article::{Article, ArticleChanges, ArticleCounter, NewArticle};
use crate::models::category::Category;
use crate::models::user::{ProfileView, User};
use crate::store::{NewProfileView, Store};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation to `Conflict`; everything else stays a DB error.
fn conflict_on_unique(e: sqlx::Error, what: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("{what} already exists"))
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn follower_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(sqlx::query_scalar(
            "SELECT follower_id FROM follows WHERE followee_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn followers_by_user(&self) -> Result<HashMap<Uuid, Vec<Uuid>>, AppError> {
        let edges: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT followee_id, follower_id FROM follows ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (followee, follower) in edges {
            map.entry(followee).or_default().push(follower);
        }
        Ok(map)
    }

    async fn toggle_follow(&self, follower: Uuid, followee: Uuid) -> Result<bool, AppError> {
        let removed =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
                .bind(follower)
                .bind(followee)
                .execute(&self.pool)
                .await?
                .rows_affected();

        if removed > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(follower)
        .bind(followee)
        .execute(&self.pool)
        .await?;
        Ok(true)
    }

    async fn record_profile_view(
        &self,
        view: NewProfileView,
        retention: i64,
    ) -> Result<ProfileView, AppError> {
        let mut tx = self.pool.begin().await?;

        let recorded = sqlx::query_as::<_, ProfileView>(
            r#"
            INSERT INTO profile_views (id, user_id, viewer_id, ip_address)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(view.user_id)
        .bind(view.viewer_id)
        .bind(&view.ip_address)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET view_count = view_count + 1 WHERE id = $1")
            .bind(view.user_id)
            .execute(&mut *tx)
            .await?;

        let trimmed = sqlx::query(
            r#"
            DELETE FROM profile_views
            WHERE id IN (
                SELECT id FROM profile_views
                WHERE user_id = $1
                ORDER BY viewed_at DESC, id DESC
                OFFSET $2
            )
            "#,
        )
        .bind(view.user_id)
        .bind(retention)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if trimmed > 0 {
            debug!(
                "Trimmed {trimmed} profile views for user {} (retention {retention})",
                view.user_id
            );
        }
        Ok(recorded)
    }

    async fn profile_views(&self, user_id: Uuid) -> Result<Vec<ProfileView>, AppError> {
        Ok(sqlx::query_as::<_, ProfileView>(
            "SELECT * FROM profile_views WHERE user_id = $1 ORDER BY viewed_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_articles(&self, catid: Option<Uuid>) -> Result<Vec<Article>, AppError> {
        Ok(sqlx::query_as::<_, Article>(
            r#"
            SELECT * FROM articles
            WHERE $1::UUID IS NULL OR catid = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(catid)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn articles_by_author(&self, author_id: Uuid) -> Result<Vec<Article>, AppError> {
        Ok(sqlx::query_as::<_, Article>(
            "SELECT * FROM articles WHERE author_id = $1 ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError> {
        Ok(
            sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_article(&self, article: NewArticle) -> Result<Article, AppError> {
        let inserted = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles
                (id, slug, title, content, featured_image, category, catid, author_id, publish_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.featured_image)
        .bind(&article.category)
        .bind(article.catid)
        .bind(article.author_id)
        .bind(&article.publish_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "An article with this slug"))?;

        info!("Inserted article {} ({})", inserted.id, inserted.slug);
        Ok(inserted)
    }

    async fn update_article(
        &self,
        id: Uuid,
        changes: &ArticleChanges,
    ) -> Result<Article, AppError> {
        sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles SET
                slug           = COALESCE($2, slug),
                title          = COALESCE($3, title),
                content        = COALESCE($4, content),
                featured_image = COALESCE($5, featured_image),
                category       = COALESCE($6, category),
                catid          = COALESCE($7, catid),
                publish_type   = COALESCE($8, publish_type),
                updated_at     = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.slug)
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(&changes.featured_image)
        .bind(&changes.category)
        .bind(changes.catid)
        .bind(&changes.publish_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "An article with this slug"))?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))
    }

    async fn increment_article_counter(
        &self,
        slug: &str,
        counter: ArticleCounter,
    ) -> Result<Option<i64>, AppError> {
        let column = counter.column();
        let sql = format!(
            "UPDATE articles SET {column} = {column} + 1 WHERE slug = $1 RETURNING {column}"
        );
        Ok(sqlx::query_scalar(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn distinct_author_ids(&self) -> Result<Vec<Uuid>, AppError> {
        Ok(sqlx::query_scalar("SELECT DISTINCT author_id FROM articles")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count_articles(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn total_article_views(&self) -> Result<i64, AppError> {
        Ok(
            sqlx::query_scalar("SELECT COALESCE(SUM(views), 0)::BIGINT FROM articles")
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY category ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_category(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, category, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Category"))
    }

    async fn list_ai_articles(&self, author: Uuid) -> Result<Vec<AiArticle>, AppError> {
        Ok(sqlx::query_as::<_, AiArticle>(
            "SELECT * FROM ai_articles WHERE author = $1 ORDER BY created_at DESC",
        )
        .bind(author)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_ai_article(
        &self,
        author: Uuid,
        content: &str,
    ) -> Result<AiArticle, AppError> {
        Ok(sqlx::query_as::<_, AiArticle>(
            "INSERT INTO ai_articles (id, author, content) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(author)
        .bind(content)
        .fetch_one(&self.pool)
        .await?)
    }
}
