pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::UPLOAD_BODY_LIMIT;
use crate::{admin, articles, authors, categories, profile, resume, studio, upload};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Articles
        .route(
            "/api/v1/articles",
            get(articles::handlers::handle_list_articles)
                .post(articles::handlers::handle_create_article),
        )
        .route(
            "/api/v1/articles/:slug",
            get(articles::handlers::handle_get_article)
                .put(articles::handlers::handle_update_article),
        )
        .route(
            "/api/v1/articles/:slug/view",
            post(articles::handlers::handle_record_article_view),
        )
        .route(
            "/api/v1/articles/:slug/like",
            post(articles::handlers::handle_like_article),
        )
        .route(
            "/api/v1/articles/:slug/summary",
            post(articles::handlers::handle_summarize_article),
        )
        // Authors & profiles
        .route("/api/v1/authors", get(authors::handlers::handle_list_authors))
        .route(
            "/api/v1/profile/:email",
            get(profile::handlers::handle_get_profile),
        )
        .route(
            "/api/v1/profile/:email/view",
            post(profile::handlers::handle_record_view),
        )
        .route(
            "/api/v1/profile/:email/follow",
            post(profile::handlers::handle_toggle_follow),
        )
        // Categories
        .route(
            "/api/v1/category",
            get(categories::handlers::handle_list_categories)
                .post(categories::handlers::handle_create_category),
        )
        .route(
            "/api/v1/category/accordion",
            get(categories::handlers::handle_category_accordion),
        )
        .route(
            "/api/v1/category/:id",
            get(categories::handlers::handle_get_category),
        )
        // AI
        .route("/api/v1/ai/resume", post(resume::handlers::handle_resume))
        .route(
            "/api/v1/ai/studio",
            post(studio::handlers::handle_generate_article),
        )
        .route("/api/v1/ai/saved", get(studio::handlers::handle_list_saved))
        // Admin & uploads
        .route("/api/v1/admin", get(admin::handle_admin_dashboard))
        .route(
            "/api/v1/upload",
            post(upload::handle_upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
