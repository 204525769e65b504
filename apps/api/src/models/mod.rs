pub mod ai_article;
pub mod article;
pub mod category;
pub mod user;
