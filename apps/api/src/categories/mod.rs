pub mod accordion;
pub mod handlers;
