pub mod handlers;
pub mod meta;
pub mod prompts;
