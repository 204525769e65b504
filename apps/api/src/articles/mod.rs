// Articles: retrieval, authoring, counters and the AI summarizer.

pub mod handlers;
pub mod prompts;
pub mod slug;
