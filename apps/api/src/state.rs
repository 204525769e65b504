use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Data access. Default: `PgStore`.
    pub store: Arc<dyn Store>,
    /// Image bucket client.
    pub s3: S3Client,
    /// AI text generation. Default: `LlmClient`.
    pub ai: Arc<dyn TextGenerator>,
    pub config: Config,
}
