//! Image uploads to the object-storage bucket.

use aws_sdk_s3::primitives::ByteStream;
use axum::extract::{multipart::MultipartRejection, Multipart, State};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::session::Session;
use crate::state::AppState;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
/// Request body limit for the upload route: the image plus multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 64 * 1024;
const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// File extension for an accepted image content type.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Content type implied by the file's leading bytes.
fn sniff(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

/// Checks the declared type, size and magic bytes; returns the extension.
pub fn validate_image(content_type: &str, bytes: &[u8]) -> Result<&'static str, AppError> {
    let ext = extension_for(content_type).ok_or_else(|| {
        AppError::Validation("Only PNG, JPEG, WEBP and GIF images are allowed".to_string())
    })?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Image file is empty".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::Validation("Image must be 5 MB or smaller".to_string()));
    }
    if sniff(bytes) != Some(content_type) {
        return Err(AppError::Validation(
            "File contents do not match the declared image type".to_string(),
        ));
    }
    Ok(ext)
}

pub fn object_key(user_id: Uuid, ext: &str) -> String {
    format!("images/{}/{}.{}", user_id, Uuid::new_v4(), ext)
}

/// POST /api/v1/upload
pub async fn handle_upload_image(
    State(state): State<AppState>,
    session: Session,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Envelope<UploadResponse>, AppError> {
    let mut multipart = multipart?;
    let mut image: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart data: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
        image = Some((content_type, bytes));
        break;
    }

    let (content_type, bytes) =
        image.ok_or_else(|| AppError::Validation("image is required".to_string()))?;
    let ext = validate_image(&content_type, &bytes)?;

    let key = object_key(session.user_id, ext);
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Upload of {key} failed: {e}")))?;

    info!("Uploaded s3://{}/{}", state.config.s3_bucket, key);

    Ok(Envelope::created(UploadResponse {
        url: format!("{}/{}", state.config.s3_public_url, key),
    }))
}
