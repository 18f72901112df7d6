//! Product image uploads.
//!
//! Accepts a multipart file, stores it under the upload directory with a
//! random name, and returns a URL the catalog can resolve. The files are
//! served back by a static file layer mounted at `/uploads`.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Extensions accepted by the product image form.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Path the screens store in `Product.image_url`.
    pub url: String,
}

/// POST /api/uploads/images
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
        .ok_or_else(|| ApiError::bad_request("No file in request"))?;

    let original_name = field.file_name().unwrap_or("upload").to_string();
    let extension = sanitize_extension(&original_name)?;

    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

    if data.is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }

    let filename = format!("{}.{}", Uuid::new_v4(), extension);
    let path = state.upload_dir.join(&filename);

    tokio::fs::create_dir_all(&state.upload_dir)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create upload dir: {}", e)))?;
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store upload: {}", e)))?;

    info!(
        original = %original_name,
        stored = %filename,
        bytes = data.len(),
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        url: format!("/uploads/{}", filename),
    }))
}

/// Extracts and checks the file extension. The random stored filename
/// already prevents traversal; this just keeps non-image junk out.
fn sanitize_extension(filename: &str) -> Result<String, ApiError> {
    let extension = filename
        .rsplit('.')
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(ApiError::bad_request(format!(
            "Unsupported file type: {:?}",
            extension
        )))
    }
}
