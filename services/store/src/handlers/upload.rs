use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::error::StoreServiceError;
use crate::handlers::ok;
use crate::infra::cloudinary::upload_signature;
use crate::state::AppState;

/// Folders the admin screens upload into.
const UPLOAD_FOLDERS: &[&str] = &["products", "categories", "banners"];

// ── GET /admin/upload-signature ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UploadSignatureQuery {
    pub folder: Option<String>,
}

pub async fn get_upload_signature(
    State(state): State<AppState>,
    Query(query): Query<UploadSignatureQuery>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let folder = query
        .folder
        .map(|f| f.trim().to_owned())
        .filter(|f| !f.is_empty())
        .ok_or(StoreServiceError::MissingField("folder"))?;
    if !UPLOAD_FOLDERS.contains(&folder.as_str()) {
        return Err(StoreServiceError::InvalidInput(format!(
            "folder must be one of {}",
            UPLOAD_FOLDERS.join(", ")
        )));
    }
    let signature = upload_signature(&state.cloudinary, &folder, chrono::Utc::now().timestamp());
    Ok(ok(signature))
}
