//! Cloudinary signing and image deletion.

use std::fmt::Write as _;

use anyhow::Context as _;
use aws_lc_rs::digest;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::CloudinaryConfig;
use crate::domain::repository::ImageStore;
use crate::domain::types::UploadSignature;
use crate::error::StoreServiceError;

#[derive(Clone)]
pub struct CloudinaryImageStore {
    pub http: Client,
    pub config: CloudinaryConfig,
}

/// Cloudinary request signature: hex SHA-1 of `k1=v1&k2=v2...` (keys sorted)
/// followed by the API secret.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let hash = digest::digest(
        &digest::SHA1_FOR_LEGACY_USE_ONLY,
        format!("{joined}{api_secret}").as_bytes(),
    );
    hash.as_ref().iter().fold(String::with_capacity(40), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Parameters for a signed direct browser upload into `folder`.
pub fn upload_signature(config: &CloudinaryConfig, folder: &str, timestamp: i64) -> UploadSignature {
    let ts = timestamp.to_string();
    let signature = sign_params(&[("folder", folder), ("timestamp", &ts)], &config.api_secret);
    UploadSignature {
        timestamp,
        signature,
        api_key: config.api_key.clone(),
        cloud_name: config.cloud_name.clone(),
        folder: folder.to_owned(),
    }
}

#[derive(Serialize)]
struct DestroyBody<'a> {
    public_id: &'a str,
    timestamp: i64,
    api_key: &'a str,
    signature: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

impl ImageStore for CloudinaryImageStore {
    async fn destroy(&self, public_id: &str) -> Result<(), StoreServiceError> {
        let timestamp = chrono::Utc::now().timestamp();
        let ts = timestamp.to_string();
        let body = DestroyBody {
            public_id,
            timestamp,
            api_key: &self.config.api_key,
            signature: sign_params(
                &[("public_id", public_id), ("timestamp", &ts)],
                &self.config.api_secret,
            ),
        };
        let url = format!(
            "{}/v1_1/{}/image/destroy",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name
        );
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .context("send cloudinary destroy")?
            .error_for_status()
            .context("cloudinary destroy status")?;
        let parsed: DestroyResponse = response.json().await.context("decode cloudinary destroy")?;
        // "not found" means the image is already gone.
        if parsed.result != "ok" && parsed.result != "not found" {
            return Err(anyhow::anyhow!("cloudinary destroy returned {:?}", parsed.result).into());
        }
        Ok(())
    }
}
