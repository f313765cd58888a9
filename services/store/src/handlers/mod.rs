use axum::Json;
use axum::extract::FromRequest;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StoreServiceError;

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod otp;
pub mod payment;
pub mod upload;
pub mod user;

/// Success body: `{"success": true, ...payload fields}`.
#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

/// JSON request body whose rejection is a [`StoreServiceError::InvalidInput`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(StoreServiceError))]
pub struct JsonBody<T>(pub T);

/// Treat blank strings as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Patch field that tells `null` (clear) apart from absent (keep).
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub(crate) fn nullable<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}
