use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use gka_core::error::error_body;
use gka_domain::order::OrderStatus;

/// Store service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum StoreServiceError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("missing data")]
    MissingData,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("phone not verified")]
    PhoneNotVerified,
    #[error("forbidden")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("product not found")]
    ProductNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("banner not found")]
    BannerNotFound,
    #[error("order not found")]
    OrderNotFound,
    #[error("category already exists")]
    CategoryAlreadyExists,
    #[error("cannot move order from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },
    #[error("too many otps")]
    TooManyOtps,
    #[error("invalid otp")]
    InvalidOtp,
    #[error("invalid webhook signature")]
    InvalidWebhookSignature,
    #[error("payment gateway error")]
    PaymentGateway(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StoreServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::PhoneNotVerified => "PHONE_NOT_VERIFIED",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::BannerNotFound => "BANNER_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::CategoryAlreadyExists => "CATEGORY_ALREADY_EXISTS",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::TooManyOtps => "TOO_MANY_OTPS",
            Self::InvalidOtp => "INVALID_OTP",
            Self::InvalidWebhookSignature => "INVALID_WEBHOOK_SIGNATURE",
            Self::PaymentGateway(_) => "PAYMENT_GATEWAY",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

/// Malformed or mistyped request bodies answer in the store's error envelope.
impl From<JsonRejection> for StoreServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for StoreServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingField(_) | Self::MissingData | Self::InvalidInput(_) | Self::InvalidOtp => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::InvalidWebhookSignature => StatusCode::UNAUTHORIZED,
            Self::PhoneNotVerified | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::BannerNotFound
            | Self::OrderNotFound => StatusCode::NOT_FOUND,
            Self::EmailAlreadyRegistered
            | Self::CategoryAlreadyExists
            | Self::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            Self::TooManyOtps => StatusCode::TOO_MANY_REQUESTS,
            Self::PaymentGateway(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match &self {
            Self::Internal(e) => tracing::error!(error = %e, kind = "INTERNAL", "internal error"),
            Self::PaymentGateway(e) => {
                tracing::error!(error = %e, kind = "PAYMENT_GATEWAY", "payment gateway error")
            }
            _ => {}
        }
        let body = error_body(self.kind(), self.to_string());
        (status, axum::Json(body)).into_response()
    }
}
