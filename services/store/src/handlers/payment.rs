use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use gka_auth_types::identity::Identity;
use gka_domain::order::{GatewayPaymentStatus, OrderStatus, PaymentStatus};

use crate::domain::types::Order;
use crate::error::StoreServiceError;
use crate::handlers::ok;
use crate::handlers::order::OrderView;
use crate::infra::cashfree::verify_webhook_signature;
use crate::state::AppState;
use crate::usecase::payment::{ResolvePaymentUseCase, VerifyPaymentUseCase};

const WEBHOOK_SIGNATURE_HEADER: &str = "x-webhook-signature";
const WEBHOOK_TIMESTAMP_HEADER: &str = "x-webhook-timestamp";

#[derive(Serialize)]
pub struct PaymentBody {
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub order: OrderView,
}

impl From<Order> for PaymentBody {
    fn from(order: Order) -> Self {
        Self {
            payment_status: order.payment_status,
            order_status: order.order_status,
            order: order.into(),
        }
    }
}

// ── POST /order/cashfree/webhook ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct WebhookPayload {
    pub data: WebhookData,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub order: WebhookOrder,
    pub payment: WebhookPayment,
}

#[derive(Deserialize)]
pub struct WebhookOrder {
    pub order_id: String,
}

#[derive(Deserialize)]
pub struct WebhookPayment {
    pub payment_status: String,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub async fn cashfree_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, StoreServiceError> {
    if state.cashfree.verify_webhooks {
        let (Some(signature), Some(timestamp)) = (
            header(&headers, WEBHOOK_SIGNATURE_HEADER),
            header(&headers, WEBHOOK_TIMESTAMP_HEADER),
        ) else {
            return Err(StoreServiceError::InvalidWebhookSignature);
        };
        if !verify_webhook_signature(timestamp, &body, signature, &state.cashfree.client_secret) {
            tracing::warn!("webhook signature mismatch");
            return Err(StoreServiceError::InvalidWebhookSignature);
        }
    }

    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| StoreServiceError::InvalidInput(format!("invalid webhook body: {e}")))?;
    let status = GatewayPaymentStatus::parse(&payload.data.payment.payment_status);
    tracing::info!(
        cashfree_order_id = %payload.data.order.order_id,
        payment_status = %payload.data.payment.payment_status,
        "cashfree webhook received"
    );

    let usecase = ResolvePaymentUseCase {
        orders: state.order_repo(),
    };
    let order = usecase
        .execute(&payload.data.order.order_id, &status)
        .await?;
    Ok(ok(PaymentBody::from(order)))
}

// ── GET /order/verify/{cashfree_order_id} ────────────────────────────────────

pub async fn verify_payment(
    identity: Identity,
    State(state): State<AppState>,
    Path(cashfree_order_id): Path<String>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = VerifyPaymentUseCase {
        resolve: ResolvePaymentUseCase {
            orders: state.order_repo(),
        },
        gateway: state.payment_gateway(),
    };
    let order = usecase.execute(identity.user_id, &cashfree_order_id).await?;
    Ok(ok(PaymentBody::from(order)))
}
