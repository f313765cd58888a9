//! Cashfree PG REST client (API version `2023-08-01`).

use anyhow::Context as _;
use aws_lc_rs::hmac;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::CashfreeConfig;
use crate::domain::repository::PaymentGateway;
use crate::domain::types::{GatewayOrder, GatewayOrderRequest, GatewayPayment};
use crate::error::StoreServiceError;

pub const CASHFREE_API_VERSION: &str = "2023-08-01";

/// Check a webhook's `x-webhook-signature`:
/// `base64(HMAC-SHA256(timestamp + raw_body, client_secret))`.
pub fn verify_webhook_signature(
    timestamp: &str,
    raw_body: &[u8],
    signature: &str,
    client_secret: &str,
) -> bool {
    let Ok(tag) = BASE64.decode(signature.trim()) else {
        return false;
    };
    let key = hmac::Key::new(hmac::HMAC_SHA256, client_secret.as_bytes());
    let mut message = Vec::with_capacity(timestamp.len() + raw_body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(raw_body);
    hmac::verify(&key, &message, &tag).is_ok()
}

#[derive(Clone)]
pub struct CashfreeGateway {
    pub http: Client,
    pub config: CashfreeConfig,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    order_id: &'a str,
    order_amount: f64,
    order_currency: &'static str,
    customer_details: CustomerDetails<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_meta: Option<OrderMeta>,
}

#[derive(Serialize)]
struct CustomerDetails<'a> {
    customer_id: &'a str,
    customer_name: &'a str,
    customer_email: &'a str,
    customer_phone: &'a str,
}

#[derive(Serialize)]
struct OrderMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notify_url: Option<String>,
}

#[derive(Deserialize)]
struct CreateOrderResponse {
    order_id: String,
    payment_session_id: String,
}

#[derive(Deserialize)]
struct PaymentEntity {
    payment_status: String,
    #[serde(default)]
    payment_time: Option<DateTime<Utc>>,
}

impl CashfreeGateway {
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        self.http
            .request(method, url)
            .header("x-client-id", &self.config.client_id)
            .header("x-client-secret", &self.config.client_secret)
            .header("x-api-version", CASHFREE_API_VERSION)
    }

    fn order_meta(&self, order_id: &str) -> Option<OrderMeta> {
        let return_url = self
            .config
            .return_url
            .as_ref()
            .map(|url| url.replace("{order_id}", order_id));
        let notify_url = self.config.notify_url.clone();
        if return_url.is_none() && notify_url.is_none() {
            return None;
        }
        Some(OrderMeta {
            return_url,
            notify_url,
        })
    }
}

/// Read a response body, turning non-2xx into an error carrying the body text.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    what: &'static str,
) -> anyhow::Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("{what}: cashfree returned {status}: {body}");
    }
    response.json::<T>().await.context(what)
}

impl PaymentGateway for CashfreeGateway {
    async fn create_order(
        &self,
        request: &GatewayOrderRequest,
    ) -> Result<GatewayOrder, StoreServiceError> {
        let body = CreateOrderBody {
            order_id: &request.order_id,
            order_amount: request.amount,
            order_currency: "INR",
            customer_details: CustomerDetails {
                customer_id: &request.customer_id,
                customer_name: &request.customer_name,
                customer_email: &request.customer_email,
                customer_phone: &request.customer_phone,
            },
            order_meta: self.order_meta(&request.order_id),
        };
        let result: anyhow::Result<CreateOrderResponse> = async {
            let response = self
                .request(reqwest::Method::POST, "/pg/orders")
                .json(&body)
                .send()
                .await
                .context("send create order")?;
            read_json(response, "create order").await
        }
        .await;
        let created = result.map_err(StoreServiceError::PaymentGateway)?;
        tracing::info!(order_id = %created.order_id, "cashfree order created");
        Ok(GatewayOrder {
            order_id: created.order_id,
            payment_session_id: created.payment_session_id,
        })
    }

    async fn fetch_payments(
        &self,
        cashfree_order_id: &str,
    ) -> Result<Vec<GatewayPayment>, StoreServiceError> {
        let path = format!("/pg/orders/{cashfree_order_id}/payments");
        let result: anyhow::Result<Vec<PaymentEntity>> = async {
            let response = self
                .request(reqwest::Method::GET, &path)
                .send()
                .await
                .context("send fetch payments")?;
            read_json(response, "fetch payments").await
        }
        .await;
        let payments = result.map_err(StoreServiceError::PaymentGateway)?;
        Ok(payments
            .into_iter()
            .map(|p| GatewayPayment {
                payment_status: p.payment_status,
                payment_time: p.payment_time,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(return_url: Option<&str>, notify_url: Option<&str>) -> CashfreeGateway {
        CashfreeGateway {
            http: Client::new(),
            config: CashfreeConfig {
                client_id: "id".into(),
                client_secret: "secret".into(),
                base_url: "https://sandbox.cashfree.com/".into(),
                return_url: return_url.map(str::to_owned),
                notify_url: notify_url.map(str::to_owned),
                verify_webhooks: true,
            },
        }
    }

    #[test]
    fn should_substitute_order_id_into_return_url() {
        let meta = gateway(Some("https://shop.example/order/verify/{order_id}"), None)
            .order_meta("order_abc")
            .unwrap();
        assert_eq!(
            meta.return_url.as_deref(),
            Some("https://shop.example/order/verify/order_abc")
        );
        assert!(meta.notify_url.is_none());
    }

    #[test]
    fn should_omit_order_meta_without_urls() {
        assert!(gateway(None, None).order_meta("order_abc").is_none());
    }

    #[test]
    fn should_serialize_create_order_body() {
        let body = CreateOrderBody {
            order_id: "order_abc",
            order_amount: 448.0,
            order_currency: "INR",
            customer_details: CustomerDetails {
                customer_id: "u1",
                customer_name: "Asha",
                customer_email: "asha@example.com",
                customer_phone: "9876543210",
            },
            order_meta: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["order_amount"], 448.0);
        assert_eq!(json["customer_details"]["customer_phone"], "9876543210");
        assert!(json.get("order_meta").is_none());
    }

    fn sign(timestamp: &str, body: &[u8], secret: &str) -> String {
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(body);
        BASE64.encode(hmac::sign(&key, &message).as_ref())
    }

    #[test]
    fn should_accept_valid_webhook_signature() {
        let body = br#"{"type":"PAYMENT_SUCCESS_WEBHOOK"}"#;
        let signature = sign("1710000000", body, "cf-secret");
        assert!(verify_webhook_signature("1710000000", body, &signature, "cf-secret"));
    }

    #[test]
    fn should_reject_tampered_webhook() {
        let body = br#"{"type":"PAYMENT_SUCCESS_WEBHOOK"}"#;
        let signature = sign("1710000000", body, "cf-secret");
        assert!(!verify_webhook_signature("1710000001", body, &signature, "cf-secret"));
        assert!(!verify_webhook_signature("1710000000", b"{}", &signature, "cf-secret"));
        assert!(!verify_webhook_signature("1710000000", body, &signature, "other"));
        assert!(!verify_webhook_signature("1710000000", body, "not base64!", "cf-secret"));
    }

    #[test]
    fn should_parse_payment_entities() {
        let raw = r#"[{"cf_payment_id":"1","payment_status":"SUCCESS","payment_time":"2024-03-09T18:30:00+05:30"}]"#;
        let payments: Vec<PaymentEntity> = serde_json::from_str(raw).unwrap();
        assert_eq!(payments[0].payment_status, "SUCCESS");
        assert!(payments[0].payment_time.is_some());
    }
}
