use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gka_domain::order::{OrderStatus, PaymentMethod, PaymentStatus, TimelineEntry};
use gka_domain::pricing::OrderTotals;
use gka_domain::user::UserRole;

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lowercase and trim an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub const MIN_PASSWORD_LEN: usize = 8;

/// Reduce an Indian mobile number to its 10 digits.
///
/// Spaces, dashes and a leading `+91` / `91` / `0` are dropped. Returns `None`
/// unless exactly 10 digits remain.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw
        .trim()
        .trim_start_matches('+')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let local = match digits.len() {
        12 if digits.starts_with("91") => &digits[2..],
        11 if digits.starts_with('0') => &digits[1..],
        _ => digits.as_str(),
    };
    (local.len() == 10).then(|| local.to_owned())
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub category_id: Option<Uuid>,
    pub image_url: String,
    pub image_public_id: String,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial product update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<Option<f64>>,
    pub category_id: Option<Option<Uuid>>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.original_price.is_none()
            && self.category_id.is_none()
            && self.image_url.is_none()
            && self.image_public_id.is_none()
            && self.in_stock.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub image_public_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.image_url.is_none() && self.image_public_id.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub id: Uuid,
    pub title: String,
    pub link: Option<String>,
    pub image_url: String,
    pub image_public_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct BannerPatch {
    pub title: Option<String>,
    pub link: Option<Option<String>>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

impl BannerPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.link.is_none()
            && self.image_url.is_none()
            && self.image_public_id.is_none()
    }
}

/// Maximum number of products returned by a search.
pub const SEARCH_LIMIT: u64 = 20;

// ── Cart ─────────────────────────────────────────────────────────────────────

/// Denormalized cart line as the storefront sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    pub qty: u32,
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(alias = "id")]
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub qty: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub landmark: Option<String>,
}

impl ShippingAddress {
    /// Single-line address printed on labels and shown in order history.
    ///
    /// `"<line>, <landmark>, <city>, <state> - <pincode>"`; the landmark is
    /// skipped when absent or blank.
    pub fn full_address(&self) -> String {
        let mut parts = vec![self.address_line.trim()];
        if let Some(landmark) = self.landmark.as_deref().map(str::trim) {
            if !landmark.is_empty() {
                parts.push(landmark);
            }
        }
        parts.push(self.city.trim());
        parts.push(self.state.trim());
        format!("{} - {}", parts.join(", "), self.pincode.trim())
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping: ShippingAddress,
    pub full_address: String,
    pub items: Vec<OrderItem>,
    pub totals: OrderTotals,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub cashfree_order_id: Option<String>,
    pub payment_session_id: Option<String>,
    pub notes: Option<String>,
    pub delivery_preference: Option<String>,
    pub timeline: Vec<TimelineEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Move to `status` and append the timeline entry.
    pub fn set_status(&mut self, status: OrderStatus, note: Option<String>) {
        let entry = TimelineEntry::now(status, note);
        self.updated_at = entry.at;
        self.order_status = status;
        self.timeline.push(entry);
    }
}

/// The status pair an order was read with. A guarded write lands only while
/// the stored row still carries both values, so a concurrent change to either
/// column makes the writer reload and decide again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderGuard {
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
}

impl OrderGuard {
    pub fn of(order: &Order) -> Self {
        Self {
            payment_status: order.payment_status,
            order_status: order.order_status,
        }
    }
}

// ── Payments ─────────────────────────────────────────────────────────────────

/// Order registration sent to the payment gateway.
#[derive(Debug, Clone)]
pub struct GatewayOrderRequest {
    pub order_id: String,
    pub amount: f64,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
}

/// Gateway's answer to an order registration.
#[derive(Debug, Clone)]
pub struct GatewayOrder {
    pub order_id: String,
    pub payment_session_id: String,
}

/// One payment attempt reported by the gateway.
#[derive(Debug, Clone)]
pub struct GatewayPayment {
    pub payment_status: String,
    pub payment_time: Option<DateTime<Utc>>,
}

// ── Uploads ──────────────────────────────────────────────────────────────────

/// Parameters for a signed direct browser upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSignature {
    pub timestamp: i64,
    pub signature: String,
    pub api_key: String,
    pub cloud_name: String,
    pub folder: String,
}

// ── Outbox ───────────────────────────────────────────────────────────────────

/// Outbox event for async delivery (e.g. OTP SMS).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Outbox `kind` for a phone OTP awaiting SMS delivery.
pub const OTP_CREATED_EVENT: &str = "otp_created";

// ── OTP ──────────────────────────────────────────────────────────────────────

/// OTP length in digits.
pub const OTP_LEN: usize = 6;

/// OTP time-to-live in seconds.
pub const OTP_TTL_SECS: u64 = 300;

/// Maximum OTP sends per phone within [`OTP_SEND_WINDOW_SECS`].
pub const OTP_SEND_LIMIT: u64 = 5;

pub const OTP_SEND_WINDOW_SECS: u64 = 600;

/// How long a verified phone may be used for checkout, in seconds.
pub const PHONE_VERIFIED_TTL_SECS: u64 = 1800;
