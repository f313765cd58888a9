//! Order lifecycle types: payment method, payment/order status and the timeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Returned when a stored or submitted status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $s,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    _ => Err(ParseStatusError {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cashfree,
    Cod,
}

string_enum!(PaymentMethod, "payment method", {
    Cashfree => "cashfree",
    Cod => "cod",
});

/// Settlement state of an order's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Cod,
}

string_enum!(PaymentStatus, "payment status", {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
    Cod => "cod",
});

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

string_enum!(OrderStatus, "order status", {
    Created => "created",
    Confirmed => "confirmed",
    Processing => "processing",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
    Returned => "returned",
});

impl OrderStatus {
    /// Legal fulfilment transitions.
    ///
    /// Forward chain `created → confirmed → processing → shipped → delivered`,
    /// cancellation before shipping, and returns after delivery.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Created, Confirmed)
                | (Confirmed, Processing)
                | (Processing, Shipped)
                | (Shipped, Delivered)
                | (Created | Confirmed | Processing, Cancelled)
                | (Delivered, Returned)
        )
    }

    /// Customers may cancel only before the store starts processing.
    pub fn is_cancellable_by_customer(self) -> bool {
        matches!(self, Self::Created | Self::Confirmed)
    }
}

/// Payment status reported by the gateway (`payment_status` field).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayPaymentStatus {
    Success,
    Failed,
    /// `PENDING`, `USER_DROPPED`, `NOT_ATTEMPTED` and the like. Never settles a payment.
    Other(String),
}

impl GatewayPaymentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => Self::Success,
            "FAILED" => Self::Failed,
            other => Self::Other(other.to_owned()),
        }
    }

    /// State an order with a pending online payment moves to, or `None` if the
    /// gateway status does not settle the payment.
    pub fn settlement(&self) -> Option<(PaymentStatus, OrderStatus)> {
        match self {
            Self::Success => Some((PaymentStatus::Paid, OrderStatus::Confirmed)),
            Self::Failed => Some((PaymentStatus::Failed, OrderStatus::Cancelled)),
            Self::Other(_) => None,
        }
    }
}

/// One entry of an order's append-only status log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: OrderStatus,
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

impl TimelineEntry {
    pub fn now(status: OrderStatus, note: impl Into<Option<String>>) -> Self {
        Self {
            status,
            note: note.into(),
            at: Utc::now(),
        }
    }
}
