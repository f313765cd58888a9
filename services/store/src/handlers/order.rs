use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gka_auth_types::identity::Identity;
use gka_domain::order::{OrderStatus, PaymentMethod, PaymentStatus, TimelineEntry};
use gka_domain::pagination::PageRequest;
use gka_domain::pricing::OrderTotals;

use crate::domain::types::{Order, OrderItem, ShippingAddress};
use crate::error::StoreServiceError;
use crate::handlers::{JsonBody, non_blank, ok};
use crate::state::AppState;
use crate::usecase::order::{
    AdminListOrdersUseCase, CancelOrderUseCase, CreateOrderInput, CreateOrderUseCase,
    GetOrderUseCase, ListMyOrdersUseCase, UpdateOrderStatusInput, UpdateOrderStatusUseCase,
};

// ── Views ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ShippingView {
    pub name: String,
    pub phone: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub landmark: Option<String>,
}

#[derive(Serialize)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping: ShippingView,
    pub full_address: String,
    pub items: Vec<OrderItem>,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub cashfree_order_id: Option<String>,
    pub payment_session_id: Option<String>,
    pub notes: Option<String>,
    pub delivery_preference: Option<String>,
    pub timeline: Vec<TimelineEntry>,
    #[serde(serialize_with = "gka_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "gka_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            shipping: ShippingView {
                name: o.shipping.name,
                phone: o.shipping.phone,
                address_line: o.shipping.address_line,
                city: o.shipping.city,
                state: o.shipping.state,
                pincode: o.shipping.pincode,
                landmark: o.shipping.landmark,
            },
            full_address: o.full_address,
            items: o.items,
            totals: o.totals,
            payment_method: o.payment_method,
            payment_status: o.payment_status,
            order_status: o.order_status,
            cashfree_order_id: o.cashfree_order_id,
            payment_session_id: o.payment_session_id,
            notes: o.notes,
            delivery_preference: o.delivery_preference,
            timeline: o.timeline,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct OrderBody {
    pub order: OrderView,
}

#[derive(Serialize)]
pub struct OrdersBody {
    pub orders: Vec<OrderView>,
}

fn parse_status(raw: &str) -> Result<OrderStatus, StoreServiceError> {
    raw.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|e: gka_domain::order::ParseStatusError| StoreServiceError::InvalidInput(e.to_string()))
}

// ── POST /order/create ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "address")]
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub landmark: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub delivery_preference: Option<String>,
}

#[derive(Serialize)]
pub struct CreateOrderBody {
    pub order: OrderView,
    pub cashfree_order_id: Option<String>,
    pub payment_session_id: Option<String>,
}

pub async fn create_order(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateOrderRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let payment_method = match non_blank(body.payment_method) {
        None => return Err(StoreServiceError::MissingField("payment_method")),
        Some(raw) => raw
            .trim()
            .to_ascii_lowercase()
            .parse::<PaymentMethod>()
            .map_err(|e| StoreServiceError::InvalidInput(e.to_string()))?,
    };
    let usecase = CreateOrderUseCase {
        orders: state.order_repo(),
        users: state.user_repo(),
        gateway: state.payment_gateway(),
        otp: state.otp_store(),
    };
    let order = usecase
        .execute(CreateOrderInput {
            user_id: identity.user_id,
            shipping: ShippingAddress {
                name: body.name.unwrap_or_default(),
                phone: body.phone.unwrap_or_default(),
                address_line: body.address_line.unwrap_or_default(),
                city: body.city.unwrap_or_default(),
                state: body.state.unwrap_or_default(),
                pincode: body.pincode.unwrap_or_default(),
                landmark: body.landmark,
            },
            items: body.items,
            payment_method,
            notes: body.notes,
            delivery_preference: body.delivery_preference,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        ok(CreateOrderBody {
            cashfree_order_id: order.cashfree_order_id.clone(),
            payment_session_id: order.payment_session_id.clone(),
            order: order.into(),
        }),
    ))
}

// ── GET /order/my ────────────────────────────────────────────────────────────

pub async fn list_my_orders(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = ListMyOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = usecase.execute(identity.user_id).await?;
    Ok(ok(OrdersBody {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

// ── GET /order/{id} ──────────────────────────────────────────────────────────

pub async fn get_order(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = GetOrderUseCase {
        orders: state.order_repo(),
    };
    let order = usecase.execute(identity.user_id, id).await?;
    Ok(ok(OrderBody {
        order: order.into(),
    }))
}

// ── POST /order/{id}/cancel ──────────────────────────────────────────────────

pub async fn cancel_order(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = CancelOrderUseCase {
        orders: state.order_repo(),
    };
    let order = usecase.execute(identity.user_id, id).await?;
    Ok(ok(OrderBody {
        order: order.into(),
    }))
}

// ── GET /admin/orders ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct AdminOrdersQuery {
    pub status: Option<String>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn admin_list_orders(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<impl IntoResponse, StoreServiceError> {
    let query: AdminOrdersQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| StoreServiceError::InvalidInput(format!("invalid query: {e}")))?
        .unwrap_or_default();
    let status = non_blank(query.status)
        .as_deref()
        .map(parse_status)
        .transpose()?;
    let usecase = AdminListOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = usecase
        .execute(status, PageRequest::from_query(query.per_page, query.page))
        .await?;
    Ok(ok(OrdersBody {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

// ── PATCH /admin/orders/{id}/status ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: Option<String>,
    pub note: Option<String>,
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let status = non_blank(body.status).ok_or(StoreServiceError::MissingField("status"))?;
    let usecase = UpdateOrderStatusUseCase {
        orders: state.order_repo(),
    };
    let order = usecase
        .execute(UpdateOrderStatusInput {
            order_id: id,
            status: parse_status(&status)?,
            note: body.note,
        })
        .await?;
    Ok(ok(OrderBody {
        order: order.into(),
    }))
}
