use chrono::Utc;
use uuid::Uuid;

use gka_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use gka_domain::pagination::PageRequest;
use gka_domain::pricing::OrderTotals;

use crate::domain::repository::{OrderRepository, OtpStore, PaymentGateway, UserRepository};
use crate::domain::types::{
    GatewayOrderRequest, Order, OrderGuard, OrderItem, ShippingAddress, normalize_phone,
};
use crate::error::StoreServiceError;
use crate::usecase::user::require;

/// Gateway-side order id for a store order.
pub fn cashfree_order_id(order_id: Uuid) -> String {
    format!("order_{}", order_id.simple())
}

/// Load an order, hiding other users' orders behind `OrderNotFound`.
async fn owned_order<O: OrderRepository>(
    orders: &O,
    user_id: Uuid,
    order_id: Uuid,
) -> Result<Order, StoreServiceError> {
    orders
        .find_by_id(order_id)
        .await?
        .filter(|o| o.user_id == user_id)
        .ok_or(StoreServiceError::OrderNotFound)
}

/// Move `order` to `to` if `allowed` accepts its current status. The write is
/// guarded on the status pair it was read with; a lost race re-reads and
/// checks again, so a concurrent change is either built upon or rejected.
async fn transition<O: OrderRepository>(
    orders: &O,
    mut order: Order,
    to: OrderStatus,
    note: Option<String>,
    allowed: impl Fn(OrderStatus) -> bool,
) -> Result<Order, StoreServiceError> {
    loop {
        let from = order.order_status;
        if !allowed(from) {
            return Err(StoreServiceError::InvalidStatusTransition { from, to });
        }
        let guard = OrderGuard::of(&order);
        let mut updated = order.clone();
        updated.set_status(to, note.clone());
        if orders.update_guarded(&updated, guard).await? {
            return Ok(updated);
        }
        order = orders
            .find_by_id(order.id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
    }
}

// ── CreateOrder ──────────────────────────────────────────────────────────────

pub struct CreateOrderInput {
    pub user_id: Uuid,
    pub shipping: ShippingAddress,
    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub delivery_preference: Option<String>,
}

pub struct CreateOrderUseCase<O, U, G, S>
where
    O: OrderRepository,
    U: UserRepository,
    G: PaymentGateway,
    S: OtpStore,
{
    pub orders: O,
    pub users: U,
    pub gateway: G,
    pub otp: S,
}

fn clean_shipping(raw: ShippingAddress) -> Result<ShippingAddress, StoreServiceError> {
    let name = require(&raw.name, "name")?;
    let phone = require(&raw.phone, "phone")?;
    let phone = normalize_phone(&phone)
        .ok_or_else(|| StoreServiceError::InvalidInput("phone must be a 10 digit mobile number".into()))?;
    let pincode = require(&raw.pincode, "pincode")?;
    if pincode.len() != 6 || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return Err(StoreServiceError::InvalidInput("pincode must be 6 digits".into()));
    }
    Ok(ShippingAddress {
        name,
        phone,
        address_line: require(&raw.address_line, "address_line")?,
        city: require(&raw.city, "city")?,
        state: require(&raw.state, "state")?,
        pincode,
        landmark: raw
            .landmark
            .map(|l| l.trim().to_owned())
            .filter(|l| !l.is_empty()),
    })
}

fn check_items(items: &[OrderItem]) -> Result<(), StoreServiceError> {
    if items.is_empty() {
        return Err(StoreServiceError::MissingField("items"));
    }
    for item in items {
        if item.product_id.trim().is_empty() {
            return Err(StoreServiceError::MissingField("items.product_id"));
        }
        if item.qty == 0 {
            return Err(StoreServiceError::InvalidInput("qty must be at least 1".into()));
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(StoreServiceError::InvalidInput("price must not be negative".into()));
        }
    }
    Ok(())
}

impl<O, U, G, S> CreateOrderUseCase<O, U, G, S>
where
    O: OrderRepository,
    U: UserRepository,
    G: PaymentGateway,
    S: OtpStore,
{
    pub async fn execute(&self, input: CreateOrderInput) -> Result<Order, StoreServiceError> {
        // 1. Validate the request
        let shipping = clean_shipping(input.shipping)?;
        check_items(&input.items)?;

        // 2. Checkout phone must be OTP-verified by this user
        if !self.otp.is_verified(input.user_id, &shipping.phone).await? {
            return Err(StoreServiceError::PhoneNotVerified);
        }

        // 3. Totals and the initial timeline entry
        let totals = OrderTotals::compute(
            input.items.iter().map(|i| (i.price, i.qty)),
            input.payment_method,
            // Discounts are never taken from the request.
            0.0,
        );
        let now = Utc::now();
        let mut order = Order {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            full_address: shipping.full_address(),
            shipping,
            items: input.items,
            totals,
            payment_method: input.payment_method,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Created,
            cashfree_order_id: None,
            payment_session_id: None,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
            delivery_preference: input.delivery_preference.filter(|d| !d.trim().is_empty()),
            timeline: vec![],
            created_at: now,
            updated_at: now,
        };
        order.set_status(OrderStatus::Created, None);

        // 4. Settle by payment method
        match input.payment_method {
            PaymentMethod::Cod => {
                order.payment_status = PaymentStatus::Cod;
                order.set_status(OrderStatus::Confirmed, Some("cash on delivery".into()));
            }
            PaymentMethod::Cashfree => {
                let user = self
                    .users
                    .find_by_id(input.user_id)
                    .await?
                    .ok_or(StoreServiceError::UserNotFound)?;
                let session = self
                    .gateway
                    .create_order(&GatewayOrderRequest {
                        order_id: cashfree_order_id(order.id),
                        amount: order.totals.total_amount,
                        customer_id: user.id.simple().to_string(),
                        customer_name: order.shipping.name.clone(),
                        customer_phone: order.shipping.phone.clone(),
                        customer_email: user.email,
                    })
                    .await?;
                order.cashfree_order_id = Some(session.order_id);
                order.payment_session_id = Some(session.payment_session_id);
            }
        }

        // 5. Persist
        self.orders.create(&order).await?;
        tracing::info!(
            order_id = %order.id,
            payment_method = %order.payment_method,
            total = order.totals.total_amount,
            "order created"
        );
        Ok(order)
    }
}

// ── ListMyOrders ─────────────────────────────────────────────────────────────

pub struct ListMyOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListMyOrdersUseCase<O> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Order>, StoreServiceError> {
        self.orders.list_by_user(user_id).await
    }
}

// ── GetOrder ─────────────────────────────────────────────────────────────────

pub struct GetOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> GetOrderUseCase<O> {
    pub async fn execute(&self, user_id: Uuid, order_id: Uuid) -> Result<Order, StoreServiceError> {
        owned_order(&self.orders, user_id, order_id).await
    }
}

// ── CancelOrder ──────────────────────────────────────────────────────────────

pub struct CancelOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> CancelOrderUseCase<O> {
    pub async fn execute(&self, user_id: Uuid, order_id: Uuid) -> Result<Order, StoreServiceError> {
        let order = owned_order(&self.orders, user_id, order_id).await?;
        let order = transition(
            &self.orders,
            order,
            OrderStatus::Cancelled,
            Some("cancelled by customer".into()),
            OrderStatus::is_cancellable_by_customer,
        )
        .await?;
        tracing::info!(order_id = %order.id, "order cancelled by customer");
        Ok(order)
    }
}

// ── AdminListOrders ──────────────────────────────────────────────────────────

pub struct AdminListOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> AdminListOrdersUseCase<O> {
    pub async fn execute(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError> {
        self.orders.list(status, page).await
    }
}

// ── UpdateOrderStatus ────────────────────────────────────────────────────────

pub struct UpdateOrderStatusInput {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub note: Option<String>,
}

pub struct UpdateOrderStatusUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> UpdateOrderStatusUseCase<O> {
    pub async fn execute(&self, input: UpdateOrderStatusInput) -> Result<Order, StoreServiceError> {
        let order = self
            .orders
            .find_by_id(input.order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        let prev = order.order_status;
        let note = input.note.filter(|n| !n.trim().is_empty());
        let order = transition(&self.orders, order, input.status, note, |from| {
            from.can_transition_to(input.status)
        })
        .await?;
        tracing::info!(order_id = %order.id, from = %prev, to = %order.order_status, "order status updated");
        Ok(order)
    }
}
