use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use gka_domain::order::OrderStatus;
use gka_domain::pagination::PageRequest;
use gka_domain::user::UserRole;
use gka_store::domain::repository::{
    OrderRepository, OtpStore, OutboxRepository, PaymentGateway, UserRepository,
};
use gka_store::domain::types::{
    GatewayOrder, GatewayOrderRequest, GatewayPayment, Order, OrderGuard, OrderItem, OutboxEvent,
    ShippingAddress, User,
};
use gka_store::error::StoreServiceError;

pub const TEST_PASSWORD: &str = "mango-pickle";

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    /// Returns a shared handle to the internal user list for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), StoreServiceError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreServiceError::EmailAlreadyRegistered);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<bool, StoreServiceError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        if let Some(name) = name {
            user.name = name.to_owned();
        }
        if let Some(phone) = phone {
            user.phone = Some(phone.to_owned());
        }
        Ok(true)
    }

    async fn list(&self, _page: PageRequest) -> Result<Vec<User>, StoreServiceError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreServiceError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.role = role;
        Ok(true)
    }

    async fn list_admins_created_after(
        &self,
        after: DateTime<Utc>,
    ) -> Result<Vec<User>, StoreServiceError> {
        let mut admins: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role.is_admin() && u.created_at > after)
            .cloned()
            .collect();
        admins.sort_by_key(|u| u.created_at);
        Ok(admins)
    }
}

// ── MockOrderRepo ────────────────────────────────────────────────────────────

pub struct MockOrderRepo {
    pub orders: Arc<Mutex<Vec<Order>>>,
    /// Number of guarded writes that were applied.
    pub writes: Arc<Mutex<u32>>,
}

impl MockOrderRepo {
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            orders: Arc::new(Mutex::new(orders)),
            writes: Arc::new(Mutex::new(0)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns a shared handle to the internal order list for post-execution inspection.
    pub fn orders_handle(&self) -> Arc<Mutex<Vec<Order>>> {
        Arc::clone(&self.orders)
    }

    /// Second repository over the same rows, as a concurrent request would see them.
    pub fn share(&self) -> Self {
        Self {
            orders: Arc::clone(&self.orders),
            writes: Arc::clone(&self.writes),
        }
    }

    pub fn write_count(&self) -> u32 {
        *self.writes.lock().unwrap()
    }
}

impl OrderRepository for MockOrderRepo {
    async fn create(&self, order: &Order) -> Result<(), StoreServiceError> {
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreServiceError> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_cashfree_id(
        &self,
        cashfree_order_id: &str,
    ) -> Result<Option<Order>, StoreServiceError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.cashfree_order_id.as_deref() == Some(cashfree_order_id))
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreServiceError> {
        let mut orders: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list(
        &self,
        status: Option<OrderStatus>,
        _page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| status.is_none_or(|s| o.order_status == s))
            .cloned()
            .collect())
    }

    async fn update_guarded(
        &self,
        order: &Order,
        guard: OrderGuard,
    ) -> Result<bool, StoreServiceError> {
        let mut orders = self.orders.lock().unwrap();
        let Some(stored) = orders.iter_mut().find(|o| o.id == order.id) else {
            return Ok(false);
        };
        if OrderGuard::of(stored) != guard {
            return Ok(false);
        }
        stored.payment_status = order.payment_status;
        stored.order_status = order.order_status;
        stored.timeline = order.timeline.clone();
        stored.updated_at = order.updated_at;
        *self.writes.lock().unwrap() += 1;
        Ok(true)
    }
}

// ── MockOtpStore ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct OtpState {
    pub sends: HashMap<String, u64>,
    pub codes: HashMap<(Uuid, String), String>,
    pub verified: HashSet<(Uuid, String)>,
}

#[derive(Default)]
pub struct MockOtpStore {
    pub state: Arc<Mutex<OtpState>>,
}

impl MockOtpStore {
    /// Store where `user_id` has already verified `phone`.
    pub fn verified(user_id: Uuid, phone: &str) -> Self {
        let store = Self::default();
        store
            .state
            .lock()
            .unwrap()
            .verified
            .insert((user_id, phone.to_owned()));
        store
    }

    pub fn state_handle(&self) -> Arc<Mutex<OtpState>> {
        Arc::clone(&self.state)
    }
}

impl OtpStore for MockOtpStore {
    async fn record_send(&self, phone: &str) -> Result<u64, StoreServiceError> {
        let mut state = self.state.lock().unwrap();
        let count = state.sends.entry(phone.to_owned()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn put_code(
        &self,
        user_id: Uuid,
        phone: &str,
        code: &str,
    ) -> Result<(), StoreServiceError> {
        self.state
            .lock()
            .unwrap()
            .codes
            .insert((user_id, phone.to_owned()), code.to_owned());
        Ok(())
    }

    async fn take_code(
        &self,
        user_id: Uuid,
        phone: &str,
    ) -> Result<Option<String>, StoreServiceError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .codes
            .remove(&(user_id, phone.to_owned())))
    }

    async fn mark_verified(&self, user_id: Uuid, phone: &str) -> Result<(), StoreServiceError> {
        self.state
            .lock()
            .unwrap()
            .verified
            .insert((user_id, phone.to_owned()));
        Ok(())
    }

    async fn is_verified(&self, user_id: Uuid, phone: &str) -> Result<bool, StoreServiceError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .verified
            .contains(&(user_id, phone.to_owned())))
    }
}

// ── MockOutbox ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockOutbox {
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockOutbox {
    pub fn events_handle(&self) -> Arc<Mutex<Vec<OutboxEvent>>> {
        Arc::clone(&self.events)
    }
}

impl OutboxRepository for MockOutbox {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), StoreServiceError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ── MockGateway ──────────────────────────────────────────────────────────────

pub struct MockGateway {
    pub fail: bool,
    pub payments: Vec<GatewayPayment>,
    pub requests: Arc<Mutex<Vec<GatewayOrderRequest>>>,
}

impl MockGateway {
    pub fn ok() -> Self {
        Self {
            fail: false,
            payments: vec![],
            requests: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }

    pub fn with_payments(payments: Vec<GatewayPayment>) -> Self {
        Self {
            payments,
            ..Self::ok()
        }
    }

    pub fn requests_handle(&self) -> Arc<Mutex<Vec<GatewayOrderRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl PaymentGateway for MockGateway {
    async fn create_order(
        &self,
        request: &GatewayOrderRequest,
    ) -> Result<GatewayOrder, StoreServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(StoreServiceError::PaymentGateway(anyhow::anyhow!(
                "cashfree returned 503"
            )));
        }
        Ok(GatewayOrder {
            order_id: request.order_id.clone(),
            payment_session_id: format!("session_{}", request.order_id),
        })
    }

    async fn fetch_payments(
        &self,
        _cashfree_order_id: &str,
    ) -> Result<Vec<GatewayPayment>, StoreServiceError> {
        if self.fail {
            return Err(StoreServiceError::PaymentGateway(anyhow::anyhow!(
                "cashfree returned 503"
            )));
        }
        Ok(self.payments.clone())
    }
}

pub fn payment(status: &str, minutes_ago: i64) -> GatewayPayment {
    GatewayPayment {
        payment_status: status.to_owned(),
        payment_time: Some(Utc::now() - Duration::minutes(minutes_ago)),
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user_with(role: UserRole, created_at: DateTime<Utc>) -> User {
    let id = Uuid::now_v7();
    User {
        id,
        name: "Asha".into(),
        email: format!("{}@example.com", id.simple()),
        password_hash: bcrypt::hash(TEST_PASSWORD, 4).unwrap(),
        phone: Some("9876543210".into()),
        role,
        created_at,
        updated_at: created_at,
    }
}

pub fn test_user() -> User {
    test_user_with(UserRole::User, Utc::now())
}

pub fn test_address() -> ShippingAddress {
    ShippingAddress {
        name: "Asha".into(),
        phone: "98765 43210".into(),
        address_line: "12 MG Road".into(),
        city: "Pune".into(),
        state: "Maharashtra".into(),
        pincode: "411001".into(),
        landmark: Some("Near City Mall".into()),
    }
}

pub fn test_items() -> Vec<OrderItem> {
    vec![
        OrderItem {
            product_id: "mango".into(),
            name: "Mango pickle".into(),
            image: String::new(),
            qty: 2,
            price: 199.0,
        },
        OrderItem {
            product_id: "lemon".into(),
            name: "Lemon pickle".into(),
            image: String::new(),
            qty: 1,
            price: 150.0,
        },
    ]
}
