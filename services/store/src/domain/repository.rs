#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use gka_domain::order::OrderStatus;
use gka_domain::pagination::PageRequest;
use gka_domain::user::UserRole;

use crate::domain::types::{
    Banner, BannerPatch, CartItem, Category, CategoryPatch, GatewayOrder, GatewayOrderRequest,
    GatewayPayment, Order, OrderGuard, OutboxEvent, Product, ProductPatch, User,
};
use crate::error::StoreServiceError;

/// Repository for storefront accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreServiceError>;

    /// Lookup by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreServiceError>;

    /// Insert a user. A taken email yields [`StoreServiceError::EmailAlreadyRegistered`].
    async fn create(&self, user: &User) -> Result<(), StoreServiceError>;

    /// Update name and/or phone. Returns `false` if the user does not exist.
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<bool, StoreServiceError>;

    /// All users, newest first.
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, StoreServiceError>;

    /// Returns `false` if the user does not exist.
    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreServiceError>;

    /// Admins whose `created_at` is strictly after `after`, oldest first.
    async fn list_admins_created_after(
        &self,
        after: DateTime<Utc>,
    ) -> Result<Vec<User>, StoreServiceError>;
}

pub trait ProductRepository: Send + Sync {
    /// Newest first, optionally restricted to one category.
    async fn list(
        &self,
        category_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Product>, StoreServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError>;

    /// Case-insensitive substring match on name or description.
    async fn search(&self, query: &str, limit: u64) -> Result<Vec<Product>, StoreServiceError>;

    async fn create(&self, product: &Product) -> Result<(), StoreServiceError>;

    /// Apply a patch and return the updated row, or `None` if absent.
    async fn update(
        &self,
        id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, StoreServiceError>;

    /// Delete and return the removed row, or `None` if absent.
    async fn delete(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError>;
}

pub trait CategoryRepository: Send + Sync {
    /// Alphabetical by name.
    async fn list(&self) -> Result<Vec<Category>, StoreServiceError>;

    /// A taken name yields [`StoreServiceError::CategoryAlreadyExists`].
    async fn create(&self, category: &Category) -> Result<(), StoreServiceError>;

    async fn update(
        &self,
        id: Uuid,
        patch: &CategoryPatch,
    ) -> Result<Option<Category>, StoreServiceError>;

    async fn delete(&self, id: Uuid) -> Result<Option<Category>, StoreServiceError>;
}

pub trait BannerRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<Banner>, StoreServiceError>;

    async fn create(&self, banner: &Banner) -> Result<(), StoreServiceError>;

    async fn update(
        &self,
        id: Uuid,
        patch: &BannerPatch,
    ) -> Result<Option<Banner>, StoreServiceError>;

    async fn delete(&self, id: Uuid) -> Result<Option<Banner>, StoreServiceError>;
}

/// One denormalized cart per user.
pub trait CartRepository: Send + Sync {
    /// Stored items, or empty when the user has no cart yet.
    async fn get(&self, user_id: Uuid) -> Result<Vec<CartItem>, StoreServiceError>;

    /// Overwrite the whole cart (upsert by user).
    async fn replace(&self, user_id: Uuid, items: &[CartItem]) -> Result<(), StoreServiceError>;
}

pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> Result<(), StoreServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreServiceError>;

    async fn find_by_cashfree_id(
        &self,
        cashfree_order_id: &str,
    ) -> Result<Option<Order>, StoreServiceError>;

    /// The user's orders, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreServiceError>;

    /// All orders, newest first, optionally filtered by status.
    async fn list(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError>;

    /// Persist `payment_status`, `order_status`, `timeline` and `updated_at`
    /// from `order` only if the stored row still satisfies `guard`.
    ///
    /// Returns `false` when the guard did not match and nothing was written.
    async fn update_guarded(
        &self,
        order: &Order,
        guard: OrderGuard,
    ) -> Result<bool, StoreServiceError>;
}

/// Short-lived phone OTP state (Redis).
pub trait OtpStore: Send + Sync {
    /// Count a send for `phone` in the rate window and return the new count.
    async fn record_send(&self, phone: &str) -> Result<u64, StoreServiceError>;

    async fn put_code(&self, user_id: Uuid, phone: &str, code: &str)
    -> Result<(), StoreServiceError>;

    /// Get-and-delete the pending code.
    async fn take_code(
        &self,
        user_id: Uuid,
        phone: &str,
    ) -> Result<Option<String>, StoreServiceError>;

    async fn mark_verified(&self, user_id: Uuid, phone: &str) -> Result<(), StoreServiceError>;

    async fn is_verified(&self, user_id: Uuid, phone: &str) -> Result<bool, StoreServiceError>;
}

/// Queue of side effects delivered by a separate worker.
pub trait OutboxRepository: Send + Sync {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), StoreServiceError>;
}

/// Online payment gateway (Cashfree PG).
///
/// Transport and API failures surface as [`StoreServiceError::PaymentGateway`].
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        request: &GatewayOrderRequest,
    ) -> Result<GatewayOrder, StoreServiceError>;

    /// Payment attempts recorded for a gateway order, in gateway order.
    async fn fetch_payments(
        &self,
        cashfree_order_id: &str,
    ) -> Result<Vec<GatewayPayment>, StoreServiceError>;
}

/// Hosted image storage (Cloudinary).
pub trait ImageStore: Send + Sync {
    async fn destroy(&self, public_id: &str) -> Result<(), StoreServiceError>;
}
