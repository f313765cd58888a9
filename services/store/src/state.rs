use std::sync::Arc;

use deadpool_redis::Pool as RedisPool;
use reqwest::Client;
use sea_orm::DatabaseConnection;

use gka_auth_types::session::SessionKeys;

use crate::config::{CashfreeConfig, CloudinaryConfig};
use crate::infra::cache::RedisOtpStore;
use crate::infra::cashfree::CashfreeGateway;
use crate::infra::cloudinary::CloudinaryImageStore;
use crate::infra::db::{
    DbBannerRepository, DbCartRepository, DbCategoryRepository, DbOrderRepository,
    DbOutboxRepository, DbProductRepository, DbUserRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub http: Client,
    pub session_keys: Arc<SessionKeys>,
    pub cashfree: CashfreeConfig,
    pub cloudinary: CloudinaryConfig,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn category_repo(&self) -> DbCategoryRepository {
        DbCategoryRepository {
            db: self.db.clone(),
        }
    }

    pub fn banner_repo(&self) -> DbBannerRepository {
        DbBannerRepository {
            db: self.db.clone(),
        }
    }

    pub fn cart_repo(&self) -> DbCartRepository {
        DbCartRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_repo(&self) -> DbOutboxRepository {
        DbOutboxRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_store(&self) -> RedisOtpStore {
        RedisOtpStore {
            pool: self.redis.clone(),
        }
    }

    pub fn payment_gateway(&self) -> CashfreeGateway {
        CashfreeGateway {
            http: self.http.clone(),
            config: self.cashfree.clone(),
        }
    }

    pub fn image_store(&self) -> CloudinaryImageStore {
        CloudinaryImageStore {
            http: self.http.clone(),
            config: self.cloudinary.clone(),
        }
    }
}
