use deadpool_redis::Pool;
use deadpool_redis::redis::{AsyncCommands, RedisError};
use uuid::Uuid;

use crate::domain::repository::OtpStore;
use crate::domain::types::{OTP_SEND_WINDOW_SECS, OTP_TTL_SECS, PHONE_VERIFIED_TTL_SECS};
use crate::error::StoreServiceError;

#[derive(Clone)]
pub struct RedisOtpStore {
    pub pool: Pool,
}

fn code_key(user_id: Uuid, phone: &str) -> String {
    format!("otp:{}:{}", user_id, phone)
}

fn sends_key(phone: &str) -> String {
    format!("otp_sends:{}", phone)
}

fn verified_key(user_id: Uuid, phone: &str) -> String {
    format!("phone_verified:{}:{}", user_id, phone)
}

fn redis_err(e: RedisError) -> StoreServiceError {
    StoreServiceError::Internal(e.into())
}

impl RedisOtpStore {
    async fn conn(&self) -> Result<deadpool_redis::Connection, StoreServiceError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreServiceError::Internal(e.into()))
    }
}

impl OtpStore for RedisOtpStore {
    async fn record_send(&self, phone: &str) -> Result<u64, StoreServiceError> {
        let mut conn = self.conn().await?;
        let key = sends_key(phone);
        let count: u64 = conn.incr(&key, 1).await.map_err(redis_err)?;
        if count == 1 {
            // First send opens the window.
            let (): () = conn
                .expire(&key, OTP_SEND_WINDOW_SECS as i64)
                .await
                .map_err(redis_err)?;
        }
        Ok(count)
    }

    async fn put_code(
        &self,
        user_id: Uuid,
        phone: &str,
        code: &str,
    ) -> Result<(), StoreServiceError> {
        let mut conn = self.conn().await?;
        let (): () = conn
            .set_ex(code_key(user_id, phone), code, OTP_TTL_SECS)
            .await
            .map_err(redis_err)?;
        Ok(())
    }

    async fn take_code(
        &self,
        user_id: Uuid,
        phone: &str,
    ) -> Result<Option<String>, StoreServiceError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get_del(code_key(user_id, phone))
            .await
            .map_err(redis_err)?;
        Ok(value)
    }

    async fn mark_verified(&self, user_id: Uuid, phone: &str) -> Result<(), StoreServiceError> {
        let mut conn = self.conn().await?;
        let (): () = conn
            .set_ex(verified_key(user_id, phone), 1, PHONE_VERIFIED_TTL_SECS)
            .await
            .map_err(redis_err)?;
        Ok(())
    }

    async fn is_verified(&self, user_id: Uuid, phone: &str) -> Result<bool, StoreServiceError> {
        let mut conn = self.conn().await?;
        let exists: bool = conn
            .exists(verified_key(user_id, phone))
            .await
            .map_err(redis_err)?;
        Ok(exists)
    }
}

/// Readiness probe: `PING` the Redis pool.
pub async fn ping(pool: &Pool) -> anyhow::Result<()> {
    let mut conn = pool.get().await?;
    let _: String = deadpool_redis::redis::cmd("PING")
        .query_async(&mut conn)
        .await?;
    Ok(())
}
