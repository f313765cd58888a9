/// Store service configuration loaded from environment variables.
///
/// A `.env` file in the working directory is read first when present.
#[derive(Debug)]
pub struct StoreConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (OTP codes and phone verification marks).
    pub redis_url: String,
    /// HMAC secret for access tokens. Env var: `ACCESS_TOKEN_SECRET`.
    pub access_token_secret: String,
    /// HMAC secret for refresh tokens. Env var: `REFRESH_TOKEN_SECRET`.
    pub refresh_token_secret: String,
    /// `true` when `APP_ENV=production`: cookies become `SameSite=None; Secure`.
    pub production: bool,
    /// Optional cookie `Domain` attribute. Env var: `COOKIE_DOMAIN`.
    pub cookie_domain: Option<String>,
    /// Comma-separated origins allowed to call with credentials. Env var: `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// TCP port to listen on (default 3000). Env var: `STORE_PORT`.
    pub store_port: u16,
    /// bcrypt cost for new password hashes (default 12). Env var: `BCRYPT_COST`.
    pub bcrypt_cost: u32,
    pub cashfree: CashfreeConfig,
    pub cloudinary: CloudinaryConfig,
}

/// Cashfree PG credentials and callback URLs.
#[derive(Clone)]
pub struct CashfreeConfig {
    pub client_id: String,
    pub client_secret: String,
    /// `https://sandbox.cashfree.com` unless overridden by `CASHFREE_BASE_URL`.
    pub base_url: String,
    /// Where Cashfree sends the shopper after checkout; `{order_id}` is substituted.
    pub return_url: Option<String>,
    /// Webhook URL registered on each order. Env var: `CASHFREE_NOTIFY_URL`.
    pub notify_url: Option<String>,
    /// Verify `x-webhook-signature` on incoming webhooks (default true).
    pub verify_webhooks: bool,
}

impl std::fmt::Debug for CashfreeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CashfreeConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("return_url", &self.return_url)
            .field("notify_url", &self.notify_url)
            .field("verify_webhooks", &self.verify_webhooks)
            .finish()
    }
}

/// Cloudinary account used for product, category and banner images.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// `https://api.cloudinary.com` unless overridden by `CLOUDINARY_BASE_URL`.
    pub base_url: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl StoreConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            access_token_secret: std::env::var("ACCESS_TOKEN_SECRET")
                .expect("ACCESS_TOKEN_SECRET"),
            refresh_token_secret: std::env::var("REFRESH_TOKEN_SECRET")
                .expect("REFRESH_TOKEN_SECRET"),
            production: optional("APP_ENV").is_some_and(|v| v == "production"),
            cookie_domain: optional("COOKIE_DOMAIN"),
            cors_origins: optional("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_owned())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            store_port: optional("STORE_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            bcrypt_cost: optional("BCRYPT_COST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
            cashfree: CashfreeConfig {
                client_id: std::env::var("CASHFREE_CLIENT_ID").expect("CASHFREE_CLIENT_ID"),
                client_secret: std::env::var("CASHFREE_CLIENT_SECRET")
                    .expect("CASHFREE_CLIENT_SECRET"),
                base_url: optional("CASHFREE_BASE_URL")
                    .unwrap_or_else(|| "https://sandbox.cashfree.com".to_owned()),
                return_url: optional("CASHFREE_RETURN_URL"),
                notify_url: optional("CASHFREE_NOTIFY_URL"),
                verify_webhooks: optional("CASHFREE_WEBHOOK_VERIFY")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(true),
            },
            cloudinary: CloudinaryConfig {
                cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME").expect("CLOUDINARY_CLOUD_NAME"),
                api_key: std::env::var("CLOUDINARY_API_KEY").expect("CLOUDINARY_API_KEY"),
                api_secret: std::env::var("CLOUDINARY_API_SECRET")
                    .expect("CLOUDINARY_API_SECRET"),
                base_url: optional("CLOUDINARY_BASE_URL")
                    .unwrap_or_else(|| "https://api.cloudinary.com".to_owned()),
            },
        }
    }
}
