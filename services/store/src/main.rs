use std::sync::Arc;

use sea_orm::Database;
use tokio::signal;
use tracing::info;

use gka_auth_types::cookie::CookiePolicy;
use gka_auth_types::session::SessionKeys;
use gka_auth_types::token::JwtSecrets;
use gka_core::tracing::init_tracing;
use gka_store::config::StoreConfig;
use gka_store::router::build_router;
use gka_store::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = StoreConfig::from_env();
    info!(
        port = config.store_port,
        production = config.production,
        cashfree = %config.cashfree.base_url,
        "store config loaded"
    );

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .build()
        .expect("failed to build HTTP client");

    let session_keys = Arc::new(SessionKeys {
        secrets: JwtSecrets {
            access: config.access_token_secret,
            refresh: config.refresh_token_secret,
        },
        cookies: CookiePolicy {
            production: config.production,
            domain: config.cookie_domain,
        },
    });

    let state = AppState {
        db,
        redis,
        http,
        session_keys,
        cashfree: config.cashfree,
        cloudinary: config.cloudinary,
        bcrypt_cost: config.bcrypt_cost,
    };

    let router = build_router(state, &config.cors_origins);
    let addr = format!("0.0.0.0:{}", config.store_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("store service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
