use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use gka_auth_types::middleware::{SessionGuard, require_session};
use gka_core::health::{healthz, readiness};
use gka_core::middleware::{propagate_request_id_layer, request_id_layer};
use gka_domain::user::UserRole;

use crate::handlers::{
    admin::{demote_admin, list_users, promote_user, removable_admins},
    cart::{get_cart, replace_cart},
    catalog::{
        create_banner, create_category, create_product, delete_banner, delete_category,
        delete_product, get_product, list_banners, list_categories, list_products,
        search_products, update_banner, update_category, update_product,
    },
    order::{
        admin_list_orders, cancel_order, create_order, get_order, list_my_orders,
        update_order_status,
    },
    otp::{send_otp, verify_otp},
    payment::{cashfree_webhook, verify_payment},
    upload::get_upload_signature,
    user::{get_me, login, logout, register, update_me},
};
use crate::infra::cache;
use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

async fn readyz(State(state): State<AppState>) -> StatusCode {
    let postgres = state.db.ping().await.map_err(anyhow::Error::from);
    let redis = cache::ping(&state.redis).await;
    readiness(&[("postgres", postgres), ("redis", redis)])
}

/// Credentialed CORS for the SPA origins. Unparseable origins are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}

pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let keys = state.session_keys.clone();

    let public = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Session
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/logout", post(logout))
        // Catalog
        .route("/getdata/products", get(list_products))
        .route("/getdata/products/{id}", get(get_product))
        .route("/getdata/categories", get(list_categories))
        .route("/getdata/banners", get(list_banners))
        .route("/getdata/search", get(search_products))
        // Gateway callback, authenticated by signature
        .route("/order/cashfree/webhook", post(cashfree_webhook));

    let user = Router::new()
        .route("/user/me", get(get_me).patch(update_me))
        // Cart
        .route("/cart", get(get_cart).post(replace_cart))
        // OTP
        .route("/otp/send", post(send_otp))
        .route("/otp/verify", post(verify_otp))
        // Orders
        .route("/order/create", post(create_order))
        .route("/order/my", get(list_my_orders))
        .route("/order/verify/{cashfree_order_id}", get(verify_payment))
        .route("/order/{id}", get(get_order))
        .route("/order/{id}/cancel", post(cancel_order))
        .route_layer(from_fn_with_state(
            SessionGuard::new(keys.clone(), UserRole::User),
            require_session,
        ));

    let admin = Router::new()
        // Users
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}/promote", post(promote_user))
        .route("/admin/admins/removable", get(removable_admins))
        .route("/admin/admins/{id}/demote", post(demote_admin))
        // Catalog
        .route("/admin/products", post(create_product))
        .route("/admin/products/{id}", patch(update_product).delete(delete_product))
        .route("/admin/categories", post(create_category))
        .route("/admin/categories/{id}", patch(update_category).delete(delete_category))
        .route("/admin/banners", post(create_banner))
        .route("/admin/banners/{id}", patch(update_banner).delete(delete_banner))
        .route("/admin/upload-signature", get(get_upload_signature))
        // Orders
        .route("/admin/orders", get(admin_list_orders))
        .route("/admin/orders/{id}/status", patch(update_order_status))
        .route_layer(from_fn_with_state(
            SessionGuard::new(keys, UserRole::Admin),
            require_session,
        ));

    public
        .merge(user)
        .merge(admin)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors_layer(cors_origins))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
