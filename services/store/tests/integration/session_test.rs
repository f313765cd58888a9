use axum::{Router, http::StatusCode, http::header, middleware::from_fn_with_state, routing::get};
use axum_test::TestServer;
use uuid::Uuid;

use gka_auth_types::identity::Identity;
use gka_auth_types::middleware::{SessionGuard, require_session};
use gka_domain::user::UserRole;
use gka_testing::auth::{MockAuth, test_session_keys};

async fn whoami(identity: Identity) -> String {
    identity.user_id.to_string()
}

fn server() -> TestServer {
    let keys = test_session_keys();
    let user = Router::new().route("/me", get(whoami)).route_layer(from_fn_with_state(
        SessionGuard::new(keys.clone(), UserRole::User),
        require_session,
    ));
    let admin = Router::new()
        .route("/admin/me", get(whoami))
        .route_layer(from_fn_with_state(
            SessionGuard::new(keys, UserRole::Admin),
            require_session,
        ));
    TestServer::new(user.merge(admin)).unwrap()
}

#[tokio::test]
async fn should_pass_valid_access_cookie() {
    let user_id = Uuid::now_v7();
    let response = server()
        .get("/me")
        .add_header(header::COOKIE, MockAuth::user(user_id).access_cookie())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), user_id.to_string());
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn should_reissue_access_token_from_refresh_cookie() {
    let user_id = Uuid::now_v7();
    let response = server()
        .get("/me")
        .add_header(header::COOKIE, MockAuth::user(user_id).stale_access_cookie())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), user_id.to_string());
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("refreshed session must set a new access cookie")
        .to_str()
        .unwrap()
        .to_owned();
    assert!(set_cookie.starts_with("token="), "got {set_cookie}");
}

#[tokio::test]
async fn should_reject_missing_session() {
    let response = server().get("/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_forbid_user_on_admin_route() {
    let response = server()
        .get("/admin/me")
        .add_header(header::COOKIE, MockAuth::user(Uuid::now_v7()).access_cookie())
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_let_admin_use_user_routes() {
    let admin_id = Uuid::now_v7();
    let server = server();
    let cookie = MockAuth::admin(admin_id).access_cookie();

    let user_route = server
        .get("/me")
        .add_header(header::COOKIE, cookie.clone())
        .await;
    let admin_route = server.get("/admin/me").add_header(header::COOKIE, cookie).await;

    assert_eq!(user_route.status_code(), StatusCode::OK);
    assert_eq!(admin_route.text(), admin_id.to_string());
}
