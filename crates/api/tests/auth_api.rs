//! HTTP-level tests for registration, login, and the authentication chain.

mod common;

use axum::http::{Method, StatusCode};
use common::{build_test_app, TEST_PASSWORD};
use hotelops_api::auth::jwt::{issue_token, JwtConfig, TokenFlow};
use hotelops_core::roles::Role;
use serde_json::json;

// ---------------------------------------------------------------------------
// Register / login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_creates_a_guest_with_a_working_token() {
    let app = build_test_app();

    let (status, json) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "name": "Ada Guest",
                "email": " Ada@Example.COM ",
                "password": "long-enough-pw"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["data"]["user"]["role"], "guest");
    assert_eq!(json["data"]["user"]["email"], "ada@example.com");
    assert!(json["data"]["user"].get("password_hash").is_none());

    let token = json["data"]["token"].as_str().unwrap().to_string();
    let (status, profile) = app.get("/api/v1/auth/profile", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["data"]["name"], "Ada Guest");
}

#[tokio::test]
async fn register_rejects_duplicate_email_and_short_password() {
    let app = build_test_app();
    app.seed_user(Role::Guest, "taken@example.com").await;

    let (status, json) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "name": "B", "email": "taken@example.com", "password": "long-enough-pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE_ENTITY");

    let (status, json) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "name": "C", "email": "c@example.com", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn login_checks_password_then_account_status() {
    let app = build_test_app();
    let (user, _) = app.seed_user(Role::Receptionist, "desk@hotel.test").await;
    let (_, admin_token) = app.seed_user(Role::Admin, "admin@hotel.test").await;

    let app_ref = &app;
    let login = move |password: &'static str| {
        app_ref.send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "DESK@hotel.test", "password": password })),
        )
    };

    let (status, json) = login(TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["user"]["role"], "receptionist");

    let (status, json) = login("wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    for account_status in ["inactive", "suspended"] {
        let (status, _) = app
            .put(
                &format!("/api/v1/users/{}/status", user.id),
                &admin_token,
                json!({ "account_status": account_status }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = login(TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "ACCOUNT_INACTIVE");
        assert_eq!(json["account_status"], account_status);
    }
}

// ---------------------------------------------------------------------------
// Authentication chain
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_or_malformed_header_is_unauthorized() {
    let app = build_test_app();

    let (status, json) = app.send(Method::GET, "/api/v1/rooms", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) = app.get("/api/v1/rooms", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn token_signed_with_another_secret_is_invalid() {
    let app = build_test_app();
    let (user, _) = app.seed_user(Role::Manager, "m@hotel.test").await;

    let foreign = JwtConfig {
        secret: "some-other-secret".into(),
        ..app.state.config.jwt.clone()
    };
    let token = issue_token(user.id, user.role, &user.email, TokenFlow::StaffLogin, &foreign)
        .unwrap();

    let (status, json) = app.get("/api/v1/rooms", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn expired_token_is_reported_as_expired() {
    let app = build_test_app();
    let (user, _) = app.seed_user(Role::Manager, "m@hotel.test").await;

    let expired = JwtConfig {
        staff_ttl_hours: -1,
        ..app.state.config.jwt.clone()
    };
    let token = issue_token(user.id, user.role, &user.email, TokenFlow::StaffLogin, &expired)
        .unwrap();

    let (status, json) = app.get("/api/v1/rooms", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "EXPIRED_TOKEN");
}

#[tokio::test]
async fn token_for_unknown_user_is_rejected() {
    let app = build_test_app();
    let token = issue_token(
        9_999,
        Role::Admin,
        "ghost@hotel.test",
        TokenFlow::StaffLogin,
        &app.state.config.jwt,
    )
    .unwrap();

    let (status, json) = app.get("/api/v1/rooms", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn suspending_an_account_revokes_its_live_token() {
    let app = build_test_app();
    let (guest, guest_token) = app.seed_user(Role::Guest, "g@example.com").await;
    let (_, admin_token) = app.seed_user(Role::Admin, "admin@hotel.test").await;

    let (status, _) = app.get("/api/v1/auth/profile", &guest_token).await;
    assert_eq!(status, StatusCode::OK);

    app.put(
        &format!("/api/v1/users/{}/status", guest.id),
        &admin_token,
        json!({ "account_status": "suspended" }),
    )
    .await;

    let (status, json) = app.get("/api/v1/auth/profile", &guest_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "ACCOUNT_INACTIVE");
    assert_eq!(json["account_status"], "suspended");
}

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

#[tokio::test]
async fn only_admins_manage_users() {
    let app = build_test_app();
    let (_, admin_token) = app.seed_user(Role::Admin, "admin@hotel.test").await;
    let (_, manager_token) = app.seed_user(Role::Manager, "m@hotel.test").await;

    let body = json!({
        "name": "New Housekeeper",
        "email": "  HK@Hotel.test ",
        "password": "long-enough-pw",
        "role": "housekeeping"
    });

    let (status, json) = app.post("/api/v1/users", &manager_token, body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    let (status, json) = app.post("/api/v1/users", &admin_token, body).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["data"]["role"], "housekeeping");
    assert_eq!(json["data"]["email"], "hk@hotel.test");

    let (status, json) = app.get("/api/v1/users", &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}
