#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use hotelops_api::auth::jwt::{issue_token, JwtConfig, TokenFlow};
use hotelops_api::auth::password::hash_password;
use hotelops_api::config::ServerConfig;
use hotelops_api::notifications::NotificationRouter;
use hotelops_api::router::build_app_router;
use hotelops_api::state::AppState;
use hotelops_core::notification::NotificationScope;
use hotelops_core::roles::Role;
use hotelops_core::transition::TransitionPolicy;
use hotelops_db::models::notification::Notification;
use hotelops_db::models::user::{CreateUser, User};
use hotelops_db::Stores;
use hotelops_events::EventQueue;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            staff_ttl_hours: 24,
            guest_ttl_days: 7,
        },
        notification_queue_capacity: 64,
        transition_policy: TransitionPolicy::Permissive,
        bootstrap_admin: None,
    }
}

/// The full application over in-memory stores, with a live notification
/// worker.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    worker: JoinHandle<()>,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(Stores::memory(), test_config())
}

pub fn build_test_app_with(stores: Stores, config: ServerConfig) -> TestApp {
    let (events, receiver) = EventQueue::new(config.notification_queue_capacity);
    let worker = tokio::spawn(NotificationRouter::new(stores.notifications.clone()).run(receiver));
    let state = AppState::new(stores, config.clone(), events);
    let router = build_app_router(state.clone(), &config).expect("test config is valid");
    TestApp {
        router,
        state,
        worker,
    }
}

impl TestApp {
    /// Insert a user directly and return it with a fresh token.
    pub async fn seed_user(&self, role: Role, email: &str) -> (User, String) {
        let user = self
            .state
            .stores
            .users
            .create_user(&CreateUser {
                name: format!("{role} user"),
                email: email.to_string(),
                password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
                role,
                phone: None,
            })
            .await
            .expect("user creation should succeed");
        let token = self.token_for(&user);
        (user, token)
    }

    pub fn token_for(&self, user: &User) -> String {
        issue_token(
            user.id,
            user.role,
            &user.email,
            TokenFlow::for_role(user.role),
            &self.state.config.jwt,
        )
        .expect("token should sign")
    }

    /// Send a request and return the status and decoded JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    /// Create a room as `token` and return its id.
    pub async fn create_room(&self, token: &str, room_number: &str) -> i64 {
        let (status, json) = self
            .post(
                "/api/v1/rooms",
                token,
                serde_json::json!({
                    "room_number": room_number,
                    "room_type": "double",
                    "price_per_night": 120.0,
                    "floor": 1
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"]["id"].as_i64().unwrap()
    }

    /// Wait until the notification worker has handled everything published
    /// so far.
    pub async fn flush(&self) {
        assert!(self.state.events.flush().await, "notification worker is gone");
    }

    /// Notifications visible to `(role, user_id)`, read straight from the store.
    pub async fn notifications_for(&self, role: Role, user_id: i64) -> Vec<Notification> {
        self.flush().await;
        self.state
            .stores
            .notifications
            .list_notifications(&NotificationScope::for_identity(role, user_id), 50)
            .await
            .unwrap()
    }
}
