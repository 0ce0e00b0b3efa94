//! Common test utilities for HTTP integration tests
//!
//! [`TestContext::new`] returns `None` when `DATABASE_URL` is unset, so the
//! suite passes on machines without PostgreSQL. Every test creates its own
//! users and names, so tests can share one database and run in parallel.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use projectflow_api::app::{build_router, AppState};
use projectflow_api::config::Config;
use projectflow_shared::db::migrations::run_migrations;
use serde_json::Value;
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

const SECRET: &str = "integration-test-secret-that-is-long-enough";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub state: AppState,
}

/// A registered user with a live token
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

impl TestUser {
    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl TestContext {
    /// Connects, migrates and builds the router
    pub async fn new() -> Option<Self> {
        let Some(url) = std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()) else {
            eprintln!("DATABASE_URL not set; skipping HTTP integration test");
            return None;
        };

        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some(url.clone()),
            "SECRET_KEY" => Some(SECRET.to_string()),
            _ => None,
        })
        .expect("Invalid test configuration");

        let db = PgPool::connect(&config.database.url)
            .await
            .expect("Failed to connect to test database");
        run_migrations(&db).await.expect("Failed to run migrations");

        let state = AppState::new(db.clone(), config).expect("Failed to build state");
        let app = build_router(state.clone());

        Some(Self { db, app, state })
    }

    /// Sends a request and returns the status with the parsed body
    ///
    /// Empty bodies (204) come back as `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("Non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    /// Registers a fresh user through the API and logs them in
    pub async fn user(&self, name: &str) -> TestUser {
        let email = format!("{}-{}@example.com", name, Uuid::new_v4().simple());
        let password = "s3cret-pass".to_string();

        let (status, body) = self
            .send(
                Method::POST,
                "/usuarios/registro",
                None,
                Some(serde_json::json!({"nome": name, "email": email, "senha": password})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
        let token = self.login(&email, &password).await;

        TestUser {
            id,
            name: name.to_string(),
            email,
            password,
            token,
        }
    }

    /// Logs in and returns the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/usuarios/login",
                None,
                Some(serde_json::json!({"email": email, "senha": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        assert_eq!(body["token_type"], "bearer");

        body["access_token"].as_str().unwrap().to_string()
    }
}

/// A name no other test run will produce
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Reads an ID field from a response body
pub fn id_of(body: &Value, field: &str) -> Uuid {
    body[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing {} in {}", field, body))
        .parse()
        .unwrap()
}
