#![allow(dead_code)]

use reqwest::{Client, Response, StatusCode};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

use catalog_backend::{
    create_api_router, entities::otp_verification::Purpose,
    repository::otp_verification as otp_repo, setup_schema, AppConfig,
};

pub const ADMIN_PHONE: &str = "+15550000001";

pub struct TestApp {
    pub base_url: String,
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub client: Client,
}

/// Fresh in-memory database with the schema applied.
pub async fn test_db() -> DatabaseConnection {
    // One pooled connection keeps the in-memory database alive and shared.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    setup_schema(&db).await.expect("Failed to create schema");
    db
}

pub async fn spawn_app() -> TestApp {
    let db = test_db().await;

    let config = Arc::new(AppConfig {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        secret: "test-secret".to_string(),
        token_ttl_hours: 1,
        otp_ttl_minutes: 5,
        otp_max_attempts: 3,
        admin_phones: vec![ADMIN_PHONE.to_string()],
    });

    let db = Arc::new(db);
    let app = create_api_router(db.clone(), config.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server crashed");
    });

    TestApp {
        base_url: format!("http://{}", addr),
        db,
        config,
        client: Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn admin_post(&self, token: &str, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn admin_patch(&self, token: &str, path: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn admin_delete(&self, token: &str, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Issues an OTP for `phone` and returns the stored code.
    pub async fn issue_otp(&self, phone: &str) -> String {
        let response = self
            .post_json("/api/public/otp", &json!({ "phone": phone }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        otp_repo::find_top_by_phone_and_purpose(self.db.as_ref(), phone, Purpose::Login)
            .await
            .expect("Failed to read OTP")
            .expect("OTP was not stored")
            .otp_code
    }

    /// Signs `phone` in through the OTP flow and returns the bearer token.
    pub async fn login(&self, phone: &str, session_id: Option<&str>) -> String {
        let code = self.issue_otp(phone).await;
        let mut body = json!({ "phone": phone, "code": code });
        if let Some(session_id) = session_id {
            body["session_id"] = json!(session_id);
        }

        let response = self.post_json("/api/public/otp/verify", &body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .json::<Value>()
            .await
            .expect("Failed to parse response JSON");
        body["token"]
            .as_str()
            .expect("Token missing from response")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_PHONE, None).await
    }

    pub async fn create_category(&self, token: &str, body: Value) -> Value {
        let response = self.admin_post(token, "/api/admin/categories", &body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.expect("Failed to parse response JSON")
    }

    pub async fn create_brand(&self, token: &str, body: Value) -> Value {
        let response = self.admin_post(token, "/api/admin/brands", &body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.expect("Failed to parse response JSON")
    }

    pub async fn create_group(&self, token: &str, body: Value) -> Value {
        let response = self
            .admin_post(token, "/api/admin/product-groups", &body)
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.expect("Failed to parse response JSON")
    }

    pub async fn create_product(&self, token: &str, body: Value) -> Value {
        let response = self.admin_post(token, "/api/admin/products", &body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.expect("Failed to parse response JSON")
    }
}
