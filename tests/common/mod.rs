#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use futures::stream::{self, StreamExt};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use florist_server::chatbot::provider::{
    ChatError, ChatMessage, ChatProvider, ChatStream, RecommendationRequest, Sentiment,
};
use florist_server::db::{schema, services};
use florist_server::server::config::ServerConfig;
use florist_server::services::auth_service;
use florist_server::web::{self, AppState};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse";
pub const JWT_SECRET: &str = "test-secret";

/// Chat provider with canned answers. `None` makes the call fail.
#[derive(Clone, Default)]
pub struct MockChatProvider {
    pub reply: Option<String>,
    pub chunks: Option<Vec<Result<String, ChatError>>>,
    pub sentiment: Option<Sentiment>,
}

impl MockChatProvider {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            chunks: Some(vec![Ok(reply.to_string())]),
            sentiment: Some(Sentiment {
                rating: 5,
                confidence: 0.9,
            }),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    fn unavailable() -> ChatError {
        ChatError::Http {
            status: 503,
            body: "upstream unavailable".to_string(),
        }
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn get_chat_response(&self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
        self.reply.clone().ok_or_else(Self::unavailable)
    }

    async fn get_chat_stream_response(
        &self,
        _messages: &[ChatMessage],
    ) -> Result<ChatStream, ChatError> {
        let chunks = self.chunks.clone().ok_or_else(Self::unavailable)?;
        Ok(stream::iter(chunks).boxed())
    }

    async fn analyze_sentiment(&self, _text: &str) -> Result<Sentiment, ChatError> {
        self.sentiment.ok_or_else(Self::unavailable)
    }

    async fn generate_flower_recommendation(
        &self,
        request: &RecommendationRequest,
    ) -> Result<String, ChatError> {
        self.reply
            .as_ref()
            .map(|reply| format!("{reply} ({})", request.occasion.as_deref().unwrap_or("-")))
            .ok_or_else(Self::unavailable)
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    /// Bearer token of the seeded admin.
    pub token: String,
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        frontend_url: None,
        log_dir: "logs".to_string(),
        static_dir: None,
        admin_username: None,
        admin_password: None,
        openai_api_key: None,
        openai_base_url: "http://localhost".to_string(),
        openai_model: "test".to_string(),
        default_locale: "ru".to_string(),
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(MockChatProvider::answering("Советую нежные пионы.")).await
}

pub async fn spawn_app_with(provider: MockChatProvider) -> TestApp {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    schema::create_schema(&db).await.unwrap();
    schema::seed_defaults(&db).await.unwrap();

    // Low bcrypt cost keeps the suite fast.
    let password_hash = bcrypt::hash(ADMIN_PASSWORD, 4).unwrap();
    let admin = services::create_admin(&db, ADMIN_USERNAME, &password_hash)
        .await
        .unwrap();
    let token = auth_service::create_jwt_for_user(&admin, JWT_SECRET)
        .unwrap()
        .token;

    let state = Arc::new(AppState {
        db_pool: db.clone(),
        chat_provider: Arc::new(provider),
        config: Arc::new(test_config()),
    });

    TestApp {
        router: web::create_axum_router(state),
        db,
        token,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = self.request_raw(method, uri, token, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn admin_get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(&self.token), None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, None, Some(body)).await
    }

    pub async fn admin_post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(&self.token), Some(body))
            .await
    }

    pub async fn admin_put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(&self.token), Some(body))
            .await
    }

    pub async fn admin_patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(&self.token), Some(body))
            .await
    }

    pub async fn admin_delete(&self, uri: &str) -> StatusCode {
        self.request(Method::DELETE, uri, Some(&self.token), None)
            .await
            .0
    }
}
