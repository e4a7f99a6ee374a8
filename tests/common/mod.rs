#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use food_order_api::config::AppConfig;
use food_order_api::database::MemoryStore;
use food_order_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-process application backed by an empty in-memory store.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` pair of the first `Set-Cookie` header.
    pub fn cookie_pair(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|c| c.split(';').next())
            .map(|pair| pair.trim().to_string())
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.header(header::SET_COOKIE)
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.security.jwt_secret = TEST_SECRET.to_string();

        let state = AppState::new(&config, Arc::new(MemoryStore::new()));
        let router = app(&config, state.clone());
        Self { router, state }
    }

    /// Cookie header value carrying a fresh credential for `email`.
    pub fn session_cookie(&self, email: &str) -> Result<String> {
        let token = self.state.tokens.issue(email)?;
        Ok(format!("token={}", token))
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> Result<TestResponse> {
        self.send(Method::GET, uri, Some(cookie), None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, uri, None, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> Result<TestResponse> {
        self.send(Method::PATCH, uri, None, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Result<TestResponse> {
        self.send(Method::DELETE, uri, None, None).await
    }

    /// CORS preflight for `method` on `uri` from `origin`.
    pub async fn preflight(&self, uri: &str, origin: &str, method: Method) -> Result<TestResponse> {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, method.as_str())
            .body(Body::empty())?;
        self.dispatch(request).await
    }

    pub async fn send(&self, method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("failed to read response body")?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        Ok(TestResponse { status, headers, body })
    }

    /// Insert a food through the API and return its id.
    pub async fn seed_food(&self, food: Value) -> Result<String> {
        let res = self.post("/foods", food).await?;
        anyhow::ensure!(res.status == StatusCode::OK, "seed failed: {}", res.status);
        res.body["insertedId"]
            .as_str()
            .map(str::to_string)
            .context("insert result without insertedId")
    }
}
