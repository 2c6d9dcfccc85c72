//! Common test utilities for integration tests
//!
//! The service is stateless, so every test builds its own router in-process.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusRecorder};
use nutriplan_backend::{config::AppConfig, routes, state::AppState};
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
}

impl TestApp {
    /// Create a test application with the default policy
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application from a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let app = routes::create_router(AppState::new(config));
        Self { app }
    }

    /// Create a test application backed by a Prometheus recorder that is not
    /// installed globally; record into it with `metrics::with_local_recorder`
    pub fn with_metrics() -> (Self, PrometheusRecorder) {
        let recorder = PrometheusBuilder::new().build_recorder();
        let state = AppState::new(test_config()).with_metrics(recorder.handle());
        let app = Self {
            app: routes::create_router(state),
        };
        (app, recorder)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// POST a JSON value and parse the JSON reply
    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let (status, text) = self.post(path, &body.to_string()).await;
        let value = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.api.max_batch_items = 5;
    config
}

/// Request body for a 30-year-old lean male, moderate activity, hypertrophy
pub fn sample_request() -> serde_json::Value {
    serde_json::json!({
        "weight_kg": 70.0,
        "height_cm": 175.0,
        "age_years": 30,
        "sex": "male",
        "activity_level": "moderate",
        "objective": "hypertrophy",
        "body_profile": "lean"
    })
}

/// Request body whose weight-loss target falls under the 1200 kcal floor
pub fn floor_request() -> serde_json::Value {
    serde_json::json!({
        "weight_kg": 40.0,
        "height_cm": 150.0,
        "age_years": 80,
        "sex": "female",
        "activity_level": "sedentary",
        "objective": "weight_loss",
        "body_profile": "lean"
    })
}
