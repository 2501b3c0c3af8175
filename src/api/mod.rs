//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/intervals", post(save_interval_handler))
        .route("/intervals/latest", get(latest_interval_handler))
        .route("/configure", post(configure_handler))
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::services::IntervalStore;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            Duration::from_millis(10),
            IntervalStore::in_memory(),
        ))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let req = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (status, body) = send(create_router(test_state()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn start_before_configure_is_conflict() {
        let (status, body) = send(create_router(test_state()), "POST", "/start", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn zero_repetitions_are_rejected() {
        let state = test_state();
        let (status, _) = send(
            create_router(Arc::clone(&state)),
            "POST",
            "/intervals",
            Some(r#"{"work_ms":1000,"rest_ms":500,"repetitions":0}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.store.is_empty());
    }

    #[tokio::test]
    async fn save_start_pause_and_status() {
        let state = test_state();

        let (status, body) = send(
            create_router(Arc::clone(&state)),
            "POST",
            "/intervals",
            Some(r#"{"work_ms":60000,"rest_ms":30000,"repetitions":4}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"]["state"], "initialized");
        assert_eq!(body["progress"]["phase"], "work");
        assert_eq!(body["progress"]["phases_left"], 7);

        let (status, body) = send(create_router(Arc::clone(&state)), "POST", "/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"]["state"], "running");

        let (status, body) = send(create_router(Arc::clone(&state)), "POST", "/pause", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"]["state"], "paused");

        let (status, body) = send(create_router(Arc::clone(&state)), "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"]["state"], "paused");
        assert_eq!(body["progress"]["total_ms"], 60000);
        assert_eq!(body["last_action"], "pause");

        let (status, body) =
            send(create_router(Arc::clone(&state)), "GET", "/intervals/latest", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["repetitions"], 4);
    }

    #[tokio::test]
    async fn configure_and_reset() {
        let state = test_state();

        let (status, body) = send(create_router(Arc::clone(&state)), "POST", "/configure", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"]["state"], "initialized");

        let (status, body) = send(create_router(Arc::clone(&state)), "POST", "/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"]["state"], "finished");

        let (status, _) = send(create_router(Arc::clone(&state)), "POST", "/pause", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
