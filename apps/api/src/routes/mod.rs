pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::content::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // One-shot content processing
        .route("/api/v1/content/process", post(handlers::handle_process))
        .route("/api/v1/content/emoji", post(handlers::handle_emoji))
        .route("/api/v1/content/paginate", post(handlers::handle_paginate))
        .route("/api/v1/content/slides", post(handlers::handle_split_slides))
        // Generation-tagged editing sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:id", delete(handlers::handle_delete_session))
        .route(
            "/api/v1/sessions/:id/draft",
            put(handlers::handle_submit_draft),
        )
        .route(
            "/api/v1/sessions/:id/slides",
            get(handlers::handle_get_slides),
        )
        .route(
            "/api/v1/sessions/:id/slides/:index",
            get(handlers::handle_get_slide),
        )
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::new(Config::default()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    // ── health ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "card-api");
    }

    // ── content ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_process_without_emoji_splits_on_budget() {
        let content = "字".repeat(200);
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/content/process",
            Some(json!({ "content": content, "add_emojis": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slides"].as_array().unwrap().len(), 2);
        assert!(body["content"].as_str().unwrap().contains("\n\n===\n\n"));
    }

    #[tokio::test]
    async fn test_empty_content_is_rejected() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/content/process",
            Some(json!({ "content": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_emoji_endpoint_reports_category() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/content/emoji",
            Some(json!({ "content": "今天的火锅和咖啡都很好吃" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "food");
        assert_eq!(body["decorated_lines"], 1);
    }

    #[tokio::test]
    async fn test_split_slides_endpoint() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/content/slides",
            Some(json!({ "content": "A\n===\nB" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["slides"], json!(["A", "B"]));
    }

    #[tokio::test]
    async fn test_paginate_endpoint_uses_measured_path() {
        let content = "这是一行用来测试分页的文字。\n".repeat(50);
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/content/paginate",
            Some(json!({
                "content": content,
                "title": "测试",
                "style": { "aspect_ratio": "9:16", "layout": "minimalist" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["auto_paginated"], true);
        assert!(body["slides"].as_array().unwrap().len() > 1);
        assert!(body["budget_px"].as_f64().unwrap() > 0.0);
    }

    // ── sessions ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_session_flow() {
        let app = app();
        let (status, created) = send(&app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/slides"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, outcome) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/draft"),
            Some(json!({
                "title": "清单",
                "content": "第一页\n===\n第二页",
                "auto_emoji": false
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["status"], "committed");
        assert_eq!(outcome["slide_set"]["generation"], 1);

        let (status, slide) = send(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/slides/1"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(slide["content"], "第二页");
        assert_eq!(slide["total"], 2);

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/slides/5"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let uri = format!("/api/v1/sessions/{}/slides", uuid::Uuid::new_v4());
        let (status, body) = send(&app(), Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
