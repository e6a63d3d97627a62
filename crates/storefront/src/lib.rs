//! Souq Levant Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod visitors;

use axum::{Router, extract::Request};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the storefront router with its request layers.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::{
        Json,
        body::Body,
        http::{Request as HttpRequest, StatusCode, header},
        routing::get,
    };
    use serde_json::json;
    use tokio::net::TcpListener;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::{BackendConfig, StorefrontConfig};
    use crate::middleware::{REQUEST_ID_HEADER, SESSION_COOKIE_NAME};

    async fn spawn_backend() -> Url {
        let router = Router::new().route(
            "/api/products",
            get(|| async { Json(json!([{"id": 1, "title": "Zaatar", "price": 1000}])) }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    fn test_state(backend: Url) -> AppState {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: Url::parse("http://127.0.0.1:3000").unwrap(),
            backend: BackendConfig { base_url: backend },
            session_idle: Duration::from_secs(3600),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        AppState::new(config).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(test_state(spawn_backend().await));
        let response = app
            .oneshot(HttpRequest::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_home_renders_products_and_sets_session() {
        let app = app(test_state(spawn_backend().await));
        let response = app
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with(SESSION_COOKIE_NAME));
        assert!(cookie.contains("HttpOnly"));

        let html = body_text(response).await;
        assert!(html.contains("Zaatar"));
        assert!(html.contains("فاضية حالياً"));
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_not_found() {
        let app = app(test_state(spawn_backend().await));
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/cart/add")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("product_id=99"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_is_bad_request() {
        let app = app(test_state(spawn_backend().await));
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/checkout")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("name=Rami"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
