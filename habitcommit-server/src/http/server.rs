//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS
//! - Request tracing
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::store::HabitStore;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:5001)
    pub bind_addr: SocketAddr,

    /// Optional prefix every route is nested under, e.g. `/api`
    pub base_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5001)),
            base_path: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HabitStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn HabitStore>) -> Self {
        Self { store }
    }
}

/// Build the API router (routes at the root, no middleware).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::habits::router())
        .merge(routes::commits::router())
        .with_state(Arc::new(state))
}

/// Normalise a configured base path. `None`, empty and `/` all mean "root".
fn normalize_base_path(base_path: Option<&str>) -> Option<String> {
    let trimmed = base_path?.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{trimmed}"))
    }
}

/// Router with the base path applied and the middleware stack attached.
pub fn app(state: AppState, base_path: Option<&str>) -> Router {
    let api = build_router(state);
    let router = match normalize_base_path(base_path) {
        Some(prefix) => Router::new().nest(&prefix, api),
        None => api,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let store = SqliteStore::open("habits.db").await?;
/// run_server(Arc::new(store), ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    store: Arc<dyn HabitStore>,
    config: ServerConfig,
) -> Result<(), ServerError> {
    let prefix = normalize_base_path(config.base_path.as_deref());
    let router = app(AppState::new(store), prefix.as_deref());

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);
    for (method, path) in routes::ROUTE_TABLE {
        tracing::info!(
            "  {:<6} {}{}",
            method,
            prefix.as_deref().unwrap_or_default(),
            path
        );
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn test_state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("habits.db")).await.unwrap();
        (dir, AppState::new(Arc::new(store)))
    }

    #[test]
    fn default_config_binds_all_interfaces() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 5001);
        assert!(config.bind_addr.ip().is_unspecified());
        assert!(config.base_path.is_none());
    }

    #[test]
    fn base_path_normalization() {
        assert_eq!(normalize_base_path(None), None);
        assert_eq!(normalize_base_path(Some("")), None);
        assert_eq!(normalize_base_path(Some("/")), None);
        assert_eq!(normalize_base_path(Some("api")), Some("/api".into()));
        assert_eq!(normalize_base_path(Some("/api/")), Some("/api".into()));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (_dir, state) = test_state().await;
        let response = build_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn base_path_nests_routes() {
        let (_dir, state) = test_state().await;
        let router = app(state, Some("/api"));

        let nested = router
            .clone()
            .oneshot(Request::builder().uri("/api/habits").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(nested.status(), StatusCode::OK);

        let root = router
            .oneshot(Request::builder().uri("/habits").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(root.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_body_is_json_400() {
        let (_dir, state) = test_state().await;
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/habits")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }
}
