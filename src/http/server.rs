//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for the collection and resource endpoints
//! - Wire up middleware (CORS, panic catching, metrics, tracing, request ID)
//! - Bind server to listener and shut down gracefully

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::backend::{BackendClient, BackendError};
use crate::config::FacadeConfig;
use crate::http::cors::{cors_middleware, CorsPolicy};
use crate::http::error::{FacadeError, INTERNAL_ERROR};
use crate::http::request::{propagate_request_id_layer, request_id_of, set_request_id_layer};
use crate::http::response::error_response;
use crate::observability::metrics;
use crate::registrations::handlers::{collection_endpoint, missing_id_endpoint, resource_endpoint};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FacadeConfig>,
    backend: Option<BackendClient>,
}

impl AppState {
    /// Build state from config. Missing credentials are allowed here and
    /// reported on each request instead.
    pub fn new(config: FacadeConfig) -> Result<Self, BackendError> {
        let backend = match config.backend.credentials() {
            Some((url, key)) => Some(BackendClient::new(
                url,
                key,
                &config.backend.table,
                config.backend.use_system_proxy,
            )?),
            None => {
                tracing::warn!("Backend credentials missing; requests will fail with 500");
                None
            }
        };
        Ok(Self {
            config: Arc::new(config),
            backend,
        })
    }

    /// The backend client, or the misconfiguration error.
    pub fn backend(&self) -> Result<&BackendClient, FacadeError> {
        self.backend.as_ref().ok_or(FacadeError::Misconfigured)
    }
}

/// HTTP server for the registrations facade.
pub struct HttpServer {
    router: Router,
    config: Arc<FacadeConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: FacadeConfig) -> Result<Self, BackendError> {
        let state = AppState::new(config)?;
        let config = state.config.clone();
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &FacadeConfig, state: AppState) -> Router {
        let path = config.listener.collection_path.as_str();

        let collection = Router::new()
            .route(path, any(collection_endpoint))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn_with_state(
                CorsPolicy::collection(&config.cors),
                cors_middleware,
            ));

        let resource = Router::new()
            .route(&format!("{path}/{{id}}"), any(resource_endpoint))
            .route(&format!("{path}/"), any(missing_id_endpoint))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn_with_state(
                CorsPolicy::resource(&config.cors),
                cors_middleware,
            ));

        collection
            .merge(resource)
            .with_state(state)
            .layer(middleware::from_fn(track_requests))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for serving or driving in-process.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            collection_path = %self.config.listener.collection_path,
            table = %self.config.backend.table,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }
}

/// Per-request metrics and a completion log line.
async fn track_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());
    let request_id = request_id_of(&request);

    let response = next.run(request).await;
    let status = response.status().as_u16();

    metrics::record_request(&method, &endpoint, status, started);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        elapsed = ?started.elapsed(),
        "Request completed"
    );
    response
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(detail = %detail, "Handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR, Some(&detail))
}
