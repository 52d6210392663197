//! # HTTP Server
//!
//! Axum server feeding every path and verb into the gateway router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use uuid::Uuid;

use crate::gateway::{self, GatewayError};
use crate::observability::{log_event_with_fields, Event};
use crate::store::App;

use super::config::GatewayConfig;

/// Immutable per-process context shared by every handler
pub struct GatewayState {
    app: Arc<dyn App>,
}

impl GatewayState {
    pub fn new(app: Arc<dyn App>) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &Arc<dyn App> {
        &self.app
    }
}

/// HTTP server for the gateway
pub struct GatewayServer {
    config: GatewayConfig,
    router: Router,
}

impl GatewayServer {
    /// Create a server bound to an already connected app
    pub fn new(config: GatewayConfig, app: Arc<dyn App>) -> Self {
        let router = build_router(&config, Arc::new(GatewayState::new(app)));
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address: {}", e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        log_event_with_fields(
            Event::ServeStart,
            &[("addr", bound.as_str()), ("app", self.config.app.as_str())],
        );

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

/// Build the router: one catch-all route, any method. Row values have no
/// size limit, so axum's default body limit is off.
pub fn build_router(config: &GatewayConfig, state: Arc<GatewayState>) -> Router {
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/", any(root_handler))
        .route("/*path", any(path_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
}

async fn root_handler(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    body: Bytes,
) -> Response {
    dispatch(state, method, String::new(), body).await
}

async fn path_handler(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Response {
    match path {
        Ok(Path(path)) => dispatch(state, method, path, body).await,
        // Percent-decoding produced bytes that are not UTF-8
        Err(rejection) => {
            let err = GatewayError::MalformedRequest(format!(
                "invalid request path: {}",
                rejection.body_text()
            ));
            finish(
                &Uuid::new_v4().to_string(),
                &method,
                uri.path(),
                err.into_response(),
            )
        }
    }
}

/// Run the blocking gateway call off the async workers, then log the outcome
async fn dispatch(state: Arc<GatewayState>, method: Method, path: String, body: Bytes) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let app = Arc::clone(&state.app);
    let call_method = method.clone();
    let call_path = path.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        gateway::route(app.as_ref(), &call_method, &call_path, &body)
    })
    .await
    .unwrap_or_else(|e| Err(GatewayError::backend(format!("request task failed: {}", e))));

    let response = match outcome {
        Ok(reply) => reply.into_response(),
        Err(err) => err.into_response(),
    };

    finish(&request_id, &method, &format!("/{}", path), response)
}

/// Log the completed request and hand the response back
fn finish(request_id: &str, method: &Method, path: &str, response: Response) -> Response {
    let status = response.status().as_u16().to_string();
    log_event_with_fields(
        Event::RequestHandled,
        &[
            ("request_id", request_id),
            ("method", method.as_str()),
            ("path", path),
            ("status", status.as_str()),
        ],
    );

    response
}
