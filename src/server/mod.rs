//! HTTP service for the glitch effects
//!
//! Routes:
//!
//! | Method | Path              | Body                     | Response            |
//! |--------|-------------------|--------------------------|---------------------|
//! | GET    | `/`               |                          | `{message}`         |
//! | POST   | `/glitch`         | `{text, style, font?}`   | `{glitched_text}`   |
//! | POST   | `/glitch/preview` | `{text, style, font?}`   | `{glitched_text}`   |
//! | POST   | `/glitch/image`   | `{glitchedText, font?}`  | `{image_base64}`    |
//!
//! Only `/glitch` is rate limited. Validation failures answer 422, rate
//! limiting 429, and every internal fault (panics included) a generic 500.

pub mod error;
pub mod handlers;
pub mod models;
pub mod rate_limit;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};
use log::{info, warn};
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, AllowOrigin, CorsLayer};

use crate::config::GlitchConfig;
use crate::fonts::FontCatalog;
use crate::layout::LayoutOptions;

pub use error::ApiError;
pub use rate_limit::{RateDecision, RateLimiter};

/// Shared, read-mostly state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<GlitchConfig>,
    pub fonts: Arc<FontCatalog>,
    pub limiter: Arc<RateLimiter>,
    pub layout: LayoutOptions,
}

impl AppState {
    pub fn new(config: GlitchConfig) -> Self {
        let limiter = RateLimiter::new(
            config.limits.rate_limit_requests,
            Duration::from_secs(config.limits.rate_limit_window_secs),
        );
        let fonts = FontCatalog::new(config.render.fonts_dir.clone());
        Self {
            config: Arc::new(config),
            fonts: Arc::new(fonts),
            limiter: Arc::new(limiter),
            layout: LayoutOptions::default(),
        }
    }
}

/// Error starting or running the server
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServeError {
    #[error("invalid bind address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the router for `config`.
pub fn create_app(config: GlitchConfig) -> Router {
    app_with_state(AppState::new(config))
}

/// Build the router around existing state.
pub fn app_with_state(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);

    let limited = Router::new()
        .route("/glitch", post(handlers::glitch))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::limit_by_client));

    Router::new()
        .route("/", get(handlers::root))
        .route("/glitch/preview", post(handlers::glitch_preview))
        .route("/glitch/image", post(handlers::glitch_image))
        .merge(limited)
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// CORS for the configured origins; `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new().allow_origin(allow_origin).allow_methods(cors::Any).allow_headers(cors::Any)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    ApiError::Internal(format!("handler panicked: {}", message)).into_response()
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: GlitchConfig) -> Result<(), ServeError> {
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|source| ServeError::InvalidAddress { addr: config.server.bind.clone(), source })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "listening on {} (origins: {}, fonts: {})",
        listener.local_addr()?,
        config.server.allowed_origins.join(","),
        config.render.fonts_dir.display()
    );

    let app = create_app(config);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
