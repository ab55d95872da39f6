//! Tally Web Server
//!
//! Axum-based REST API around the Tally insight engine.
//!
//! - `POST /api/analytics` - prioritised insights for a sales snapshot
//! - `POST /api/statistics` - dashboard figures and weekday suggestions
//! - `GET /api/health` - liveness probe
//!
//! Both analysis endpoints answer a bare `OPTIONS` with an empty 200 and any
//! other verb with a JSON 405. CORS is permissive: the endpoints are called
//! directly from browser-side POS clients on arbitrary origins.

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use tower_http::{
    cors::{Any as AnyOrigin, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use tally_core::{EngineConfig, InsightEngine};

mod handlers;

/// Maximum request body size (10 MB)
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Thresholds, weekday names and locale for the engine
    pub engine: EngineConfig,
    /// Pin the reference time instead of using the wall clock
    pub reference_time: Option<DateTime<Utc>>,
}

/// Shared application state
pub struct AppState {
    pub engine: InsightEngine,
    pub reference_time: Option<DateTime<Utc>>,
}

impl AppState {
    /// Reference time for one request
    pub fn now(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }
}

/// Create the application router
pub fn create_router(static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        engine: InsightEngine::with_config(config.engine),
        reference_time: config.reference_time,
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/analytics",
            post(handlers::analytics)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/statistics",
            post(handlers::statistics)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        );

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers([
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            HeaderName::from_static("accept-version"),
            header::CONTENT_LENGTH,
            HeaderName::from_static("content-md5"),
            header::CONTENT_TYPE,
            header::DATE,
            HeaderName::from_static("x-api-version"),
        ]);

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    match config.engine.utc_offset {
        Some(offset) => info!("Local calendar days use UTC{}", offset),
        None => info!("Local calendar days use the host time zone"),
    }

    let app = create_router(static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            detail: None,
            internal: None,
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: "Method not allowed".to_string(),
            detail: None,
            internal: None,
        }
    }

    pub fn internal(detail: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
            detail: Some(detail.to_string()),
            internal: None,
        }
    }

    /// A computation that panicked on the blocking pool
    pub fn panicked(payload: Box<dyn Any + Send>) -> Self {
        let detail = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "computation panicked".to_string()
        };
        Self::internal(&detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        } else if self.status.is_server_error() {
            error!(detail = self.detail.as_deref().unwrap_or(""), "Internal error");
        }

        let body = match self.detail {
            Some(detail) => Json(serde_json::json!({
                "error": self.message,
                "message": detail,
            })),
            None => Json(serde_json::json!({
                "error": self.message
            })),
        };

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
            detail: Some(err.to_string()),
            // Keep full error chain for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
