//! HTTP surface: health check plus the two notes endpoints.

mod handlers;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::PipelineError, llm::generator::TextGenerator, render::DocumentRenderer,
    yt::TranscriptProvider, NotesProcessor,
};

pub use handlers::{
    ErrorResponse, NotesResponse, PingResponse, RequestJson, TranscriptNotesResponse,
};

/// Cross-origin callers allowed to use the API.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

impl AllowedOrigins {
    pub const DEFAULT_ORIGIN: &str = "http://localhost:8081";

    /// Parses a comma separated origin list; `*` allows any origin.
    ///
    /// Entries that are not `http(s)://` origins are dropped. An empty list
    /// falls back to [`Self::DEFAULT_ORIGIN`].
    pub fn parse(raw: &str) -> Self {
        let entries: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if entries.contains(&"*") {
            return AllowedOrigins::Any;
        }

        let origins: Vec<HeaderValue> = entries
            .into_iter()
            .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
            .filter_map(|s| {
                HeaderValue::from_str(s.trim_end_matches('/'))
                    .inspect_err(|e| tracing::warn!(origin = s, error = %e, "Ignoring invalid origin"))
                    .ok()
            })
            .collect();

        if origins.is_empty() {
            return AllowedOrigins::List(vec![HeaderValue::from_static(Self::DEFAULT_ORIGIN)]);
        }
        AllowedOrigins::List(origins)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
            .max_age(Duration::from_secs(3600));

        match self {
            // credentials cannot be combined with a wildcard origin
            AllowedOrigins::Any => layer.allow_origin(AllowOrigin::any()),
            AllowedOrigins::List(origins) => layer
                .allow_origin(AllowOrigin::list(origins.clone()))
                .allow_credentials(true),
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = match &self {
            PipelineError::Transcript(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Generation { .. } if self.is_transient() => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            PipelineError::Generation { .. } => StatusCode::BAD_GATEWAY,
        };

        let body = ErrorResponse {
            error: self.to_string(),
            stage: self.stage(),
        };

        (status, Json(body)).into_response()
    }
}

pub fn router<T, G, R>(processor: Arc<NotesProcessor<T, G, R>>, origins: &AllowedOrigins) -> Router
where
    T: TranscriptProvider + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    R: DocumentRenderer + Send + Sync + 'static,
{
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/generate_notes", post(handlers::generate_notes::<T, G, R>))
        .route("/generate", post(handlers::generate::<T, G, R>))
        .layer(TraceLayer::new_for_http())
        .layer(origins.cors_layer())
        .with_state(processor)
}

/// Serves `router` until Ctrl-C or SIGTERM.
pub async fn serve(addr: SocketAddr, router: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
