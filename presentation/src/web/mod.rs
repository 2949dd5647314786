//! Web form server
//!
//! # Endpoints
//!
//! - `GET /` - Consultation form
//! - `POST /consult` - Form submission, answered with an HTML page
//! - `POST /api/v1/consultations` - JSON `{age, gender, disease}` → consultation result
//! - `GET /health` - Health check
//!
//! Every request builds its own pipeline; the executor behind the use case is
//! shared read-only.

mod page;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use health_crew_application::{PipelineExecutor, RunConsultationUseCase};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use routes::{ErrorResponse, HealthResponse};

/// Shared state of the web server.
pub struct AppState {
    pub use_case: RunConsultationUseCase<dyn PipelineExecutor>,
}

impl AppState {
    pub fn new(use_case: RunConsultationUseCase<dyn PipelineExecutor>) -> Self {
        Self { use_case }
    }
}

/// Create the router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/consult", post(routes::consult_form))
        .route("/api/v1/consultations", post(routes::consult_json))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the form on `addr` until the process is stopped.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Serving consultation form");
    axum::serve(listener, create_router(state)).await
}
