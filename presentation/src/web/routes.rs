//! HTTP route handlers

use super::AppState;
use super::page;
use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use health_crew_application::{NoProgress, RunConsultationError};
use health_crew_domain::{ConsultationRequest, ConsultationResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip)]
    pub status: StatusCode,
}

impl From<RunConsultationError> for ErrorResponse {
    fn from(err: RunConsultationError) -> Self {
        let (status, code) = match &err {
            RunConsultationError::Executor(_) => (StatusCode::BAD_GATEWAY, "CREW_FAILED"),
            RunConsultationError::Pipeline(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_PIPELINE")
            }
        };
        Self {
            error: err.to_string(),
            code,
            status,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn index() -> Html<String> {
    Html(page::render(&ConsultationRequest::default(), None))
}

async fn run(
    state: &AppState,
    request: ConsultationRequest,
) -> Result<ConsultationResult, ErrorResponse> {
    info!(
        disease_branch = request.has_disease(),
        "Received consultation request"
    );
    state
        .use_case
        .execute_with_progress(request, &NoProgress)
        .await
        .map_err(|e| {
            error!(error = %e, "Consultation failed");
            ErrorResponse::from(e)
        })
}

/// Form submission: the page is rendered again with the report below the form.
pub async fn consult_form(
    State(state): State<Arc<AppState>>,
    Form(request): Form<ConsultationRequest>,
) -> Response {
    match run(&state, request.clone()).await {
        Ok(result) => Html(page::render(&request, Some(page::Outcome::Report(&result.report))))
            .into_response(),
        Err(e) => (
            e.status,
            Html(page::render(&request, Some(page::Outcome::Error(&e.error)))),
        )
            .into_response(),
    }
}

pub async fn consult_json(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConsultationRequest>,
) -> Result<Json<ConsultationResult>, ErrorResponse> {
    run(&state, request).await.map(Json)
}
