//! HTTP helpers shared by the provider adapters

use health_crew_application::ports::llm_gateway::GatewayError;
use health_crew_domain::core::string::truncate;
use reqwest::StatusCode;
use std::time::Duration;

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GatewayError::ConnectionError(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn map_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

/// Map a non-success HTTP status to a gateway error.
pub(crate) fn map_status(status: StatusCode, body: &str) -> GatewayError {
    let detail = format!("HTTP {}: {}", status.as_u16(), truncate(body.trim(), 300));
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Authentication(detail),
        StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(detail),
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(detail),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(detail),
    }
}

/// Send a JSON request and decode a JSON response, mapping every failure.
pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, GatewayError> {
    let response = request.send().await.map_err(map_send_error)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_status(status, &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::InvalidResponse(format!("failed to decode response: {e}")))
}
