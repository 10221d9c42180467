//! Proxy errors and their uniform `{status:"error", message}` rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dentassist_shared::wire::ErrorEnvelope;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Client sent something we cannot forward
    #[error("{0}")]
    BadRequest(String),

    /// ML service answered, but not with a usable success payload
    #[error("{0}")]
    Upstream(String),

    /// ML service could not be reached or timed out
    #[error("{message}: {source}")]
    Unreachable {
        message: &'static str,
        source: reqwest::Error,
    },
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) | ProxyError::Unreachable { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message safe to hand back to the client
    pub fn public_message(&self) -> String {
        match self {
            ProxyError::BadRequest(msg) | ProxyError::Upstream(msg) => msg.clone(),
            ProxyError::Unreachable { message, .. } => message.to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::BadRequest(msg) => warn!("Bad request: {}", msg),
            ProxyError::Upstream(msg) => warn!("Upstream rejected request: {}", msg),
            ProxyError::Unreachable { .. } => error!("ML service unreachable: {}", self),
        }

        (self.status(), Json(ErrorEnvelope::new(self.public_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProxyError::BadRequest("No image provided".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::Upstream("Prediction failed".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ProxyError::Upstream("Model prediction failed".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
