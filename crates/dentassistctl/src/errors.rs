//! Error codes and exit status for dentassistctl

use dentassist_shared::{DentError, ImageError, WizardError};
use thiserror::Error;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code for bad command-line input (wizard or image rejected)
pub const EXIT_INVALID_INPUT: i32 = 64;

/// Exit code when the proxy answers with something we cannot decode
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the proxy is unavailable/unreachable
pub const EXIT_PROXY_UNAVAILABLE: i32 = 70;

/// Failures talking to the proxy. The prediction path never surfaces
/// these; it falls back to demo mode instead.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Proxy not reachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Proxy returned HTTP {0}")]
    Status(u16),

    #[error("Proxy reported an error: {0}")]
    Envelope(String),

    #[error("Malformed proxy response: {0}")]
    Decode(String),
}

impl From<ClientError> for DentError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unreachable { .. } => DentError::ProxyUnreachable(err.to_string()),
            ClientError::Status(_) | ClientError::Envelope(_) => DentError::MlService(err.to_string()),
            ClientError::Decode(_) => DentError::Internal(err.to_string()),
        }
    }
}

impl ClientError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ClientError::Unreachable { .. } => EXIT_PROXY_UNAVAILABLE,
            ClientError::Decode(_) => EXIT_INVALID_RESPONSE,
            ClientError::Status(_) | ClientError::Envelope(_) => EXIT_GENERAL_ERROR,
        }
    }
}

/// Pick an exit code for an error that bubbled up to `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(client) = err.downcast_ref::<ClientError>() {
        return client.exit_code();
    }
    if err.downcast_ref::<WizardError>().is_some() || err.downcast_ref::<ImageError>().is_some() {
        return EXIT_INVALID_INPUT;
    }
    match err.downcast_ref::<DentError>() {
        Some(DentError::Image(_)) | Some(DentError::Wizard(_)) => EXIT_INVALID_INPUT,
        Some(DentError::ProxyUnreachable(_)) => EXIT_PROXY_UNAVAILABLE,
        _ => EXIT_GENERAL_ERROR,
    }
}
