//! Error types for DentAssist.

use thiserror::Error;

use crate::assessment::Step;

#[derive(Error, Debug)]
pub enum DentError {
    #[error("Proxy not reachable: {0}")]
    ProxyUnreachable(String),

    #[error("ML service error: {0}")]
    MlService(String),

    #[error("Invalid image: {0}")]
    Image(#[from] ImageError),

    #[error("Assessment error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DentError {
    pub fn code(&self) -> i32 {
        match self {
            DentError::ProxyUnreachable(_) => -32000,
            DentError::MlService(_) => -32002,
            DentError::Image(_) => -32010,
            DentError::Wizard(_) => -32011,
            DentError::Internal(_) => -32603,
        }
    }
}

/// Rejections raised before an image ever leaves the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("No image provided")]
    Empty,

    #[error("File size must be less than 10MB (got {0} bytes)")]
    TooLarge(usize),

    #[error("Unsupported image format")]
    UnsupportedFormat,
}

/// Transitions the assessment wizard refuses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Pain level must be between 1 and 5 (got {0})")]
    InvalidPainLevel(u8),

    #[error("Select a pain level before continuing")]
    PainLevelRequired,

    #[error("Upload a teeth image before analysis")]
    ImageRequired,

    #[error("Action not available in step '{0}'")]
    WrongStep(Step),

    #[error("Unknown symptom '{0}'")]
    UnknownSymptom(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            DentError::ProxyUnreachable(String::new()),
            DentError::MlService(String::new()),
            DentError::Image(ImageError::Empty),
            DentError::Wizard(WizardError::ImageRequired),
            DentError::Internal(String::new()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_wizard_error_wraps() {
        let err: DentError = WizardError::PainLevelRequired.into();
        assert!(err.to_string().contains("pain level"));
    }
}
