//! JSON shapes exchanged between the CLI, the proxy and the ML service.
//!
//! The ML service speaks snake_case (`predicted_class`, `all_predictions`);
//! clients of the proxy see camelCase (`disease`, `allPredictions`).
//! Conversions between the two live here so both ends agree on them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default upstream when `ML_SERVICE_URL` is unset
pub const DEFAULT_ML_SERVICE_URL: &str = "http://localhost:5000";

// ============================================================================
// Client <-> proxy
// ============================================================================

/// Body of `POST /api/predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Base64 image, optionally as a `data:image/...;base64,` URL
    #[serde(default)]
    pub image: Option<String>,
}

/// Response of `POST /api/predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictEnvelope {
    Success { prediction: ClientPrediction },
    Error { message: String },
}

/// Uniform failure body for every proxy route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPrediction {
    pub disease: String,
    pub confidence: f64,
    pub health_score: f64,
    #[serde(default)]
    pub all_predictions: BTreeMap<String, f64>,
    #[serde(default)]
    pub model_accuracy: f64,
    #[serde(default)]
    pub training_accuracy: f64,
    /// Only present when the ML service reports its own overall score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_health_score: Option<f64>,
}

/// Model status as seen by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub training_accuracy: f64,
    #[serde(default)]
    pub validation_accuracy: f64,
}

/// Response of `GET /api/model/info`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfoResponse {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default)]
    pub metrics: Option<serde_json::Value>,
    pub training_accuracy: f64,
    pub validation_accuracy: f64,
}

/// Body of `POST /api/train`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    #[serde(default = "default_epochs")]
    pub epochs: u32,
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

fn default_epochs() -> u32 {
    50
}

fn default_batch_size() -> u32 {
    32
}

impl Default for TrainRequest {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            batch_size: default_batch_size(),
        }
    }
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub ml_service_url: String,
    #[serde(default)]
    pub uptime_secs: u64,
}

// ============================================================================
// Proxy <-> ML service
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamPredictResponse {
    pub status: String,
    #[serde(default)]
    pub prediction: Option<UpstreamPrediction>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamPrediction {
    pub predicted_class: String,
    pub confidence: f64,
    #[serde(default)]
    pub all_predictions: BTreeMap<String, f64>,
    #[serde(default)]
    pub model_accuracy: f64,
    #[serde(default)]
    pub training_accuracy: f64,
    #[serde(default)]
    pub overall_health_score: Option<f64>,
}

impl From<UpstreamPrediction> for ClientPrediction {
    fn from(p: UpstreamPrediction) -> Self {
        Self {
            disease: p.predicted_class,
            health_score: 100.0 - p.confidence,
            confidence: p.confidence,
            all_predictions: p.all_predictions,
            model_accuracy: p.model_accuracy,
            training_accuracy: p.training_accuracy,
            overall_health_score: p.overall_health_score,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamModelInfo {
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub metrics: Option<serde_json::Value>,
    #[serde(default)]
    pub training_accuracy: f64,
    #[serde(default)]
    pub validation_accuracy: f64,
}

impl From<UpstreamModelInfo> for ModelInfoResponse {
    fn from(info: UpstreamModelInfo) -> Self {
        Self {
            status: "success".to_string(),
            model_loaded: info.model_loaded,
            metrics: info.metrics,
            training_accuracy: info.training_accuracy,
            validation_accuracy: info.validation_accuracy,
        }
    }
}

/// Training job as the ML service expects it
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamTrainRequest {
    pub epochs: u32,
    pub batch_size: u32,
    pub data_dir: String,
}

impl From<TrainRequest> for UpstreamTrainRequest {
    fn from(req: TrainRequest) -> Self {
        Self {
            epochs: req.epochs,
            batch_size: req.batch_size,
            data_dir: "./data".to_string(),
        }
    }
}
