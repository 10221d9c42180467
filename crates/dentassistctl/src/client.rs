//! HTTP client for communicating with dentassistd.
//!
//! `predict` never fails: anything short of a clean success envelope is
//! logged and replaced with a locally generated demo report.

use crate::errors::ClientError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use dentassist_shared::demo::{demo_report, DEMO_MODEL_ACCURACY, DEMO_TRAINING_ACCURACY};
use dentassist_shared::wire::{HealthResponse, ModelInfoResponse, PredictEnvelope, PredictRequest};
use dentassist_shared::{ModelInfo, PredictionReport, UploadedImage};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{info, warn};

/// Client for the prediction proxy
pub struct PredictionClient {
    base_url: String,
    http: reqwest::Client,
}

impl PredictionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Unreachable {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Analyze an image; falls back to demo mode on any failure
    pub async fn predict(
        &self,
        image: &UploadedImage,
        pain: u8,
        symptoms: &BTreeSet<String>,
    ) -> PredictionReport {
        match self.try_predict(image).await {
            Ok(report) => {
                info!(
                    "Live prediction: {} ({:.1}%)",
                    report.disease_label, report.confidence
                );
                report
            }
            Err(e) => {
                warn!("Prediction unavailable, using demo mode: {}", e);
                demo_report(pain, symptoms)
            }
        }
    }

    /// Single live attempt, no fallback
    pub async fn try_predict(&self, image: &UploadedImage) -> Result<PredictionReport, ClientError> {
        let body = PredictRequest {
            image: Some(STANDARD.encode(image.bytes())),
        };

        let response = self
            .http
            .post(self.url("/api/predict"))
            .json(&body)
            .send()
            .await
            .map_err(|source| ClientError::Unreachable {
                url: self.base_url.clone(),
                source,
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        // Error envelopes come with a non-2xx status; prefer their message
        let envelope: Result<PredictEnvelope, _> = serde_json::from_slice(&bytes);
        match envelope {
            Ok(PredictEnvelope::Success { prediction }) if status.is_success() => {
                Ok(PredictionReport::from_prediction(prediction))
            }
            Ok(PredictEnvelope::Error { message }) => Err(ClientError::Envelope(message)),
            Ok(PredictEnvelope::Success { .. }) => Err(ClientError::Status(status.as_u16())),
            Err(_) if !status.is_success() => Err(ClientError::Status(status.as_u16())),
            Err(e) => Err(ClientError::Decode(e.to_string())),
        }
    }

    /// Model status; falls back to fixed demo figures
    pub async fn model_info(&self) -> ModelInfo {
        match self.get_json::<ModelInfoResponse>("/api/model/info").await {
            Ok(info) => ModelInfo {
                model_loaded: info.model_loaded,
                training_accuracy: info.training_accuracy,
                validation_accuracy: info.validation_accuracy,
            },
            Err(e) => {
                warn!("Model info unavailable: {}", e);
                ModelInfo {
                    model_loaded: false,
                    training_accuracy: DEMO_TRAINING_ACCURACY,
                    validation_accuracy: DEMO_MODEL_ACCURACY,
                }
            }
        }
    }

    /// Proxy liveness
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json("/api/health").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| ClientError::Unreachable {
                url: self.base_url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let client = PredictionClient::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/health"), "http://localhost:8080/api/health");
    }
}
