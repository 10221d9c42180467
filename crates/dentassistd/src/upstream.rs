//! HTTP client for the external ML service.
//!
//! One pooled `reqwest::Client` is shared by every request. No retries and
//! no caching: each call is a single forward.

use crate::config::UpstreamConfig;
use crate::error::ProxyError;
use anyhow::Result;
use dentassist_shared::wire::{
    ClientPrediction, ModelInfoResponse, TrainRequest, UpstreamModelInfo, UpstreamPredictResponse,
    UpstreamTrainRequest,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const PREDICT_FAILED: &str = "Prediction failed";
const PREDICT_UNREACHABLE: &str = "Failed to process prediction";
const MODEL_INFO_FAILED: &str = "Failed to fetch model info";
const TRAIN_FAILED: &str = "Failed to train model";
const TRAINING_STATUS_FAILED: &str = "Failed to fetch training status";
const METRICS_FAILED: &str = "Failed to fetch metrics";

pub struct MlServiceClient {
    base_url: String,
    http: reqwest::Client,
}

impl MlServiceClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Forward a base64 image and rename the result for clients.
    pub async fn predict(&self, image_base64: String) -> Result<ClientPrediction, ProxyError> {
        let form = reqwest::multipart::Form::new().text("image_base64", image_base64);

        let response = self
            .http
            .post(self.url("/api/predict"))
            .multipart(form)
            .send()
            .await
            .map_err(|source| ProxyError::Unreachable {
                message: PREDICT_UNREACHABLE,
                source,
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|source| ProxyError::Unreachable {
            message: PREDICT_UNREACHABLE,
            source,
        })?;

        let parsed: UpstreamPredictResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Unparseable prediction body (HTTP {}): {}", status, e);
                return Err(ProxyError::Upstream(PREDICT_FAILED.to_string()));
            }
        };

        match parsed.prediction {
            Some(prediction) if status.is_success() && parsed.status == "success" => {
                info!(
                    "Prediction: {} ({:.1}%)",
                    prediction.predicted_class, prediction.confidence
                );
                Ok(prediction.into())
            }
            _ => Err(ProxyError::Upstream(
                parsed.message.unwrap_or_else(|| PREDICT_FAILED.to_string()),
            )),
        }
    }

    pub async fn model_info(&self) -> Result<ModelInfoResponse, ProxyError> {
        let info: UpstreamModelInfo = self.get_json("/api/model/info", MODEL_INFO_FAILED).await?;
        Ok(info.into())
    }

    /// Start a training run; blocks until the ML service answers.
    pub async fn train(&self, request: TrainRequest) -> Result<Value, ProxyError> {
        let body = UpstreamTrainRequest::from(request);
        info!("Requesting training: {} epochs, batch {}", body.epochs, body.batch_size);

        let response = self
            .http
            .post(self.url("/api/train"))
            .json(&body)
            .send()
            .await
            .map_err(|source| ProxyError::Unreachable {
                message: TRAIN_FAILED,
                source,
            })?;

        response.json::<Value>().await.map_err(|source| ProxyError::Unreachable {
            message: TRAIN_FAILED,
            source,
        })
    }

    pub async fn training_status(&self) -> Result<Value, ProxyError> {
        self.get_json("/api/training-status", TRAINING_STATUS_FAILED).await
    }

    pub async fn metrics(&self) -> Result<Value, ProxyError> {
        self.get_json("/api/metrics", METRICS_FAILED).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        failure: &'static str,
    ) -> Result<T, ProxyError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| ProxyError::Unreachable {
                message: failure,
                source,
            })?;

        if !response.status().is_success() {
            debug!("GET {} returned HTTP {}", path, response.status());
            return Err(ProxyError::Upstream(failure.to_string()));
        }

        response.json::<T>().await.map_err(|e| {
            debug!("GET {} returned malformed JSON: {}", path, e);
            ProxyError::Upstream(failure.to_string())
        })
    }
}
