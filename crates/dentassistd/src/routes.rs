//! API routes for dentassistd
//!
//! Every route is a thin adapter: validate, forward, rename fields.

use crate::error::ProxyError;
use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use dentassist_shared::wire::{
    HealthResponse, ModelInfoResponse, PredictEnvelope, PredictRequest, TrainRequest,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

type AppStateArc = Arc<AppState>;

const NO_IMAGE: &str = "No image provided";

// ============================================================================
// Prediction Routes
// ============================================================================

pub fn predict_routes() -> Router<AppStateArc> {
    Router::new().route("/api/predict", post(predict))
}

async fn predict(
    State(state): State<AppStateArc>,
    request: Request,
) -> Result<Json<PredictEnvelope>, ProxyError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);

    let image = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ProxyError::BadRequest(e.body_text()))?;
        image_from_multipart(multipart).await?
    } else {
        let body = Bytes::from_request(request, &state)
            .await
            .map_err(|e| ProxyError::BadRequest(e.body_text()))?;
        image_from_json(&body)?
    };

    let image = normalize_image(image.as_deref())?;
    info!("Forwarding image ({} base64 chars)", image.len());

    let prediction = state.upstream.predict(image).await?;
    Ok(Json(PredictEnvelope::Success { prediction }))
}

fn image_from_json(body: &[u8]) -> Result<Option<String>, ProxyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<PredictRequest>(body)
        .map(|req| req.image)
        .map_err(|e| ProxyError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Pull the image out of a form: a file part `image`, or a text part `image_base64`.
async fn image_from_multipart(mut multipart: Multipart) -> Result<Option<String>, ProxyError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProxyError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ProxyError::BadRequest(e.body_text()))?;
                if bytes.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(STANDARD.encode(&bytes)));
            }
            Some("image_base64") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ProxyError::BadRequest(e.body_text()))?;
                return Ok(Some(text));
            }
            _ => continue,
        }
    }
    Ok(None)
}

/// Strip any `data:` URL prefix and make sure what remains is real base64.
/// Missing and undecodable payloads are both reported as "No image provided".
pub fn normalize_image(raw: Option<&str>) -> Result<String, ProxyError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    let payload = strip_data_url(raw).trim();
    if payload.is_empty() {
        return Err(ProxyError::BadRequest(NO_IMAGE.to_string()));
    }

    match STANDARD.decode(payload) {
        Ok(bytes) if !bytes.is_empty() => Ok(payload.to_string()),
        Ok(_) => Err(ProxyError::BadRequest(NO_IMAGE.to_string())),
        Err(e) => {
            debug!("Rejecting undecodable image payload: {}", e);
            Err(ProxyError::BadRequest(NO_IMAGE.to_string()))
        }
    }
}

fn strip_data_url(raw: &str) -> &str {
    if raw.starts_with("data:") {
        raw.split_once(',').map(|(_, data)| data).unwrap_or("")
    } else {
        raw
    }
}

// ============================================================================
// Model Routes
// ============================================================================

pub fn model_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/model/info", get(model_info))
        .route("/api/train", post(train_model))
        .route("/api/training-status", get(training_status))
        .route("/api/metrics", get(metrics))
}

async fn model_info(
    State(state): State<AppStateArc>,
) -> Result<Json<ModelInfoResponse>, ProxyError> {
    Ok(Json(state.upstream.model_info().await?))
}

async fn train_model(
    State(state): State<AppStateArc>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let request = train_request(&body)?;
    info!(
        "Training requested: {} epochs, batch size {}",
        request.epochs, request.batch_size
    );
    let data = state.upstream.train(request).await?;

    Ok(Json(json!({
        "status": data.get("status").cloned().unwrap_or(Value::Null),
        "message": data.get("message").cloned().unwrap_or(Value::Null),
        "metrics": data.get("metrics").cloned().unwrap_or(Value::Null),
    })))
}

/// An empty body trains with the defaults; anything else must be valid JSON.
fn train_request(body: &[u8]) -> Result<TrainRequest, ProxyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TrainRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ProxyError::BadRequest(format!("Invalid training request: {}", e)))
}

async fn training_status(State(state): State<AppStateArc>) -> Result<Json<Value>, ProxyError> {
    let data = state.upstream.training_status().await?;

    let mut merged = serde_json::Map::new();
    merged.insert("status".to_string(), json!("success"));
    if let Value::Object(fields) = data {
        for (key, value) in fields {
            merged.insert(key, value);
        }
    }
    Ok(Json(Value::Object(merged)))
}

async fn metrics(State(state): State<AppStateArc>) -> Result<Json<Value>, ProxyError> {
    let data = state.upstream.metrics().await?;

    Ok(Json(json!({
        "status": "success",
        "metrics": data.get("metrics").cloned().unwrap_or(Value::Null),
        "trainingState": data.get("training_state").cloned().unwrap_or(Value::Null),
    })))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/ping", get(ping))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        ml_service_url: state.upstream.base_url().to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn ping() -> Json<Value> {
    let message = std::env::var("PING_MESSAGE").unwrap_or_else(|_| "ping".to_string());
    Json(json!({ "message": message }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_base64() {
        assert_eq!(normalize_image(Some("aGVsbG8=")).unwrap(), "aGVsbG8=");
    }

    #[test]
    fn test_normalize_strips_data_url() {
        let out = normalize_image(Some("data:image/png;base64,aGVsbG8=")).unwrap();
        assert_eq!(out, "aGVsbG8=");
    }

    #[test]
    fn test_normalize_rejects_missing() {
        for input in [None, Some(""), Some("   "), Some("data:image/png;base64,")] {
            let err = normalize_image(input).unwrap_err();
            assert_eq!(err.public_message(), NO_IMAGE);
        }
    }

    #[test]
    fn test_json_body_variants() {
        assert_eq!(image_from_json(b"").unwrap(), None);
        assert_eq!(image_from_json(b"{}").unwrap(), None);
        assert_eq!(
            image_from_json(br#"{"image":"aGVsbG8="}"#).unwrap().as_deref(),
            Some("aGVsbG8=")
        );
        assert!(image_from_json(b"{not json").is_err());
    }

    #[test]
    fn test_train_request_body() {
        let defaults = train_request(b"").unwrap();
        assert_eq!((defaults.epochs, defaults.batch_size), (50, 32));

        let custom = train_request(br#"{"epochs": 5}"#).unwrap();
        assert_eq!((custom.epochs, custom.batch_size), (5, 32));

        let err = train_request(b"{epochs: 5").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        let err = normalize_image(Some("not base64 !!")).unwrap_err();
        assert_eq!(err.public_message(), NO_IMAGE);
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
