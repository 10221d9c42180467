//! Proxy Tests
//!
//! Runs the real router against a fake ML service bound to an ephemeral
//! port, and checks the field renaming and error envelopes clients see.

use axum::{
    extract::Multipart,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use dentassistd::config::Config;
use dentassistd::server::{self, AppState};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Fake ML service: classifies anything as Caries unless the image is "ZmFpbA==" ("fail")
fn fake_ml_service() -> Router {
    async fn predict(mut multipart: Multipart) -> (StatusCode, Json<Value>) {
        let mut image = String::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            if field.name() == Some("image_base64") {
                image = field.text().await.unwrap();
            }
        }
        if image == "ZmFpbA==" {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": "Model not loaded"})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "prediction": {
                    "predicted_class": "Caries",
                    "confidence": 78.0,
                    "all_predictions": {"Caries": 78.0, "Healthy": 22.0},
                    "model_accuracy": 92.0,
                    "training_accuracy": 91.0
                }
            })),
        )
    }

    async fn model_info() -> Json<Value> {
        Json(json!({
            "model_loaded": true,
            "training_accuracy": 91.0,
            "validation_accuracy": 92.5
        }))
    }

    async fn metrics() -> Json<Value> {
        Json(json!({
            "metrics": {"accuracy": 0.9},
            "training_state": {"is_training": false}
        }))
    }

    Router::new()
        .route("/api/predict", post(predict))
        .route("/api/model/info", get(model_info))
        .route("/api/metrics", get(metrics))
}

async fn spawn_proxy(ml_url: String) -> String {
    let mut config = Config::default();
    config.upstream.url = ml_url;
    config.upstream.timeout_secs = 5;
    let state = Arc::new(AppState::new(config).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server::serve(listener, state).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A port that was bound once and then released, so nothing answers on it
async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// ============================================================================
// Prediction
// ============================================================================

#[tokio::test]
async fn test_predict_renames_fields() {
    let ml = spawn(fake_ml_service()).await;
    let proxy = spawn_proxy(format!("http://{}", ml)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/predict", proxy))
        .json(&json!({"image": "data:image/png;base64,aGVsbG8="}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    let prediction = &body["prediction"];
    assert_eq!(prediction["disease"], "Caries");
    assert_eq!(prediction["confidence"], 78.0);
    assert_eq!(prediction["healthScore"], 22.0);
    assert_eq!(prediction["allPredictions"]["Healthy"], 22.0);
    assert_eq!(prediction["modelAccuracy"], 92.0);
    assert!(prediction.get("predicted_class").is_none());
}

#[tokio::test]
async fn test_predict_accepts_multipart_file() {
    let ml = spawn(fake_ml_service()).await;
    let proxy = spawn_proxy(format!("http://{}", ml)).await;

    let part = reqwest::multipart::Part::bytes(b"hello".to_vec()).file_name("tooth.png");
    let form = reqwest::multipart::Form::new().part("image", part);
    let response = reqwest::Client::new()
        .post(format!("{}/api/predict", proxy))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["prediction"]["disease"], "Caries");
}

#[tokio::test]
async fn test_predict_missing_image_is_400() {
    let ml = spawn(fake_ml_service()).await;
    let proxy = spawn_proxy(format!("http://{}", ml)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/predict", proxy))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "error", "message": "No image provided"}));
}

#[tokio::test]
async fn test_predict_upstream_failure_passes_message() {
    let ml = spawn(fake_ml_service()).await;
    let proxy = spawn_proxy(format!("http://{}", ml)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/predict", proxy))
        .json(&json!({"image": "ZmFpbA=="}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Model not loaded");
}

#[tokio::test]
async fn test_predict_unreachable_upstream() {
    let proxy = spawn_proxy(dead_url().await).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/predict", proxy))
        .json(&json!({"image": "aGVsbG8="}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Failed to process prediction");
}

// ============================================================================
// Model info and metrics
// ============================================================================

#[tokio::test]
async fn test_model_info_renamed() {
    let ml = spawn(fake_ml_service()).await;
    let proxy = spawn_proxy(format!("http://{}", ml)).await;

    let body: Value = reqwest::get(format!("{}/api/model/info", proxy))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["modelLoaded"], true);
    assert_eq!(body["trainingAccuracy"], 91.0);
    assert_eq!(body["validationAccuracy"], 92.5);
}

#[tokio::test]
async fn test_model_info_unreachable() {
    let proxy = spawn_proxy(dead_url().await).await;

    let response = reqwest::get(format!("{}/api/model/info", proxy)).await.unwrap();
    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Failed to fetch model info");
}

#[tokio::test]
async fn test_metrics_renamed() {
    let ml = spawn(fake_ml_service()).await;
    let proxy = spawn_proxy(format!("http://{}", ml)).await;

    let body: Value = reqwest::get(format!("{}/api/metrics", proxy))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["metrics"]["accuracy"], 0.9);
    assert_eq!(body["trainingState"]["is_training"], false);
}

#[tokio::test]
async fn test_health_reports_upstream_url() {
    let ml_url = dead_url().await;
    let proxy = spawn_proxy(ml_url.clone()).await;

    let body: Value = reqwest::get(format!("{}/api/health", proxy))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["mlServiceUrl"], ml_url);
    assert!(body["uptimeSecs"].is_u64());
}
