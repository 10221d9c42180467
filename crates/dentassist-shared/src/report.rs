//! Normalized prediction report consumed by the results view.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::wire::ClientPrediction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub disease_label: String,
    /// Top-class confidence, 0-100
    pub confidence: f64,
    /// Always within 0-100
    pub health_score: u8,
    pub per_class_confidence: BTreeMap<String, f64>,
    pub model_accuracy: f64,
    pub training_accuracy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_health_score: Option<u8>,
    /// Synthesized locally because the model could not be reached
    pub is_demo_mode: bool,
}

impl PredictionReport {
    /// Build a live report from the proxy's prediction payload.
    ///
    /// The top-class confidence decides the scale for the whole payload, so a
    /// class below 1% on the percentage scale is not mistaken for a fraction.
    pub fn from_prediction(p: ClientPrediction) -> Self {
        let scale = ConfidenceScale::detect(p.confidence);
        let confidence = scale.to_percent(p.confidence);
        let per_class_confidence = p
            .all_predictions
            .into_iter()
            .map(|(label, value)| (label, scale.to_percent(value)))
            .collect();

        Self {
            disease_label: p.disease,
            confidence,
            // Recomputed so fractional confidences still give a 0-100 score
            health_score: clamp_score(100.0 - confidence),
            per_class_confidence,
            model_accuracy: scale.to_percent(p.model_accuracy),
            training_accuracy: scale.to_percent(p.training_accuracy),
            overall_health_score: p.overall_health_score.map(clamp_score),
            is_demo_mode: false,
        }
    }

    /// Per-class confidences, highest first.
    pub fn ranked_classes(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .per_class_confidence
            .iter()
            .map(|(label, value)| (label.as_str(), *value))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Scale of every confidence in one prediction payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceScale {
    Fraction,
    Percent,
}

impl ConfidenceScale {
    /// A top-class confidence at or below 1 means the payload uses fractions.
    pub fn detect(top_confidence: f64) -> Self {
        if top_confidence.is_finite() && top_confidence <= 1.0 {
            ConfidenceScale::Fraction
        } else {
            ConfidenceScale::Percent
        }
    }

    /// Convert onto 0-100, clamped; non-finite values become 0.
    pub fn to_percent(self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let pct = match self {
            ConfidenceScale::Fraction => value * 100.0,
            ConfidenceScale::Percent => value,
        };
        pct.clamp(0.0, 100.0)
    }
}

/// Round and clamp any score into 0-100.
pub fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(confidence: f64) -> ClientPrediction {
        ClientPrediction {
            disease: "Caries".to_string(),
            confidence,
            health_score: 100.0 - confidence,
            all_predictions: BTreeMap::from([
                ("Caries".to_string(), confidence),
                ("Healthy".to_string(), 100.0 - confidence),
            ]),
            model_accuracy: 92.0,
            training_accuracy: 91.0,
            overall_health_score: None,
        }
    }

    #[test]
    fn test_confidence_scale() {
        assert_eq!(ConfidenceScale::detect(0.75), ConfidenceScale::Fraction);
        assert_eq!(ConfidenceScale::detect(75.0), ConfidenceScale::Percent);
        assert_eq!(ConfidenceScale::detect(f64::NAN), ConfidenceScale::Percent);
        assert_eq!(ConfidenceScale::Fraction.to_percent(0.75), 75.0);
        assert_eq!(ConfidenceScale::Percent.to_percent(0.4), 0.4);
        assert_eq!(ConfidenceScale::Percent.to_percent(140.0), 100.0);
        assert_eq!(ConfidenceScale::Percent.to_percent(-3.0), 0.0);
        assert_eq!(ConfidenceScale::Fraction.to_percent(f64::NAN), 0.0);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-12.0), 0);
        assert_eq!(clamp_score(49.6), 50);
        assert_eq!(clamp_score(250.0), 100);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn test_from_prediction() {
        let report = PredictionReport::from_prediction(prediction(80.0));
        assert_eq!(report.disease_label, "Caries");
        assert_eq!(report.health_score, 20);
        assert_eq!(report.model_accuracy, 92.0);
        assert!(!report.is_demo_mode);
        assert_eq!(report.ranked_classes()[0], ("Caries", 80.0));
    }

    #[test]
    fn test_small_classes_keep_percentage_scale() {
        let mut p = prediction(97.2);
        p.all_predictions = BTreeMap::from([
            ("Caries".to_string(), 97.2),
            ("Gingivitis".to_string(), 2.4),
            ("Healthy".to_string(), 0.4),
        ]);
        let report = PredictionReport::from_prediction(p);

        assert_eq!(report.per_class_confidence["Healthy"], 0.4);
        assert_eq!(report.per_class_confidence["Gingivitis"], 2.4);
        let total: f64 = report.per_class_confidence.values().sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(report.health_score, 3);
    }

    #[test]
    fn test_fraction_payload_scaled_uniformly() {
        let mut p = prediction(0.8);
        p.all_predictions = BTreeMap::from([
            ("Caries".to_string(), 0.8),
            ("Healthy".to_string(), 0.2),
        ]);
        p.model_accuracy = 0.92;
        p.training_accuracy = 0.91;
        let report = PredictionReport::from_prediction(p);

        assert_eq!(report.confidence, 80.0);
        assert_eq!(report.per_class_confidence["Healthy"], 20.0);
        assert_eq!(report.model_accuracy, 92.0);
        assert_eq!(report.health_score, 20);
    }
}
