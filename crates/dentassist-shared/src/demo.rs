//! Demo-mode reports, synthesized when the model cannot be reached.
//!
//! Everything here is a pure function of pain level and reported symptoms,
//! so the same inputs always produce the same placeholder result.

use std::collections::{BTreeMap, BTreeSet};

use crate::report::PredictionReport;
use crate::scoring::manual_health_score;
use crate::symptoms::has_symptom;

/// Classes the demo report distributes confidence over
pub const DEMO_CLASSES: [&str; 7] = [
    "Calculus",
    "Caries",
    "Gingivitis",
    "Healthy",
    "Hypodontia",
    "Mouth Ulcer",
    "Tooth Discoloration",
];

pub const HEALTHY: &str = "Healthy";

/// Accuracy figures shown while in demo mode
pub const DEMO_MODEL_ACCURACY: f64 = 92.0;
pub const DEMO_TRAINING_ACCURACY: f64 = 91.0;

/// Floor for the top-class confidence of a demo result
const MIN_DEMO_CONFIDENCE: f64 = 50.0;

const GUM_SYMPTOMS: [&str; 2] = ["Bleeding gums", "Loose teeth"];
const DECAY_SYMPTOMS: [&str; 4] = [
    "Swelling/abscess",
    "Persistent pain",
    "Tooth sensitivity",
    "Difficulty chewing",
];

/// Pick the demo label. First matching rule wins.
pub fn demo_label(pain: u8, symptoms: &BTreeSet<String>) -> &'static str {
    let any = |names: &[&str]| names.iter().any(|n| has_symptom(symptoms, n));

    if any(&GUM_SYMPTOMS) {
        "Gingivitis"
    } else if has_symptom(symptoms, "Bad breath") {
        "Calculus"
    } else if any(&DECAY_SYMPTOMS) || pain >= 4 {
        "Caries"
    } else if pain >= 3 || !symptoms.is_empty() {
        "Tooth Discoloration"
    } else {
        HEALTHY
    }
}

pub fn demo_report(pain: u8, symptoms: &BTreeSet<String>) -> PredictionReport {
    let label = demo_label(pain, symptoms);
    let health_score = manual_health_score(pain, symptoms.len());

    let raw = if label == HEALTHY {
        f64::from(health_score)
    } else {
        f64::from(100 - health_score)
    };
    let confidence = raw.max(MIN_DEMO_CONFIDENCE);

    let others = (DEMO_CLASSES.len() - 1) as f64;
    let share = round1((100.0 - confidence) / others);
    let per_class_confidence: BTreeMap<String, f64> = DEMO_CLASSES
        .iter()
        .map(|class| {
            let value = if *class == label { confidence } else { share };
            (class.to_string(), value)
        })
        .collect();

    PredictionReport {
        disease_label: label.to_string(),
        confidence,
        health_score,
        per_class_confidence,
        model_accuracy: DEMO_MODEL_ACCURACY,
        training_accuracy: DEMO_TRAINING_ACCURACY,
        overall_health_score: None,
        is_demo_mode: true,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
