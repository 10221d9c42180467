//! Deterministic health scoring and triage.
//!
//! Score precedence: live model result, then the manual pain/symptom
//! heuristic. Demo reports never count as a model result.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::report::{clamp_score, PredictionReport};

/// Lowest score still considered good
pub const GOOD_FROM: u8 = 80;

/// Scores below this are emergencies
pub const EMERGENCY_BELOW: u8 = 50;

/// Emergency boundary used by the older results page
pub const LEGACY_EMERGENCY_BELOW: u8 = 40;

/// Deduction per pain step above "no pain"
pub const PAIN_STEP_PENALTY: i32 = 15;

/// Deduction per reported symptom
pub const SYMPTOM_PENALTY: i32 = 8;

/// Manual score from self-reported data. Pain 0 means "not chosen" and deducts nothing.
pub fn manual_health_score(pain: u8, symptom_count: usize) -> u8 {
    let pain_steps = i32::from(pain.saturating_sub(1));
    let symptoms = i32::try_from(symptom_count).unwrap_or(i32::MAX / SYMPTOM_PENALTY);
    let score = 100 - pain_steps * PAIN_STEP_PENALTY - symptoms.saturating_mul(SYMPTOM_PENALTY);
    score.clamp(0, 100) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriageTier {
    Good,
    AttentionNeeded,
    Emergency,
}

impl TriageTier {
    pub fn headline_key(self) -> &'static str {
        match self {
            TriageTier::Good => "triageGoodTitle",
            TriageTier::AttentionNeeded => "triageAttentionTitle",
            TriageTier::Emergency => "triageEmergencyTitle",
        }
    }

    pub fn advice_key(self) -> &'static str {
        match self {
            TriageTier::Good => "triageGoodAdvice",
            TriageTier::AttentionNeeded => "triageAttentionAdvice",
            TriageTier::Emergency => "triageEmergencyAdvice",
        }
    }
}

impl fmt::Display for TriageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriageTier::Good => write!(f, "good"),
            TriageTier::AttentionNeeded => write!(f, "attention-needed"),
            TriageTier::Emergency => write!(f, "emergency"),
        }
    }
}

/// Where the final score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// The ML service's own overall score
    ReportedOverall,
    /// 100 minus the top-class confidence
    InverseConfidence,
    /// Pain and symptom heuristic
    Manual,
}

/// Knobs that differ between result-page variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverPolicy {
    /// Use `overallHealthScore` over `100 - confidence` when both exist
    pub prefer_reported_score: bool,
    pub good_from: u8,
    pub emergency_below: u8,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            prefer_reported_score: true,
            good_from: GOOD_FROM,
            emergency_below: EMERGENCY_BELOW,
        }
    }
}

impl ResolverPolicy {
    /// Thresholds of the older results page (emergency below 40).
    pub fn legacy() -> Self {
        Self {
            emergency_below: LEGACY_EMERGENCY_BELOW,
            ..Self::default()
        }
    }

    pub fn tier_for(&self, score: u8) -> TriageTier {
        if score >= self.good_from {
            TriageTier::Good
        } else if score >= self.emergency_below {
            TriageTier::AttentionNeeded
        } else {
            TriageTier::Emergency
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub score: u8,
    pub tier: TriageTier,
    pub source: ScoreSource,
}

/// Decide the displayed score and tier from whatever inputs are available.
pub fn resolve(
    pain: u8,
    symptom_count: usize,
    prediction: Option<&PredictionReport>,
    policy: &ResolverPolicy,
) -> Resolution {
    let live = prediction.filter(|p| !p.is_demo_mode);

    let (score, source) = match live {
        Some(report) => match report.overall_health_score {
            Some(reported) if policy.prefer_reported_score => {
                (reported.min(100), ScoreSource::ReportedOverall)
            }
            _ => (
                clamp_score(100.0 - report.confidence),
                ScoreSource::InverseConfidence,
            ),
        },
        None => (
            manual_health_score(pain, symptom_count),
            ScoreSource::Manual,
        ),
    };

    Resolution {
        score,
        tier: policy.tier_for(score),
        source,
    }
}

/// Severity bands used to colour per-tooth confidence overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceSeverity {
    Good,
    Caution,
    Warning,
    Critical,
}

impl ConfidenceSeverity {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 80.0 {
            ConfidenceSeverity::Critical
        } else if confidence >= 60.0 {
            ConfidenceSeverity::Warning
        } else if confidence >= 40.0 {
            ConfidenceSeverity::Caution
        } else {
            ConfidenceSeverity::Good
        }
    }
}
