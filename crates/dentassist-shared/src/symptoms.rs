//! Pain scale and symptom catalog offered by the assessment.

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// Symptoms a patient can report, in display order.
pub const SYMPTOMS: [&str; 8] = [
    "Tooth sensitivity",
    "Persistent pain",
    "Swelling/abscess",
    "Bleeding gums",
    "Loose teeth",
    "Bad breath",
    "Difficulty chewing",
    "Jaw pain",
];

pub const MIN_PAIN: u8 = 1;
pub const MAX_PAIN: u8 = 5;

/// Self-reported pain, 1 (none) to 5 (extreme).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PainLevel(u8);

impl PainLevel {
    pub fn new(level: u8) -> Result<Self, WizardError> {
        if (MIN_PAIN..=MAX_PAIN).contains(&level) {
            Ok(Self(level))
        } else {
            Err(WizardError::InvalidPainLevel(level))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Translation key for the short label
    pub fn label_key(self) -> &'static str {
        ["noPain", "mild", "moderate", "severe", "extreme"][usize::from(self.0 - 1)]
    }

    /// Translation key for the one-line description
    pub fn description_key(self) -> &'static str {
        [
            "perfectlyFine",
            "slightDiscomfort",
            "noticeablePain",
            "hardToManage",
            "unbearable",
        ][usize::from(self.0 - 1)]
    }

    pub fn all() -> impl Iterator<Item = PainLevel> {
        (MIN_PAIN..=MAX_PAIN).map(PainLevel)
    }
}

impl TryFrom<u8> for PainLevel {
    type Error = WizardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PainLevel::new(value)
    }
}

impl From<PainLevel> for u8 {
    fn from(level: PainLevel) -> Self {
        level.0
    }
}

/// Resolve user input to the catalog spelling, ignoring case and surrounding space.
pub fn canonical_symptom(name: &str) -> Option<&'static str> {
    let wanted = name.trim();
    SYMPTOMS
        .iter()
        .copied()
        .find(|s| s.eq_ignore_ascii_case(wanted))
}

/// Catalog symptoms mentioned anywhere in a free-text transcript.
pub fn symptoms_in_transcript(transcript: &str) -> Vec<&'static str> {
    let lower = transcript.to_lowercase();
    SYMPTOMS
        .iter()
        .copied()
        .filter(|s| lower.contains(&s.to_lowercase()))
        .collect()
}

/// Case-insensitive membership test against a reported symptom list.
pub fn has_symptom<'a, I>(symptoms: I, name: &str) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    symptoms.into_iter().any(|s| s.eq_ignore_ascii_case(name))
}
