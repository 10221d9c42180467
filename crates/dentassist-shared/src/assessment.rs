//! Assessment wizard: a strictly linear state machine.
//!
//! `initial -> symptoms -> upload -> results`. Every transition checks the
//! current step; a rejected action leaves the session untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::WizardError;
use crate::image::UploadedImage;
use crate::report::PredictionReport;
use crate::scoring::{resolve, Resolution, ResolverPolicy};
use crate::symptoms::{canonical_symptom, symptoms_in_transcript, PainLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Initial,
    Symptoms,
    Upload,
    Results,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Initial => write!(f, "initial"),
            Step::Symptoms => write!(f, "symptoms"),
            Step::Upload => write!(f, "upload"),
            Step::Results => write!(f, "results"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssessmentSession {
    step: Step,
    pain: Option<PainLevel>,
    symptoms: BTreeSet<String>,
    image: Option<UploadedImage>,
    report: Option<PredictionReport>,
    resolution: Option<Resolution>,
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self {
            step: Step::Initial,
            pain: None,
            symptoms: BTreeSet::new(),
            image: None,
            report: None,
            resolution: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn pain(&self) -> Option<PainLevel> {
        self.pain
    }

    /// Raw pain value, 0 when none was chosen
    pub fn pain_value(&self) -> u8 {
        self.pain.map(PainLevel::value).unwrap_or(0)
    }

    pub fn symptoms(&self) -> &BTreeSet<String> {
        &self.symptoms
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn report(&self) -> Option<&PredictionReport> {
        self.report.as_ref()
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    fn require(&self, step: Step) -> Result<(), WizardError> {
        if self.step == step {
            Ok(())
        } else {
            Err(WizardError::WrongStep(self.step))
        }
    }

    /// Record the pain level and move on to symptoms.
    pub fn select_pain(&mut self, level: u8) -> Result<(), WizardError> {
        self.require(Step::Initial)?;
        let pain = PainLevel::new(level)?;
        self.pain = Some(pain);
        self.step = Step::Symptoms;
        Ok(())
    }

    /// Add or remove a catalog symptom. Returns whether it is now selected.
    pub fn toggle_symptom(&mut self, name: &str) -> Result<bool, WizardError> {
        self.require(Step::Symptoms)?;
        let symptom =
            canonical_symptom(name).ok_or_else(|| WizardError::UnknownSymptom(name.to_string()))?;

        if self.symptoms.remove(symptom) {
            Ok(false)
        } else {
            self.symptoms.insert(symptom.to_string());
            Ok(true)
        }
    }

    /// Select every catalog symptom mentioned in a spoken or typed note.
    pub fn apply_transcript(&mut self, transcript: &str) -> Result<Vec<&'static str>, WizardError> {
        self.require(Step::Symptoms)?;
        let found = symptoms_in_transcript(transcript);
        for symptom in &found {
            self.symptoms.insert(symptom.to_string());
        }
        Ok(found)
    }

    /// Advance one step. Leaving `upload` goes through `complete` instead.
    pub fn next(&mut self) -> Result<Step, WizardError> {
        self.step = match self.step {
            Step::Initial if self.pain.is_none() => return Err(WizardError::PainLevelRequired),
            Step::Initial => Step::Symptoms,
            Step::Symptoms => Step::Upload,
            Step::Upload | Step::Results => return Err(WizardError::WrongStep(self.step)),
        };
        Ok(self.step)
    }

    /// Step back without discarding anything entered so far.
    pub fn back(&mut self) -> Result<Step, WizardError> {
        self.step = match self.step {
            Step::Symptoms => Step::Initial,
            Step::Upload => Step::Symptoms,
            Step::Initial | Step::Results => return Err(WizardError::WrongStep(self.step)),
        };
        Ok(self.step)
    }

    pub fn attach_image(&mut self, image: UploadedImage) -> Result<(), WizardError> {
        self.require(Step::Upload)?;
        self.image = Some(image);
        Ok(())
    }

    pub fn can_analyze(&self) -> bool {
        self.step == Step::Upload && self.image.is_some()
    }

    /// Store the analysis result, resolve the score and show results.
    pub fn complete(
        &mut self,
        report: PredictionReport,
        policy: &ResolverPolicy,
    ) -> Result<Resolution, WizardError> {
        self.require(Step::Upload)?;
        if self.image.is_none() {
            return Err(WizardError::ImageRequired);
        }

        let resolution = resolve(
            self.pain_value(),
            self.symptoms.len(),
            Some(&report),
            policy,
        );
        self.report = Some(report);
        self.resolution = Some(resolution);
        self.step = Step::Results;
        Ok(resolution)
    }

    /// Wipe everything and start over.
    pub fn reassess(&mut self) {
        *self = Self::new();
    }
}
