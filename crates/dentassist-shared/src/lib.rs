//! Shared types and logic for DentAssist components.
//!
//! The daemon uses the wire types; the CLI drives the assessment wizard,
//! the resolver and the demo generator.

pub mod assessment;
pub mod demo;
pub mod error;
pub mod image;
pub mod locale;
pub mod report;
pub mod scoring;
pub mod symptoms;
pub mod ui;
pub mod wire;

pub use assessment::{AssessmentSession, Step};
pub use demo::demo_report;
pub use error::{DentError, ImageError, WizardError};
pub use image::{ImageFormat, UploadedImage, MAX_IMAGE_BYTES};
pub use locale::{Language, Localizer};
pub use report::PredictionReport;
pub use scoring::{resolve, Resolution, ResolverPolicy, ScoreSource, TriageTier};
pub use symptoms::{PainLevel, SYMPTOMS};
pub use wire::{ClientPrediction, ModelInfo, PredictEnvelope};

/// Workspace version, shared by both binaries
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
