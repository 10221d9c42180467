//! DentAssist control library - exposes modules for testing

pub mod client;
pub mod commands;
pub mod config;
pub mod display;
pub mod errors;

pub use client::PredictionClient;
pub use errors::ClientError;
