//! DentAssist daemon library - exposes modules for testing.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod upstream;

pub use config::Config;
pub use error::ProxyError;
pub use server::AppState;
