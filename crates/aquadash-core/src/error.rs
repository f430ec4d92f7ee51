use std::time::Duration;

use thiserror::Error;

/// Core error type for dashboard startup and rendering.
#[derive(Error, Debug)]
pub enum DashError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for DashError {
    fn from(e: serde_json::Error) -> Self {
        DashError::Serialization(e.to_string())
    }
}

impl From<handlebars::TemplateError> for DashError {
    fn from(e: handlebars::TemplateError) -> Self {
        DashError::Template(e.to_string())
    }
}

impl From<handlebars::RenderError> for DashError {
    fn from(e: handlebars::RenderError) -> Self {
        DashError::Render(e.to_string())
    }
}

/// Failure of a single status fetch.
///
/// The renderer treats every variant the same way (the banner is shown); the
/// variants exist for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("malformed status document: {0}")]
    Decode(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Result type alias using DashError.
pub type Result<T> = std::result::Result<T, DashError>;
