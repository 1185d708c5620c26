//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid release name '{name}': {reason}")]
    InvalidReleaseName { name: String, reason: String },

    #[error("Invalid chart reference '{chart}': must not start with '-'")]
    InvalidChartRef { chart: String },

    #[error("Invalid values document: {0}")]
    InvalidValues(#[from] serde_yaml::Error),

    #[error("Invalid repository URL: {url} - {reason}")]
    InvalidRepoUrl { url: String, reason: String },

    #[error("Invalid repository name: {name}")]
    InvalidRepoName { name: String },

    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
