//! Error types for the audit engine

use thiserror::Error;

use crate::types::Category;

/// A check catalog that cannot produce the fixed score budgets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate check id: {0}")]
    DuplicateId(String),

    #[error("{category} has {actual} checks, expected {expected}")]
    BudgetMismatch {
        category: Category,
        expected: u32,
        actual: u32,
    },
}

/// Errors from the optional task augmenter. Any of these makes the
/// orchestrator fall back to the deterministic task list.
#[derive(Error, Debug)]
pub enum AugmentError {
    #[error("task augmentation is disabled")]
    Disabled,

    #[error("Missing API key: {env_var} not set")]
    MissingApiKey { env_var: String },

    #[cfg(feature = "fetch")]
    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse augmenter response: {0}")]
    ParseError(String),

    #[error("augmenter did not answer within {0}s")]
    Timeout(u64),
}

pub type AugmentResult<T> = Result<T, AugmentError>;

/// Invalid or unreadable configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
