// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitewatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<regex::Error> for SitewatchError {
    fn from(err: regex::Error) -> Self {
        SitewatchError::InvalidPattern(err.to_string())
    }
}

impl From<globset::Error> for SitewatchError {
    fn from(err: globset::Error) -> Self {
        SitewatchError::InvalidPattern(err.to_string())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SitewatchError>;
