use std::path::PathBuf;

use crate::io::github::FetchError;
use crate::io::token::TokenError;

/// Bad user input. Always detected before anything is fetched.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("invalid time format: {0}. Use HH:MM.")]
    InvalidTime(String),
    #[error("time out of range: {0}. Hours must be 00-23 and minutes 00-59.")]
    TimeOutOfRange(String),
    #[error("a start time is required (--start HH:MM or [window] start in the config file)")]
    MissingStart,
    #[error("{0} does not exist in the local timezone")]
    NonexistentTime(String),
    #[error("could not read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Anything that stops a report from being produced
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not a raw board dump: {source}")]
    InvalidDump {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
