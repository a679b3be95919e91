use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::model::config::ReportConfig;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "board-report.toml";

/// Load the report config.
///
/// An explicit path must exist. Otherwise `board-report.toml` in `dir` is
/// used if present, and built-in defaults if not.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<ReportConfig, ConfigError> {
    let path: PathBuf = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = dir.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(ReportConfig::default());
            }
            candidate
        }
    };

    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<ReportConfig, toml::de::Error> {
    toml::from_str(text)
}
