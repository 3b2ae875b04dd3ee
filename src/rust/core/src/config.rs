// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! `strength.toml` loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifacts::ArtifactPaths;
use crate::guardrails::InputGuardrails;

pub const DEFAULT_CONFIG_FILE: &str = "strength.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthConfig {
    pub artifacts: ArtifactPaths,
    pub logging: LoggingConfig,
    pub guardrails: InputGuardrails,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub fn parse_config(contents: &str, path: &Path) -> Result<StrengthConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_config(path: &Path) -> Result<StrengthConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents, path)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// File `load_config` would read: the explicit path, else `strength.toml`
/// in the working directory when present.
pub fn locate_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    fallback.is_file().then(|| fallback.to_path_buf())
}

/// An explicit path must exist and parse. Without one, `strength.toml` in
/// the working directory is used when present, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<StrengthConfig, ConfigError> {
    match locate_config(explicit) {
        Some(path) => read_config(&path),
        None => {
            tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(StrengthConfig::default())
        }
    }
}
