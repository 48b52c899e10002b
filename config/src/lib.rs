//! Configuration loading for hexaprofile.
//!
//! The raw TOML structs here mirror the file one-to-one, with every field
//! optional. [`HexaConfig::settings`] resolves them into the validated
//! [`EngineSettings`] at the parse boundary; nothing downstream sees an
//! unvalidated value.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use hexaprofile_types::{AnswerScale, EngineSettings, SettingsError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HexaConfig {
    pub classification: Option<ClassificationConfig>,
    pub answers: Option<AnswersConfig>,
    pub reference: Option<ReferenceConfig>,
}

/// ```toml
/// [classification]
/// polarity_cutoff = 50.0
/// changing_line_threshold = 20.0
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassificationConfig {
    pub polarity_cutoff: Option<f64>,
    pub changing_line_threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswersConfig {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

/// Alternate reference dataset. `${VAR}` references in `path` are expanded.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    pub path: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid setting: {0}")]
    Settings(#[from] SettingsError),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Settings(_) => None,
        }
    }
}

impl HexaConfig {
    /// Load `~/.hexaprofile/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load from an explicit path. A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::parse(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Resolve into validated settings, filling gaps with defaults.
    pub fn settings(&self) -> Result<EngineSettings, ConfigError> {
        let defaults = EngineSettings::default();

        let scale = match &self.answers {
            Some(answers) => {
                let default_scale = defaults.answer_scale();
                AnswerScale::new(
                    answers.min.unwrap_or(default_scale.min()),
                    answers.max.unwrap_or(default_scale.max()),
                )?
            }
            None => defaults.answer_scale(),
        };

        let classification = self.classification.as_ref();
        let cutoff = classification
            .and_then(|c| c.polarity_cutoff)
            .unwrap_or(defaults.polarity_cutoff());
        let threshold = classification
            .and_then(|c| c.changing_line_threshold)
            .unwrap_or(defaults.changing_line_threshold());

        Ok(EngineSettings::new(scale, cutoff, threshold)?)
    }

    /// Reference dataset override with `${VAR}` references expanded.
    #[must_use]
    pub fn reference_path(&self) -> Option<PathBuf> {
        self.reference
            .as_ref()
            .and_then(|reference| reference.path.as_deref())
            .map(expand_env_vars)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".hexaprofile").join("config.toml"))
}

/// Replace `${VAR}` with the value of `VAR`; unset variables become empty.
/// An unclosed `${` is kept literally.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
