//! Library half of the `cfm` binary: configuration loading and the
//! decode/re-encode pipeline for each document kind.

use anyhow::{Context, Result};
use clap::ValueEnum;
use contentful_model::{
    ContentType, DecodeLimits, EditorInterface, Policy, Role, constraint, validation,
};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Document kinds `cfm normalize` understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Role,
    Policy,
    Constraint,
    ContentType,
    Validation,
    EditorInterface,
}

/// Settings read from the `--config` TOML file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub decode: DecodeLimits,
}

impl Config {
    /// Loads configuration from `path`. Falls back to defaults when the file
    /// is missing or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse config file {:?}: {}. Falling back to defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn resolve(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                debug!("No --config given, using defaults");
                Self::default()
            }
        }
    }
}

/// Decodes `input` as a document of `kind` and returns its canonical compact
/// encoding.
pub fn normalize(kind: Kind, input: &str, limits: DecodeLimits) -> Result<String> {
    let value: Value = serde_json::from_str(input).context("Input is not valid JSON")?;
    let canonical = match kind {
        Kind::Role => serde_json::to_value(Role::decode_with(&value, limits)?)?,
        Kind::Policy => serde_json::to_value(Policy::decode_with(&value, limits)?)?,
        Kind::Constraint => constraint::encode(&constraint::decode_with(&value, limits)?),
        Kind::ContentType => serde_json::to_value(
            serde_json::from_value::<ContentType>(value).context("Failed to decode content type")?,
        )?,
        Kind::Validation => validation::encode(&validation::decode(&value)?),
        Kind::EditorInterface => serde_json::to_value(
            serde_json::from_value::<EditorInterface>(value)
                .context("Failed to decode editor interface")?,
        )?,
    };
    debug!("Normalized {:?} document", kind);
    Ok(serde_json::to_string(&canonical)?)
}

/// Reads the whole document from `path`, or from stdin when `path` is `None`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
