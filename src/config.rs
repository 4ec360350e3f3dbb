//! Configuration System
//!
//! Layered configuration for case naming, the bundled runner and logging.
//! Sources, lowest to highest precedence: built-in defaults, the user-level file,
//! the project file(s), then `GIVENS__*` environment variables.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::naming::LineEnding;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

mod merge;
mod sources;

pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GivensConfig {
    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How case names are rendered
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Line terminator between name lines: crlf (default) or lf
    #[serde(default)]
    pub line_ending: LineEnding,
}

/// Behavior of the bundled sequential runner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Only run cases whose name contains this text
    #[serde(default)]
    pub filter: Option<String>,

    /// Stop at the first failing case
    #[serde(default)]
    pub fail_fast: bool,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Runner(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Runner(msg) => write!(f, "Runner: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl GivensConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(filter) = &self.runner.filter {
            if filter.trim().is_empty() {
                errors.push(ValidationError::Runner(
                    "filter cannot be blank; omit it to run every case".to_string(),
                ));
            }
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Loads [`GivensConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a project rooted at `root`
    pub fn load(root: &Path) -> Result<GivensConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::project_file::add_to_builder(builder, root)?;
        let builder = sources::environment::add_to_builder(builder);
        Self::finish(builder.build()?)
    }

    /// Load a single file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<GivensConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(config::File::from(path).required(true));
        Self::finish(builder.build()?)
    }

    fn finish(raw: config::Config) -> Result<GivensConfig, ConfigError> {
        let config: GivensConfig = raw.try_deserialize()?;
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ConfigError::Invalid(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        debug!(line_ending = ?config.naming.line_ending, "Configuration loaded");
        Ok(config)
    }
}
