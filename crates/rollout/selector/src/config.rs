//! Configuration for rollout planning

use crate::error::ConfigError;
use crate::helpers::IN_PROGRESS_ANNOTATION_KEY;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolloutConfig {
    /// Selector configuration
    #[serde(default)]
    pub selector: SelectorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Selector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Node annotation marking an instance as mid-upgrade
    #[serde(default = "default_in_progress_annotation")]
    pub in_progress_annotation: String,

    /// Maximum number of ASGs planned concurrently
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            in_progress_annotation: default_in_progress_annotation(),
            max_parallel: default_max_parallel(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_in_progress_annotation() -> String {
    IN_PROGRESS_ANNOTATION_KEY.to_string()
}

fn default_max_parallel() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl RolloutConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `ROLLOUT_`-prefixed environment variables
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&RolloutConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ROLLOUT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: RolloutConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selector.max_parallel == 0 {
            return Err(ConfigError::Invalid(
                "selector.max_parallel must be at least 1".into(),
            ));
        }
        if self.selector.in_progress_annotation.is_empty() {
            return Err(ConfigError::Invalid(
                "selector.in_progress_annotation must not be empty".into(),
            ));
        }
        Ok(())
    }
}
