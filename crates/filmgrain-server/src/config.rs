//! Service configuration, loaded from JSON.
//!
//! Every section is optional; missing fields fall back to the defaults of
//! the filmgrain look and the fetch limits below.
//!
//! ```json
//! {
//!   "pipeline": { "grain": 22, "blur_radius": 2 },
//!   "fetch": { "timeout_secs": 10 },
//!   "compression": "Fast"
//! }
//! ```

use std::fs;
use std::path::Path;

use filmgrain_core::encode::PngCompression;
use filmgrain_core::PipelineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub pipeline: PipelineConfig,
    pub fetch: FetchConfig,
    pub compression: PngCompression,
}

impl ServerConfig {
    /// Check every section, including the pipeline parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.fetch.validate()
    }
}

/// Limits applied to remote image retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total request deadline in seconds.
    pub timeout_secs: u64,
    /// Largest accepted response body.
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_bytes: 32 * 1024 * 1024,
            user_agent: concat!("filmgrain/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// Reject limits that would make every fetch fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid(
                "fetch.max_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_config(&data).map_err(|e| match e {
        ConfigError::Parse { message, .. } => ConfigError::Parse {
            path: path.display().to_string(),
            message,
        },
        other => other,
    })
}

/// Parse and validate configuration from a JSON string.
pub fn parse_config(data: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = serde_json::from_str(data).map_err(|e| ConfigError::Parse {
        path: "<inline>".to_string(),
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.pipeline.grain, 22.0);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.compression, PngCompression::Default);
    }

    #[test]
    fn test_partial_pipeline_section() {
        let config = parse_config(r#"{ "pipeline": { "blur_radius": 4, "grain": 0 } }"#).unwrap();
        assert_eq!(config.pipeline.blur_radius, 4);
        assert_eq!(config.pipeline.grain, 0.0);
        // Untouched fields keep their defaults
        assert_eq!(config.pipeline.yellowness, 1.15);
        assert_eq!(config.pipeline.blue_step, 64);
    }

    #[test]
    fn test_fetch_and_compression() {
        let config = parse_config(
            r#"{ "fetch": { "timeout_secs": 5, "max_bytes": 1024 }, "compression": "Best" }"#,
        )
        .unwrap();
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.max_bytes, 1024);
        assert!(config.fetch.user_agent.starts_with("filmgrain/"));
        assert_eq!(config.compression, PngCompression::Best);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_config("{ pipeline: "),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            parse_config(r#"{ "pipeline": { "blur_radius": -1 } }"#),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_zero_fetch_limits_rejected() {
        match parse_config(r#"{ "fetch": { "timeout_secs": 0 } }"#) {
            Err(ConfigError::Invalid(message)) => assert!(message.contains("timeout_secs")),
            other => panic!("Expected Invalid error, got {:?}", other),
        }
        assert!(matches!(
            parse_config(r#"{ "fetch": { "max_bytes": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_out_of_range_pipeline_rejected() {
        assert!(matches!(
            parse_config(r#"{ "pipeline": { "green_step": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let path = std::env::temp_dir().join("filmgrain-does-not-exist.json");
        match load_config(&path) {
            Err(ConfigError::Io { path: p, .. }) => assert!(p.contains("filmgrain-does-not-exist")),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("filmgrain-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "pipeline": { "redness": 1.3 } }"#).unwrap();

        let config = load_config(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.pipeline.redness, 1.3);
    }
}
