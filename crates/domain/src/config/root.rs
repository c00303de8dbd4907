use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use super::trust_anchors::TrustAnchorConfig;

const LOCAL_CONFIG_PATH: &str = "ferrous-dnsq.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-dnsq/config.toml";

/// Main configuration structure for Ferrous DNSQ
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Engine setup: resolver configuration source and timeouts
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// DNSSEC trust anchors installed into every resolution context
    #[serde(default)]
    pub trust_anchors: TrustAnchorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-dnsq.toml in current directory
    /// 3. /etc/ferrous-dnsq/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(path) = overrides.resolv_conf {
            self.resolver.resolv_conf = path;
        }
        if !overrides.trust_anchors.is_empty() {
            self.trust_anchors.anchors = overrides.trust_anchors;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.resolv_conf.trim().is_empty() {
            return Err(ConfigError::Validation(
                "resolv_conf path cannot be empty".to_string(),
            ));
        }

        if self.resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "query_timeout_ms cannot be 0".to_string(),
            ));
        }

        if self.trust_anchors.anchors.is_empty() {
            return Err(ConfigError::Validation(
                "No trust anchors configured".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub resolv_conf: Option<String>,
    pub trust_anchors: Vec<String>,
    pub log_level: Option<String>,
}
