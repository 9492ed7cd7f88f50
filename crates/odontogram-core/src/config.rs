//! Chart configuration.
//!
//! Resolved once by the host application and handed to the workflow; the
//! engine never reads the environment or the filesystem on its own.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for session naming and account statements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChartConfig {
    /// New sessions are named "{prefix} {n}"
    pub session_name_prefix: String,
    /// Printed before amounts on statements
    pub currency_symbol: String,
    /// Clinic name for statement headers
    pub clinic_name: String,
    /// Clinic address for statement headers
    pub clinic_address: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            session_name_prefix: "Session".into(),
            currency_symbol: "S/".into(),
            clinic_name: "Dental Clinic".into(),
            clinic_address: None,
        }
    }
}

impl ChartConfig {
    /// Parse from TOML. Missing keys fall back to defaults.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: ChartConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.session_name_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "session_name_prefix",
                reason: "cannot be empty".into(),
            });
        }
        Ok(())
    }

    /// Name for the `n`-th session (1-based).
    pub fn session_name(&self, n: usize) -> String {
        format!("{} {}", self.session_name_prefix, n)
    }

    /// Format minor units as "S/ 123.45".
    pub fn format_amount(&self, minor_units: i64) -> String {
        let sign = if minor_units < 0 { "-" } else { "" };
        let abs = minor_units.unsigned_abs();
        format!("{}{} {}.{:02}", sign, self.currency_symbol, abs / 100, abs % 100)
    }
}
