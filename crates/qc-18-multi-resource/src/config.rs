//! Service configuration from environment variables.

use crate::errors::ConfigError;
use std::env;

/// Largest accepted pending cap.
pub const MAX_PENDING_CAP: usize = 1024;

/// Default pending cap per token.
pub const DEFAULT_MAX_PENDING: usize = 128;

/// Default display name of the home catalog.
pub const DEFAULT_RESOURCE_NAME: &str = "TestResource";

/// Configuration for the Multi-Resource service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiResourceConfig {
    /// Display name of the home catalog
    pub resource_name: String,

    /// Pending resources a token may hold at once (1..=1024)
    pub max_pending_per_token: usize,

    /// Whether the service keeps an in-memory event log
    pub record_events: bool,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for MultiResourceConfig {
    fn default() -> Self {
        Self {
            resource_name: DEFAULT_RESOURCE_NAME.to_string(),
            max_pending_per_token: DEFAULT_MAX_PENDING,
            record_events: true,
            log_level: "info".to_string(),
        }
    }
}

impl MultiResourceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_MR_RESOURCE_NAME`: Home catalog name (default: TestResource)
    /// - `QC_MR_MAX_PENDING`: Pending cap per token (default: 128)
    /// - `QC_MR_RECORD_EVENTS`: Keep an in-memory event log (default: true)
    /// - `QC_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    ///
    /// # Errors
    ///
    /// `ConfigError` if a variable is malformed or out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// `ConfigError` if a value is malformed or out of range.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_pending_per_token = match lookup("QC_MR_MAX_PENDING") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "QC_MR_MAX_PENDING",
                    value: raw.clone(),
                })?,
            None => defaults.max_pending_per_token,
        };

        let record_events = match lookup("QC_MR_RECORD_EVENTS") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                key: "QC_MR_RECORD_EVENTS",
                value: raw.clone(),
            })?,
            None => defaults.record_events,
        };

        let config = Self {
            resource_name: lookup("QC_MR_RESOURCE_NAME").unwrap_or(defaults.resource_name),
            max_pending_per_token,
            record_events,
            log_level: lookup("QC_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// - `EmptyResourceName` if the name is blank
    /// - `PendingCapOutOfRange` if the cap is 0 or above [`MAX_PENDING_CAP`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resource_name.trim().is_empty() {
            return Err(ConfigError::EmptyResourceName);
        }
        if !(1..=MAX_PENDING_CAP).contains(&self.max_pending_per_token) {
            return Err(ConfigError::PendingCapOutOfRange {
                value: self.max_pending_per_token,
                max: MAX_PENDING_CAP,
            });
        }
        Ok(())
    }

    /// Same configuration with another home catalog name.
    #[must_use]
    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = name.into();
        self
    }

    /// Same configuration with another pending cap.
    #[must_use]
    pub fn with_max_pending(mut self, max: usize) -> Self {
        self.max_pending_per_token = max;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
