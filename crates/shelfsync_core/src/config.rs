//! Cache behavior configuration.
//!
//! # Responsibility
//! - Hold the policies the containers consult on load and mutation.
//! - Decode host-provided JSON settings with per-field defaults.
//!
//! # Invariants
//! - A `CacheConfig` returned by `from_json_str` or `validate` is usable
//!   as-is (`event_capacity >= 1`, non-empty placeholder URL).

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Cover shown for records without an uploaded image.
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/200x300.png?text=No+Cover";
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// What a borrow/return does when a counter would drop below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterPolicy {
    /// Leave both counters untouched and log a warning.
    #[default]
    Clamp,
    /// Apply the change anyway and log a warning.
    AllowNegative,
}

/// What a bulk load does with a counter that is not an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedCounterPolicy {
    /// Store `0` and log a warning.
    #[default]
    Zero,
    /// Fail the whole load; the previous state stays installed.
    Reject,
}

/// Configuration error for cache settings.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid cache config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid cache config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Policies shared by `BookCatalog` and `NotificationInbox`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub counter_policy: CounterPolicy,
    pub malformed_counter_policy: MalformedCounterPolicy,
    pub placeholder_image_url: String,
    /// Orders inbox views `Delivered` before `Seen` when enabled.
    pub sort_by_delivery_status: bool,
    /// Capacity of the inbox event broadcast channel.
    pub event_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            counter_policy: CounterPolicy::default(),
            malformed_counter_policy: MalformedCounterPolicy::default(),
            placeholder_image_url: DEFAULT_PLACEHOLDER_IMAGE_URL.to_string(),
            sort_by_delivery_status: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Decodes settings from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed JSON or unknown enum values.
    /// - `ConfigError::Invalid` when a decoded value fails validation.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()
    }

    /// Checks field constraints and returns the config unchanged on success.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_capacity must be at least 1".to_string(),
            ));
        }
        if self.placeholder_image_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "placeholder_image_url cannot be empty".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheConfig, ConfigError, CounterPolicy, MalformedCounterPolicy};

    #[test]
    fn empty_object_yields_defaults() {
        let config = CacheConfig::from_json_str("{}").expect("empty config should decode");
        assert_eq!(config, CacheConfig::default());
        assert_eq!(config.counter_policy, CounterPolicy::Clamp);
        assert_eq!(config.malformed_counter_policy, MalformedCounterPolicy::Zero);
    }

    #[test]
    fn snake_case_policies_decode() {
        let config = CacheConfig::from_json_str(
            r#"{"counter_policy":"allow_negative","malformed_counter_policy":"reject","sort_by_delivery_status":true}"#,
        )
        .expect("config should decode");
        assert_eq!(config.counter_policy, CounterPolicy::AllowNegative);
        assert_eq!(config.malformed_counter_policy, MalformedCounterPolicy::Reject);
        assert!(config.sort_by_delivery_status);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = CacheConfig::from_json_str(r#"{"event_capacity":0}"#)
            .expect_err("zero capacity must fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_policy_is_a_parse_error() {
        let err = CacheConfig::from_json_str(r#"{"counter_policy":"wrap"}"#)
            .expect_err("unknown policy must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
