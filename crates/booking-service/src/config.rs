//! Service configuration loaded from environment variables.

use std::str::FromStr;

use common::Currency;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

/// Service configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `BOOKING_CURRENCY`: ISO-4217 code for payment orders (default: `"USD"`)
/// - `BOOKING_MAX_CONFLICT_RETRIES`: retries on version conflicts (default: `3`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `BOOKING_LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub currency: Currency,
    pub max_conflict_retries: u32,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            currency: lookup("BOOKING_CURRENCY")
                .and_then(|c| Currency::new(c).ok())
                .unwrap_or(defaults.currency),
            max_conflict_retries: lookup("BOOKING_MAX_CONFLICT_RETRIES")
                .and_then(|r| r.trim().parse().ok())
                .unwrap_or(defaults.max_conflict_retries),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("BOOKING_LOG_FORMAT")
                .and_then(|f| f.parse().ok())
                .unwrap_or(defaults.log_format),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            max_conflict_retries: 3,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.currency.as_str(), "USD");
        assert_eq!(config.max_conflict_retries, 3);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_reads_variables() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("BOOKING_CURRENCY", "eur"),
            ("BOOKING_MAX_CONFLICT_RETRIES", "7"),
            ("RUST_LOG", "booking=debug"),
            ("BOOKING_LOG_FORMAT", "JSON"),
        ]));
        assert_eq!(config.currency.as_str(), "EUR");
        assert_eq!(config.max_conflict_retries, 7);
        assert_eq!(config.log_level, "booking=debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("BOOKING_CURRENCY", "dollars"),
            ("BOOKING_MAX_CONFLICT_RETRIES", "-1"),
            ("BOOKING_LOG_FORMAT", "xml"),
        ]));
        assert_eq!(config.currency.as_str(), "USD");
        assert_eq!(config.max_conflict_retries, 3);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }
}
