//! Declarative backoff fields as they arrive from configuration: integer
//! milliseconds/seconds and decimal strings, all optional.

use super::config::{
    BackoffConfig, DEFAULT_INITIAL_INTERVAL, DEFAULT_MAX_ELAPSED_TIME, DEFAULT_MAX_INTERVAL,
    DEFAULT_MULTIPLIER, DEFAULT_RANDOMIZATION_FACTOR,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unresolved backoff tuning, e.g. from a data source block or `config.toml`.
///
/// Absent values, zero integers and empty strings all mean "use the default".
/// A zero elapsed budget therefore cannot be expressed through
/// `max_elapsed_time`; set `no_retry` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffSettings {
    /// Initial interval in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_interval: Option<i64>,
    /// Elapsed-time budget in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_elapsed_time: Option<i64>,
    /// Interval cap in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomization_factor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<String>,
    /// Give up after the first failed attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_retry: Option<bool>,
}

impl BackoffSettings {
    /// Field-by-field overlay: values set in `overrides` win. Zero integers
    /// and empty strings in `overrides` count as unset, so they never mask a
    /// value from `self`.
    pub fn merged_with(&self, overrides: &BackoffSettings) -> BackoffSettings {
        BackoffSettings {
            initial_interval: set_int(overrides.initial_interval).or(self.initial_interval),
            max_elapsed_time: set_int(overrides.max_elapsed_time).or(self.max_elapsed_time),
            max_interval: set_int(overrides.max_interval).or(self.max_interval),
            randomization_factor: set_str(&overrides.randomization_factor)
                .or_else(|| self.randomization_factor.clone()),
            multiplier: set_str(&overrides.multiplier).or_else(|| self.multiplier.clone()),
            no_retry: overrides.no_retry.or(self.no_retry),
        }
    }

    /// Parse and validate into a [`BackoffConfig`]. Runs before any network
    /// attempt so malformed values fail fast.
    pub fn resolve(&self) -> Result<BackoffConfig, ConfigError> {
        let initial_interval = duration_or_default(
            "initial_interval",
            self.initial_interval,
            Duration::from_millis,
            DEFAULT_INITIAL_INTERVAL,
        )?;
        let max_interval = duration_or_default(
            "max_interval",
            self.max_interval,
            Duration::from_millis,
            DEFAULT_MAX_INTERVAL,
        )?;
        let max_elapsed_time = if self.no_retry.unwrap_or(false) {
            Duration::ZERO
        } else {
            duration_or_default(
                "max_elapsed_time",
                self.max_elapsed_time,
                Duration::from_secs,
                DEFAULT_MAX_ELAPSED_TIME,
            )?
        };
        let randomization_factor = float_or_default(
            "randomization_factor",
            self.randomization_factor.as_deref(),
            DEFAULT_RANDOMIZATION_FACTOR,
        )?;
        let multiplier =
            float_or_default("multiplier", self.multiplier.as_deref(), DEFAULT_MULTIPLIER)?;

        BackoffConfig::builder()
            .initial_interval(initial_interval)
            .max_interval(max_interval)
            .max_elapsed_time(max_elapsed_time)
            .randomization_factor(randomization_factor)
            .multiplier(multiplier)
            .build()
    }
}

fn set_int(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

fn set_str(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn duration_or_default(
    field: &'static str,
    value: Option<i64>,
    unit: fn(u64) -> Duration,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        None | Some(0) => Ok(default),
        Some(v) if v < 0 => Err(ConfigError::Negative { field, value: v }),
        Some(v) => Ok(unit(v as u64)),
    }
}

fn float_or_default(
    field: &'static str,
    value: Option<&str>,
    default: f64,
) -> Result<f64, ConfigError> {
    match value {
        None | Some("") => Ok(default),
        Some(s) => s.parse::<f64>().map_err(|e| ConfigError::InvalidNumber {
            field,
            value: s.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_resolve_to_defaults() {
        let cfg = BackoffSettings::default().resolve().unwrap();
        assert_eq!(cfg, BackoffConfig::default());
    }

    #[test]
    fn zero_and_empty_values_mean_default() {
        let s = BackoffSettings {
            initial_interval: Some(0),
            max_elapsed_time: Some(0),
            max_interval: Some(0),
            randomization_factor: Some(String::new()),
            multiplier: Some(String::new()),
            no_retry: None,
        };
        assert_eq!(s.resolve().unwrap(), BackoffConfig::default());
    }

    #[test]
    fn units_are_ms_s_ms() {
        let s = BackoffSettings {
            initial_interval: Some(10),
            max_elapsed_time: Some(2),
            max_interval: Some(40),
            randomization_factor: Some("0".into()),
            multiplier: Some("2".into()),
            no_retry: None,
        };
        let cfg = s.resolve().unwrap();
        assert_eq!(cfg.initial_interval(), Duration::from_millis(10));
        assert_eq!(cfg.max_elapsed_time(), Duration::from_secs(2));
        assert_eq!(cfg.max_interval(), Duration::from_millis(40));
        assert_eq!(cfg.randomization_factor(), 0.0);
        assert_eq!(cfg.multiplier(), 2.0);
    }

    #[test]
    fn malformed_decimal_names_the_field() {
        let s = BackoffSettings {
            multiplier: Some("one point five".into()),
            ..Default::default()
        };
        match s.resolve() {
            Err(ConfigError::InvalidNumber { field, value, .. }) => {
                assert_eq!(field, "multiplier");
                assert_eq!(value, "one point five");
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn negative_integers_rejected() {
        let s = BackoffSettings {
            max_interval: Some(-5),
            ..Default::default()
        };
        assert_eq!(
            s.resolve().unwrap_err(),
            ConfigError::Negative {
                field: "max_interval",
                value: -5
            }
        );
    }

    #[test]
    fn parsed_values_still_validated() {
        let s = BackoffSettings {
            randomization_factor: Some("1.5".into()),
            ..Default::default()
        };
        assert_eq!(s.resolve().unwrap_err(), ConfigError::RandomizationFactor(1.5));
    }

    #[test]
    fn no_retry_means_zero_budget() {
        let s = BackoffSettings {
            max_elapsed_time: Some(30),
            no_retry: Some(true),
            ..Default::default()
        };
        assert!(s.resolve().unwrap().max_elapsed_time().is_zero());
    }

    #[test]
    fn overrides_win_field_by_field() {
        let base = BackoffSettings {
            initial_interval: Some(100),
            multiplier: Some("2".into()),
            ..Default::default()
        };
        let overrides = BackoffSettings {
            initial_interval: Some(250),
            max_elapsed_time: Some(5),
            ..Default::default()
        };
        let merged = base.merged_with(&overrides);
        assert_eq!(merged.initial_interval, Some(250));
        assert_eq!(merged.max_elapsed_time, Some(5));
        assert_eq!(merged.multiplier.as_deref(), Some("2"));
        assert_eq!(merged.no_retry, None);
    }

    #[test]
    fn zero_and_empty_overrides_keep_base_values() {
        let base = BackoffSettings {
            max_elapsed_time: Some(60),
            multiplier: Some("2".into()),
            ..Default::default()
        };
        let overrides = BackoffSettings {
            max_elapsed_time: Some(0),
            multiplier: Some(String::new()),
            ..Default::default()
        };
        let cfg = base.merged_with(&overrides).resolve().unwrap();
        assert_eq!(cfg.max_elapsed_time(), Duration::from_secs(60));
        assert_eq!(cfg.multiplier(), 2.0);
    }

    #[test]
    fn no_retry_override_wins_both_ways() {
        let base = BackoffSettings {
            no_retry: Some(true),
            ..Default::default()
        };
        let off = BackoffSettings {
            no_retry: Some(false),
            ..Default::default()
        };
        let merged = base.merged_with(&off);
        assert_eq!(merged.no_retry, Some(false));
        assert!(!merged.resolve().unwrap().max_elapsed_time().is_zero());

        let unset = base.merged_with(&BackoffSettings::default());
        assert!(unset.resolve().unwrap().max_elapsed_time().is_zero());

        let on = BackoffSettings::default().merged_with(&base);
        assert_eq!(on.no_retry, Some(true));
    }

    #[test]
    fn toml_section_roundtrip() {
        let s = BackoffSettings {
            initial_interval: Some(750),
            randomization_factor: Some("0.25".into()),
            ..Default::default()
        };
        let text = toml::to_string(&s).unwrap();
        assert!(!text.contains("no_retry"));
        let parsed: BackoffSettings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, s);
    }
}
