//! Validated, immutable backoff parameters.

use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_RANDOMIZATION_FACTOR: f64 = 0.5;
pub const DEFAULT_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_ELAPSED_TIME: Duration = Duration::from_secs(15 * 60);

/// Exponential backoff parameters.
///
/// Construct with [`BackoffConfig::builder`] (validated) or take the
/// [`Default`], which uses the conventional exponential-backoff values:
/// 500ms initial interval, 0.5 randomization, 1.5 multiplier, 60s max
/// interval and a 15 minute elapsed-time budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffConfig {
    initial_interval: Duration,
    max_interval: Duration,
    max_elapsed_time: Duration,
    multiplier: f64,
    randomization_factor: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_elapsed_time: DEFAULT_MAX_ELAPSED_TIME,
            multiplier: DEFAULT_MULTIPLIER,
            randomization_factor: DEFAULT_RANDOMIZATION_FACTOR,
        }
    }
}

impl BackoffConfig {
    pub fn builder() -> BackoffConfigBuilder {
        BackoffConfigBuilder::default()
    }

    pub fn initial_interval(&self) -> Duration {
        self.initial_interval
    }

    pub fn max_interval(&self) -> Duration {
        self.max_interval
    }

    /// Total wall-clock budget for one retry sequence. Zero means a failed
    /// first attempt is never retried.
    pub fn max_elapsed_time(&self) -> Duration {
        self.max_elapsed_time
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn randomization_factor(&self) -> f64 {
        self.randomization_factor
    }
}

/// Builder for [`BackoffConfig`]. Unset fields take the defaults.
#[derive(Debug, Clone, Default)]
pub struct BackoffConfigBuilder {
    initial_interval: Option<Duration>,
    max_interval: Option<Duration>,
    max_elapsed_time: Option<Duration>,
    multiplier: Option<f64>,
    randomization_factor: Option<f64>,
}

impl BackoffConfigBuilder {
    pub fn initial_interval(mut self, d: Duration) -> Self {
        self.initial_interval = Some(d);
        self
    }

    pub fn max_interval(mut self, d: Duration) -> Self {
        self.max_interval = Some(d);
        self
    }

    /// Set the elapsed-time budget. Unlike the declarative settings, an
    /// explicit zero here is honored as "no retry budget".
    pub fn max_elapsed_time(mut self, d: Duration) -> Self {
        self.max_elapsed_time = Some(d);
        self
    }

    pub fn multiplier(mut self, m: f64) -> Self {
        self.multiplier = Some(m);
        self
    }

    pub fn randomization_factor(mut self, r: f64) -> Self {
        self.randomization_factor = Some(r);
        self
    }

    pub fn build(self) -> Result<BackoffConfig, ConfigError> {
        let initial_interval = self.initial_interval.unwrap_or(DEFAULT_INITIAL_INTERVAL);
        let max_interval = self.max_interval.unwrap_or(DEFAULT_MAX_INTERVAL);
        let max_elapsed_time = self.max_elapsed_time.unwrap_or(DEFAULT_MAX_ELAPSED_TIME);
        let multiplier = self.multiplier.unwrap_or(DEFAULT_MULTIPLIER);
        let randomization_factor = self
            .randomization_factor
            .unwrap_or(DEFAULT_RANDOMIZATION_FACTOR);

        if initial_interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval {
                field: "initial_interval",
            });
        }
        if max_interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval {
                field: "max_interval",
            });
        }
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ConfigError::Multiplier(multiplier));
        }
        if !(0.0..1.0).contains(&randomization_factor) {
            return Err(ConfigError::RandomizationFactor(randomization_factor));
        }

        Ok(BackoffConfig {
            initial_interval,
            max_interval,
            max_elapsed_time,
            multiplier,
            randomization_factor,
        })
    }
}
