//! Backoff policy engine.
//!
//! Computes the wait before each retry: a capped exponential curve with
//! multiplicative jitter, bounded by a total elapsed-time budget. Knows
//! nothing about networking; the retry executor drives it.

mod config;
mod settings;
mod state;

pub use config::{
    BackoffConfig, BackoffConfigBuilder, DEFAULT_INITIAL_INTERVAL, DEFAULT_MAX_ELAPSED_TIME,
    DEFAULT_MAX_INTERVAL, DEFAULT_MULTIPLIER, DEFAULT_RANDOMIZATION_FACTOR,
};
pub use settings::BackoffSettings;
pub use state::{BackoffState, NextInterval};
