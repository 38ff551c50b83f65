//! Per-sequence backoff state: the current interval and the elapsed clock.

use super::config::BackoffConfig;
use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

/// What the engine says to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextInterval {
    /// Wait this long, then try again.
    Wait(Duration),
    /// The elapsed-time budget is spent; give up.
    Stop,
}

/// Mutable state for one retry sequence. Never shared between sequences.
///
/// Uses `tokio::time::Instant` so paused-clock tests drive it deterministically.
#[derive(Debug)]
pub struct BackoffState {
    config: BackoffConfig,
    current_interval: Duration,
    start_time: Option<Instant>,
    attempts: u32,
}

impl BackoffState {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            current_interval: initial(&config),
            config,
            start_time: None,
            attempts: 0,
        }
    }

    /// Restart the elapsed clock now and go back to the initial interval.
    pub fn reset(&mut self) {
        self.start_time = Some(Instant::now());
        self.current_interval = initial(&self.config);
        self.attempts = 0;
    }

    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }

    /// Un-jittered interval the next call will be based on.
    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }

    /// Time since the clock started (zero before first use).
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn record_attempt(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Next wait using the thread-local RNG.
    pub fn next_interval(&mut self) -> NextInterval {
        self.next_interval_with(&mut rand::thread_rng())
    }

    /// Next wait drawn from `rng`.
    ///
    /// Returns `Stop` once elapsed time reaches `max_elapsed_time`. Otherwise
    /// returns a value uniformly drawn from `current ± current * randomization_factor`
    /// and then grows the current interval by `multiplier`, capped at `max_interval`.
    pub fn next_interval_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> NextInterval {
        let start = *self.start_time.get_or_insert_with(Instant::now);
        if start.elapsed() >= self.config.max_elapsed_time() {
            return NextInterval::Stop;
        }

        let wait = randomize(
            self.current_interval,
            self.config.randomization_factor(),
            rng,
        );
        self.advance();
        NextInterval::Wait(wait)
    }

    fn advance(&mut self) {
        let max = self.config.max_interval();
        let multiplier = self.config.multiplier();
        // Compare before multiplying so a huge interval cannot overflow.
        if self.current_interval.as_secs_f64() >= max.as_secs_f64() / multiplier {
            self.current_interval = max;
        } else {
            self.current_interval = self.current_interval.mul_f64(multiplier).min(max);
        }
    }
}

fn initial(config: &BackoffConfig) -> Duration {
    config.initial_interval().min(config.max_interval())
}

fn randomize<R: Rng + ?Sized>(current: Duration, factor: f64, rng: &mut R) -> Duration {
    if factor == 0.0 {
        return current;
    }
    let secs = current.as_secs_f64();
    let delta = secs * factor;
    let low = (secs - delta).max(0.0);
    let high = secs + delta;
    Duration::from_secs_f64(rng.gen_range(low..=high))
}
