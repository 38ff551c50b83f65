//! `httpwait config` – show where the config lives and what it resolves to.

use anyhow::{Context, Result};
use httpwait_core::config::HttpWaitConfig;
use std::path::Path;

pub fn run_config(path: &Path, cfg: &HttpWaitConfig) -> Result<()> {
    let backoff = cfg
        .backoff
        .resolve()
        .context("resolving [backoff] defaults")?;
    println!("Config file: {}", path.display());
    println!("{}", serde_json::to_string_pretty(cfg)?);
    println!("Effective backoff:");
    println!("  initial_interval     {:?}", backoff.initial_interval());
    println!("  max_interval         {:?}", backoff.max_interval());
    println!("  max_elapsed_time     {:?}", backoff.max_elapsed_time());
    println!("  multiplier           {}", backoff.multiplier());
    println!("  randomization_factor {}", backoff.randomization_factor());
    Ok(())
}
