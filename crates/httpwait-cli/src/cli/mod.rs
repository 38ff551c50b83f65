//! CLI for httpwait.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use httpwait_core::backoff::BackoffSettings;
use httpwait_core::config;
use httpwait_core::fetch::{CurlTransport, Fetcher};
use httpwait_core::shutdown::ShutdownRx;
use std::collections::BTreeMap;
use std::path::PathBuf;

use commands::{run_config, run_create, run_read, run_serve};

/// Top-level CLI for httpwait.
#[derive(Debug, Parser)]
#[command(name = "httpwait")]
#[command(about = "httpwait: HTTP GET with exponential-backoff retries", long_about = None)]
pub struct Cli {
    /// Use this config file instead of $XDG_CONFIG_HOME/httpwait/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URL and print status, headers and body as JSON.
    Read(FetchArgs),

    /// Wait until a URL answers and print its id.
    Create(FetchArgs),

    /// Serve the newline-delimited JSON plugin protocol on stdin/stdout.
    Serve,

    /// Show the config file path and effective configuration.
    Config,
}

/// URL, headers and backoff overrides shared by `read` and `create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct FetchArgs {
    /// HTTP or HTTPS URL to fetch.
    pub url: String,

    /// Request header, repeatable.
    #[arg(short = 'H', long = "header", value_name = "NAME=VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Initial wait between attempts (milliseconds).
    #[arg(long, value_name = "MS")]
    pub initial_interval: Option<i64>,

    /// Give up after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub max_elapsed_time: Option<i64>,

    /// Upper bound for a single wait (milliseconds).
    #[arg(long, value_name = "MS")]
    pub max_interval: Option<i64>,

    /// Jitter factor in [0, 1), e.g. "0.5".
    #[arg(long, value_name = "DECIMAL")]
    pub randomization_factor: Option<String>,

    /// Wait growth factor, e.g. "1.5".
    #[arg(long, value_name = "DECIMAL")]
    pub multiplier: Option<String>,

    /// Make a single attempt.
    #[arg(long)]
    pub no_retry: bool,

    /// Retry even when the config file sets `no_retry`.
    #[arg(long, conflicts_with = "no_retry")]
    pub retry: bool,
}

impl FetchArgs {
    pub fn backoff(&self) -> BackoffSettings {
        BackoffSettings {
            initial_interval: self.initial_interval,
            max_elapsed_time: self.max_elapsed_time,
            max_interval: self.max_interval,
            randomization_factor: self.randomization_factor.clone(),
            multiplier: self.multiplier.clone(),
            no_retry: match (self.no_retry, self.retry) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
        }
    }

    pub fn request_headers(&self) -> Option<BTreeMap<String, String>> {
        if self.headers.is_empty() {
            None
        } else {
            Some(self.headers.iter().cloned().collect())
        }
    }
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got {:?}", s)),
    }
}

impl CliCommand {
    pub async fn run_from_args(shutdown: ShutdownRx) -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config_file {
            Some(path) => config::load_or_init_at(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let fetcher =
            Fetcher::new(CurlTransport::new(cfg.transport.clone())).with_shutdown(shutdown.clone());

        match cli.command {
            CliCommand::Read(args) => run_read(fetcher, &cfg.backoff, &args).await?,
            CliCommand::Create(args) => run_create(fetcher, &cfg.backoff, &args).await?,
            CliCommand::Serve => run_serve(fetcher, &cfg.backoff, shutdown).await?,
            CliCommand::Config => {
                let path = match cli.config_file {
                    Some(p) => p,
                    None => config::config_path()?,
                };
                run_config(&path, &cfg)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
