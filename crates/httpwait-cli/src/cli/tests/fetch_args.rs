//! Tests for read and create subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand, FetchArgs};
use clap::Parser;
use httpwait_core::backoff::BackoffSettings;

#[test]
fn cli_parse_read_minimal() {
    match parse(&["httpwait", "read", "https://example.com/health"]) {
        CliCommand::Read(args) => {
            assert_eq!(args.url, "https://example.com/health");
            assert!(args.headers.is_empty());
            assert!(args.request_headers().is_none());
            assert_eq!(args.backoff(), BackoffSettings::default());
        }
        _ => panic!("expected Read"),
    }
}

#[test]
fn cli_parse_read_headers() {
    match parse(&[
        "httpwait",
        "read",
        "https://example.com/restricted",
        "-H",
        "Authorization=Zm9vOmJhcg==",
        "--header",
        "Accept=application/json",
    ]) {
        CliCommand::Read(args) => {
            let headers = args.request_headers().unwrap();
            assert_eq!(headers["Authorization"], "Zm9vOmJhcg==");
            assert_eq!(headers["Accept"], "application/json");
        }
        _ => panic!("expected Read with headers"),
    }
}

#[test]
fn cli_parse_header_without_equals_is_rejected() {
    assert!(Cli::try_parse_from([
        "httpwait",
        "read",
        "https://example.com/",
        "-H",
        "Authorization",
    ])
    .is_err());
}

#[test]
fn cli_parse_read_backoff_flags() {
    match parse(&[
        "httpwait",
        "read",
        "http://localhost:8080/",
        "--initial-interval",
        "250",
        "--max-elapsed-time",
        "30",
        "--max-interval",
        "2000",
        "--randomization-factor",
        "0.1",
        "--multiplier",
        "2",
    ]) {
        CliCommand::Read(args) => {
            let b = args.backoff();
            assert_eq!(b.initial_interval, Some(250));
            assert_eq!(b.max_elapsed_time, Some(30));
            assert_eq!(b.max_interval, Some(2000));
            assert_eq!(b.randomization_factor.as_deref(), Some("0.1"));
            assert_eq!(b.multiplier.as_deref(), Some("2"));
            assert_eq!(b.no_retry, None);
            b.resolve().unwrap();
        }
        _ => panic!("expected Read with backoff flags"),
    }
}

#[test]
fn cli_parse_create_no_retry() {
    match parse(&["httpwait", "create", "http://localhost/", "--no-retry"]) {
        CliCommand::Create(args) => {
            assert_eq!(
                args,
                FetchArgs {
                    url: "http://localhost/".into(),
                    no_retry: true,
                    ..Default::default()
                }
            );
            assert!(args.backoff().resolve().unwrap().max_elapsed_time().is_zero());
        }
        _ => panic!("expected Create"),
    }
}

#[test]
fn cli_parse_retry_overrides_config_no_retry() {
    match parse(&["httpwait", "read", "http://localhost/", "--retry"]) {
        CliCommand::Read(args) => {
            let file = BackoffSettings {
                no_retry: Some(true),
                ..Default::default()
            };
            let merged = file.merged_with(&args.backoff());
            assert_eq!(merged.no_retry, Some(false));
            assert!(!merged.resolve().unwrap().max_elapsed_time().is_zero());
        }
        _ => panic!("expected Read with --retry"),
    }
}

#[test]
fn cli_parse_retry_conflicts_with_no_retry() {
    assert!(Cli::try_parse_from(["httpwait", "read", "http://localhost/", "--retry", "--no-retry"])
        .is_err());
}

#[test]
fn cli_parse_read_requires_url() {
    assert!(Cli::try_parse_from(["httpwait", "read"]).is_err());
}
