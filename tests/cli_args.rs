//! Integration tests for CLI argument handling
//!
//! Tests flag parsing and startup validation from the command line.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_neotoday"))
        .args(args)
        .env_remove("APP_TIMEZONE")
        .env_remove("NEOTODAY_BIND")
        .output()
        .expect("Failed to execute neotoday")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("neotoday"), "Help should mention neotoday");
    assert!(stdout.contains("--timezone"), "Help should mention --timezone");
    assert!(stdout.contains("NASA_API_KEY"), "Help should mention the key env var");
}

#[test]
fn test_invalid_timezone_prints_error_and_exits() {
    let output = run_cli(&["--timezone", "Atlantis/Capital"]);
    assert!(!output.status.success(), "Expected invalid timezone to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid timezone"),
        "Should print error message about invalid timezone: {}",
        stderr
    );
}

#[test]
fn test_zero_cache_size_is_rejected() {
    let output = run_cli(&["--cache-max-size", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cache-max-size"), "stderr: {}", stderr);
}

#[test]
fn test_malformed_bind_address_is_rejected_by_parser() {
    let output = run_cli(&["--bind", "not-an-address"]);
    assert!(!output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use neotoday::cli::{parse_timezone_arg, Cli, LogFormat, StartupConfig};

    #[test]
    fn test_cli_timezone_flag() {
        let cli = Cli::parse_from(["neotoday", "--timezone", "Asia/Tokyo"]);
        assert_eq!(cli.timezone, "Asia/Tokyo");
    }

    #[test]
    fn test_parse_timezone_arg_invalid_returns_error() {
        assert!(parse_timezone_arg("invalid").is_err());
    }

    #[test]
    fn test_startup_config_from_explicit_flags() {
        let cli = Cli::parse_from([
            "neotoday",
            "--timezone",
            "UTC",
            "--cache-ttl-secs",
            "120",
            "--cache-max-size",
            "5",
            "--request-timeout-secs",
            "3",
            "--log-format",
            "compact",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.timezone, chrono_tz::UTC);
        assert_eq!(config.cache.ttl.as_secs(), 120);
        assert_eq!(config.cache.max_size.get(), 5);
        assert_eq!(config.request_timeout.as_secs(), 3);
        assert_eq!(config.log_format, LogFormat::Compact);
    }
}
