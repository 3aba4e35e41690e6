//! Command-line and environment configuration for neotoday
//!
//! This module handles parsing of startup options using clap. Every option can
//! also be set through an environment variable, and is validated into a
//! [`StartupConfig`] before the server starts.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::cache::CacheSettings;
use crate::data::neows::{DEFAULT_REQUEST_TIMEOUT, NEOWS_BASE_URL};

/// Error types for configuration parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The time zone is not a known IANA identifier
    #[error("Invalid timezone: '{0}'. Expected an IANA zone id such as America/Toronto")]
    InvalidTimezone(String),

    /// A numeric option that must be positive was zero
    #[error("Invalid value for --{0}: must be greater than zero")]
    MustBePositive(&'static str),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}

/// neotoday - Today's near-Earth objects from NASA NeoWs
#[derive(Parser, Debug)]
#[command(name = "neotoday")]
#[command(about = "Serve today's near-Earth objects, normalized and cached")]
#[command(version)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "NEOTODAY_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// NeoWs API root
    #[arg(long, env = "NASA_NEO_BASE_URL", default_value = NEOWS_BASE_URL)]
    pub base_url: String,

    /// NeoWs API key; requests fail with a configuration error when unset
    #[arg(long, env = "NASA_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// IANA time zone used to decide what "today" is
    #[arg(long, env = "APP_TIMEZONE", default_value = "America/Toronto")]
    pub timezone: String,

    /// Seconds a fetched day stays cached
    #[arg(long, env = "NEOTODAY_CACHE_TTL_SECS", default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached days
    #[arg(long, env = "NEOTODAY_CACHE_MAX_SIZE", default_value_t = 10)]
    pub cache_max_size: usize,

    /// Upstream request timeout in seconds
    #[arg(long, env = "NEOTODAY_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub request_timeout_secs: u64,

    /// Log output format
    #[arg(long, env = "NEOTODAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Validated configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub bind: SocketAddr,
    pub base_url: String,
    pub api_key: String,
    pub timezone: Tz,
    pub cache: CacheSettings,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

/// Parses an IANA time zone identifier.
///
/// # Returns
/// * `Ok(Tz)` if the zone is known
/// * `Err(CliError::InvalidTimezone)` otherwise
pub fn parse_timezone_arg(s: &str) -> Result<Tz, CliError> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| CliError::InvalidTimezone(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// The API key is trimmed but may be empty; that is reported per request.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let timezone = parse_timezone_arg(&cli.timezone)?;
        let max_size =
            NonZeroUsize::new(cli.cache_max_size).ok_or(CliError::MustBePositive("cache-max-size"))?;
        if cli.request_timeout_secs == 0 {
            return Err(CliError::MustBePositive("request-timeout-secs"));
        }

        Ok(StartupConfig {
            bind: cli.bind,
            base_url: cli.base_url.trim().to_string(),
            api_key: cli.api_key.trim().to_string(),
            timezone,
            cache: CacheSettings {
                ttl: Duration::from_secs(cli.cache_ttl_secs),
                max_size,
            },
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            log_format: cli.log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timezone_arg() {
        assert_eq!(parse_timezone_arg("America/Toronto").unwrap(), chrono_tz::America::Toronto);
        assert_eq!(parse_timezone_arg(" UTC ").unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn test_parse_timezone_arg_invalid() {
        let err = parse_timezone_arg("Mars/Olympus").unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"));
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn test_cli_parse_flags() {
        let cli = Cli::parse_from([
            "neotoday",
            "--bind",
            "0.0.0.0:9000",
            "--timezone",
            "Europe/Paris",
            "--cache-ttl-secs",
            "60",
            "--cache-max-size",
            "3",
            "--log-format",
            "json",
            "--api-key",
            " demo-key ",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();

        assert_eq!(config.bind, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.timezone, chrono_tz::Europe::Paris);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.cache.max_size.get(), 3);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.api_key, "demo-key");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_startup_config_rejects_zero_cache_size() {
        let cli = Cli::parse_from(["neotoday", "--cache-max-size", "0", "--timezone", "UTC"]);
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("cache-max-size"));
    }

    #[test]
    fn test_startup_config_rejects_zero_timeout() {
        let cli = Cli::parse_from(["neotoday", "--request-timeout-secs", "0", "--timezone", "UTC"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::MustBePositive("request-timeout-secs"))
        ));
    }

    #[test]
    fn test_startup_config_rejects_unknown_zone() {
        let cli = Cli::parse_from(["neotoday", "--timezone", "Nowhere/Special"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidTimezone(_))
        ));
    }
}
