use std::{fmt, net::SocketAddr, path::PathBuf};

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Server settings, read from the command line or the environment.
#[derive(Debug, Clone, Parser)]
#[command(about = "Serves the waste collection calendar of Pont-sur-Yonne")]
pub struct Config {
    /// the address to listen on
    #[arg(long, env = "COLLECTE_ADDR", default_value = "0.0.0.0:8008")]
    pub addr: SocketAddr,
    /// schedule files to seed, the built-in 2026 schedule when none is given
    #[arg(long, env = "COLLECTE_SCHEDULE", value_delimiter = ',')]
    pub schedule: Vec<PathBuf>,
    /// the time zone defining "today" and week boundaries
    #[arg(long, env = "COLLECTE_TIMEZONE", default_value = "Europe/Paris")]
    pub timezone: String,
    /// the only origin allowed by CORS
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:3000")]
    pub frontend_url: String,
    /// production hides error details from responses
    #[arg(long, env = "COLLECTE_ENV", value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,
    /// the year used when a request names none, the current year otherwise
    #[arg(long, env = "COLLECTE_DEFAULT_YEAR")]
    pub default_year: Option<i32>,
    /// restrict month requests to these years
    #[arg(long = "supported-year", env = "COLLECTE_SUPPORTED_YEARS", value_delimiter = ',')]
    pub supported_years: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::try_parse_from(["collecte_server"]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8008".parse().unwrap());
        assert!(config.schedule.is_empty());
        assert_eq!(config.environment, Environment::Development);
        assert!(config.supported_years.is_empty());
    }

    #[test]
    fn test_config_from_arguments() {
        let config = Config::try_parse_from([
            "collecte_server",
            "--environment",
            "production",
            "--supported-year",
            "2025,2026",
            "--schedule",
            "data/2025.toml,data/2026.toml",
        ])
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.supported_years, vec![2025, 2026]);
        assert_eq!(config.schedule.len(), 2);
    }
}
