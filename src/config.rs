//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "interval-timer")]
#[command(about = "An interval-training timer service that sequences work and rest phases")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Poll cadence in milliseconds (one frame at 60 Hz by default)
    #[arg(short, long, default_value = "16")]
    pub tick_ms: u64,

    /// JSON file holding saved interval configurations
    #[arg(short, long, default_value = "intervals.json")]
    pub store: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Ticker cadence, never shorter than one millisecond
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["interval-timer"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.tick_interval(), Duration::from_millis(16));
        assert_eq!(config.store, PathBuf::from("intervals.json"));
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn zero_tick_is_clamped() {
        let config = Config::try_parse_from(["interval-timer", "--tick-ms", "0", "-v"]).unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
        assert_eq!(config.log_level(), "debug");
    }
}
