//! Server configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `INMEM_PORT` | 8080 | Server port |
//! | `INMEM_HOST` | 127.0.0.1 | Host to bind |
//! | `INMEM_LOG_LEVEL` | info | Log level |
//! | `INMEM_SEED` | | Glob of seed files |
//! | `INMEM_CONFIG` | | Backend config file (JSON, JSONC or YAML) |
//! | `INMEM_OVERRIDES` | | Declarative overrides file |
//! | `INMEM_DELAY` | | Latency in milliseconds, replaces the config value |

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "inmem-server")]
#[command(about = "In-memory REST mock server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "INMEM_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "INMEM_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "INMEM_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Glob pattern of seed files, e.g. `seed/*.json`.
    #[arg(short, long, env = "INMEM_SEED")]
    pub seed: String,

    /// Backend config file.
    #[arg(short, long, env = "INMEM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Declarative overrides file.
    #[arg(long, env = "INMEM_OVERRIDES")]
    pub overrides: Option<PathBuf>,

    /// Simulated latency in milliseconds.
    #[arg(long, env = "INMEM_DELAY")]
    pub delay: Option<u64>,
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["inmem-server", "--seed", "seed/*.json"])
            .expect("config");

        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.seed, "seed/*.json");
        assert!(config.config.is_none());
        assert!(config.delay.is_none());
    }

    #[rstest]
    fn test_all_flags() {
        let config = ServerConfig::try_parse_from([
            "inmem-server",
            "-p",
            "3000",
            "--host",
            "0.0.0.0",
            "-s",
            "db.yaml",
            "-c",
            "backend.jsonc",
            "--overrides",
            "overrides.yaml",
            "--delay",
            "0",
        ])
        .expect("config");

        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
        assert_eq!(config.config, Some(PathBuf::from("backend.jsonc")));
        assert_eq!(config.overrides, Some(PathBuf::from("overrides.yaml")));
        assert_eq!(config.delay, Some(0));
    }

    #[rstest]
    fn test_seed_is_required() {
        if std::env::var_os("INMEM_SEED").is_none() {
            assert!(ServerConfig::try_parse_from(["inmem-server"]).is_err());
        }
    }
}
