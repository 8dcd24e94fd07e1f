use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const HOST_ENV: &str = "LINKFAST_HOST";
pub const PORT_ENV: &str = "PORT";
pub const BASE_URL_ENV: &str = "LINKFAST_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "LINKFAST_STORAGE";
pub const DB_PATH_ENV: &str = "LINKFAST_DB_PATH";
pub const DB_OPEN_TIMEOUT_ENV: &str = "LINKFAST_DB_OPEN_TIMEOUT_MS";
pub const CACHE_TTL_ENV: &str = "LINKFAST_CACHE_TTL_SECS";
pub const CACHE_CLEANUP_ENV: &str = "LINKFAST_CACHE_CLEANUP_SECS";
pub const CACHE_CAPACITY_ENV: &str = "LINKFAST_CACHE_CAPACITY";
pub const REQUEST_TIMEOUT_ENV: &str = "LINKFAST_REQUEST_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LINKFAST_LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = "urls.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "redb")]
    Redb,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Redb => write!(f, "redb"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "linkfast", about = "URL shortener with an embedded store and hot cache")]
pub struct CLI {
    #[arg(long, env = HOST_ENV, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Origin used to build short URLs. Defaults to http://localhost:{port}.
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Redb
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    #[arg(long, env = DB_OPEN_TIMEOUT_ENV, default_value_t = 1_000)]
    pub db_open_timeout_ms: u64,

    #[arg(long, env = CACHE_TTL_ENV, default_value_t = 300)]
    pub cache_ttl_secs: u64,

    #[arg(long, env = CACHE_CLEANUP_ENV, default_value_t = 600)]
    pub cache_cleanup_secs: u64,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = 10_000)]
    pub cache_capacity: u64,

    #[arg(long, env = REQUEST_TIMEOUT_ENV, default_value_t = 15)]
    pub request_timeout_secs: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,
}

impl CLI {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    pub fn db_open_timeout(&self) -> Duration {
        Duration::from_millis(self.db_open_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cache_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cache_cleanup_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_follows_port() {
        let cli = CLI::try_parse_from(["linkfast", "--port", "9090"]).unwrap();
        assert_eq!(cli.base_url(), "http://localhost:9090");
    }

    #[test]
    fn explicit_base_url_wins() {
        let cli = CLI::try_parse_from([
            "linkfast",
            "--port",
            "9090",
            "--base-url",
            "https://lnk.fast",
        ])
        .unwrap();
        assert_eq!(cli.base_url(), "https://lnk.fast");
    }

    #[test]
    fn parses_backend_and_durations() {
        let cli = CLI::try_parse_from([
            "linkfast",
            "--storage",
            "in-memory",
            "--cache-ttl-secs",
            "30",
            "--db-open-timeout-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.cache_ttl(), Duration::from_secs(30));
        assert_eq!(cli.db_open_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(CLI::try_parse_from(["linkfast", "--storage", "mysql"]).is_err());
    }
}
