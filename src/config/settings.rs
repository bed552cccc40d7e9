//! Application settings.
//!
//! Values are layered: built-in defaults, then an optional JSON file,
//! then environment variables.

use std::env;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::constants::{
    DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_DATABASE_URL, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SHUTDOWN_GRACE_SECS, DEFAULT_SSL_MODE,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    pub request_timeout_secs: u64,
    pub shutdown_grace_secs: u64,
    /// Append logs to this file instead of stdout
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("shutdown_grace_secs", &self.shutdown_grace_secs)
            .field("log_file", &self.log_file)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then `path` (if any), then the environment.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(path) = path {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                AppError::internal(format!(
                    "Failed to read config file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            config.apply_file(FileConfig::parse(&raw)?)?;
        }

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> AppResult<()> {
        if let Some(host) = file.server.host {
            self.server_host = host;
        }
        if let Some(port) = file.server.port {
            self.server_port = port
                .to_string()
                .parse()
                .map_err(|_| AppError::internal(format!("Invalid server port: {}", port)))?;
        }

        let db = file.database;
        if let Some(url) = db.url.clone() {
            self.database_url = url;
        } else if let Some(url) = db.compose_url()? {
            self.database_url = url;
        }
        if let Some(max) = db.max_connections {
            self.max_connections = max;
        }
        if let Some(min) = db.min_connections {
            self.min_connections = min;
        }
        if let Some(secs) = db.acquire_timeout_secs {
            self.acquire_timeout_secs = secs;
        }

        if let Some(path) = file.logging.file_path.filter(|p| !p.is_empty()) {
            self.log_file = Some(PathBuf::from(path));
        }
        if let Some(level) = file.logging.level.filter(|l| !l.is_empty()) {
            self.log_level = level;
        }

        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(secs) = file.shutdown_grace_secs {
            self.shutdown_grace_secs = secs;
        }

        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let parsed = |key: &str| var(key).and_then(|v| v.parse::<u64>().ok());

        if let Some(url) = var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(max) = var("DATABASE_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
            self.max_connections = max;
        }
        if let Some(min) = var("DATABASE_MIN_CONNECTIONS").and_then(|v| v.parse().ok()) {
            self.min_connections = min;
        }
        if let Some(secs) = parsed("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.acquire_timeout_secs = secs;
        }
        if let Some(host) = var("SERVER_HOST") {
            self.server_host = host;
        }
        if let Some(port) = var("SERVER_PORT").and_then(|v| v.parse().ok()) {
            self.server_port = port;
        }
        if let Some(secs) = parsed("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = secs;
        }
        if let Some(secs) = parsed("SHUTDOWN_GRACE_SECS") {
            self.shutdown_grace_secs = secs;
        }
        if let Some(path) = var("LOG_FILE").filter(|p| !p.is_empty()) {
            self.log_file = Some(PathBuf::from(path));
        }
        if let Some(level) = var("LOG_LEVEL").filter(|l| !l.is_empty()) {
            self.log_level = level;
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Open the configured log file for appending, creating it if needed.
    ///
    /// `Ok(None)` means log to stdout. A path that cannot be opened is an error.
    pub fn open_log_file(&self) -> AppResult<Option<File>> {
        let Some(path) = self.log_file.as_deref() else {
            return Ok(None);
        };

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(Some)
            .map_err(|e| {
                AppError::internal(format!(
                    "Failed to open log file {}: {}",
                    path.display(),
                    e
                ))
            })
    }
}

// =============================================================================
// Config file
// =============================================================================

/// On-disk JSON configuration; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    server: ServerSection,
    database: DatabaseSection,
    logging: LoggingSection,
    request_timeout_secs: Option<u64>,
    shutdown_grace_secs: Option<u64>,
}

impl FileConfig {
    fn parse(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| AppError::internal(format!("Invalid config file: {}", e)))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    host: Option<String>,
    port: Option<NumberOrString>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DatabaseSection {
    url: Option<String>,
    host: Option<String>,
    port: Option<NumberOrString>,
    user: Option<String>,
    password: Option<String>,
    dbname: Option<String>,
    sslmode: Option<String>,
    max_connections: Option<u32>,
    min_connections: Option<u32>,
    acquire_timeout_secs: Option<u64>,
}

impl DatabaseSection {
    /// Build a connection URL from discrete parameters, if a host is given.
    ///
    /// Credentials are percent-encoded, so any character is allowed in them.
    fn compose_url(&self) -> AppResult<Option<String>> {
        let Some(host) = self.host.as_deref() else {
            return Ok(None);
        };
        let invalid = |what: &str| AppError::internal(format!("Invalid database {}", what));

        let mut url = Url::parse("postgres://localhost").map_err(|_| invalid("url"))?;
        url.set_host(Some(host)).map_err(|_| invalid("host"))?;

        let port = match &self.port {
            Some(port) => port.to_string().parse::<u16>().map_err(|_| invalid("port"))?,
            None => 5432,
        };
        url.set_port(Some(port)).map_err(|_| invalid("port"))?;

        if let Some(user) = self.user.as_deref().filter(|u| !u.is_empty()) {
            url.set_username(user).map_err(|_| invalid("user"))?;
            if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
                url.set_password(Some(password))
                    .map_err(|_| invalid("password"))?;
            }
        }

        url.set_path(self.dbname.as_deref().unwrap_or("postgres"));
        url.query_pairs_mut().append_pair(
            "sslmode",
            self.sslmode.as_deref().unwrap_or(DEFAULT_SSL_MODE),
        );

        Ok(Some(url.into()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoggingSection {
    file_path: Option<String>,
    level: Option<String>,
}

/// Ports may be written as `8080` or `"8080"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for NumberOrString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberOrString::Number(n) => write!(f, "{}", n),
            NumberOrString::Text(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn file_components_compose_database_url() {
        let file = FileConfig::parse(
            r#"{
                "server": {"port": "9090"},
                "database": {
                    "host": "db", "port": "5433", "user": "app",
                    "password": "secret", "dbname": "users", "sslmode": "require"
                },
                "logging": {"file_path": "service.log", "level": "debug"}
            }"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file).unwrap();

        assert_eq!(config.server_port, 9090);
        assert_eq!(
            config.database_url,
            "postgres://app:secret@db:5433/users?sslmode=require"
        );
        assert_eq!(config.log_file, Some(PathBuf::from("service.log")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn composed_url_escapes_credentials() {
        let file = FileConfig::parse(
            r#"{"database": {"host": "db", "user": "app", "password": "p@ss:w/rd#1", "dbname": "users"}}"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file).unwrap();

        let url = Url::parse(&config.database_url).unwrap();
        assert_eq!(url.host_str(), Some("db"));
        assert_eq!(url.port(), Some(5432));
        assert_eq!(url.username(), "app");
        assert_eq!(url.password(), Some("p%40ss%3Aw%2Frd%231"));
        assert_eq!(url.path(), "/users");
        assert_eq!(url.query(), Some("sslmode=disable"));
    }

    #[test]
    fn invalid_database_port_is_rejected() {
        let file = FileConfig::parse(r#"{"database": {"host": "db", "port": "99999"}}"#).unwrap();
        let mut config = Config::default();
        assert!(config.apply_file(file).is_err());
    }

    #[test]
    fn explicit_url_wins_over_components() {
        let file = FileConfig::parse(
            r#"{"database": {"url": "postgres://x/y", "host": "ignored"}, "server": {"port": 81}}"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file).unwrap();

        assert_eq!(config.database_url, "postgres://x/y");
        assert_eq!(config.server_port, 81);
    }

    #[test]
    fn invalid_port_in_file_is_rejected() {
        let file = FileConfig::parse(r#"{"server": {"port": "eighty"}}"#).unwrap();
        let mut config = Config::default();
        assert!(config.apply_file(file).is_err());
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(FileConfig::parse("{not json").is_err());
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://env/db"),
            ("SERVER_PORT", "7000"),
            ("REQUEST_TIMEOUT_SECS", "3"),
            ("SHUTDOWN_GRACE_SECS", "not-a-number"),
        ]);

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_url, "postgres://env/db");
        assert_eq!(config.server_port, 7000);
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.shutdown_grace_secs, DEFAULT_SHUTDOWN_GRACE_SECS);
    }

    #[test]
    fn log_file_defaults_to_stdout() {
        assert!(Config::default().open_log_file().unwrap().is_none());
    }

    #[test]
    fn log_file_is_created_for_append() {
        let path = env::temp_dir().join(format!("user-microservice-{}.log", std::process::id()));
        let config = Config {
            log_file: Some(path.clone()),
            ..Config::default()
        };

        assert!(config.open_log_file().unwrap().is_some());
        assert!(path.exists());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn unopenable_log_file_is_an_error() {
        let config = Config {
            log_file: Some(env::temp_dir().join("missing-dir-for-logs").join("nested").join("service.log")),
            ..Config::default()
        };

        assert!(config.open_log_file().is_err());
    }

    #[test]
    fn debug_output_redacts_database_url() {
        let config = Config {
            database_url: "postgres://user:hunter2@db/users".to_string(),
            ..Config::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
