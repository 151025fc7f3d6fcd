use std::time::Duration;

use anyhow::anyhow;
use anyhow::Result;
use common::env::{parse_var, var_non_empty};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// `0` means "use the port the service listens on by default".
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 0,
            worker_threads: Some(4),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Where the category service reaches advertisement storage.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_addr")]
    pub addr: String,
    #[serde(default = "default_storage_timeout")]
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { addr: default_storage_addr(), timeout_secs: default_storage_timeout() }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_request_timeout() -> u64 { 30 }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_storage_addr() -> String { "http://127.0.0.1:8000".into() }
fn default_storage_timeout() -> u64 { 10 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) when present, otherwise start
    /// from defaults; then apply environment overrides and validate the
    /// server section. `default_port` is the fixed port of the calling
    /// service.
    /// A missing file means defaults; an unreadable or malformed one is an
    /// error.
    pub fn load_for_service(default_port: u16) -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_for_service_from(&path, default_port)
    }

    pub fn load_for_service_from(path: &str, default_port: u16) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e.context(format!("failed to load {}", path))),
        };
        cfg.normalize_and_validate(default_port)?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self, default_port: u16) -> Result<()> {
        self.server.normalize(default_port)?;
        self.database.normalize_from_env();
        self.storage.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self, default_port: u16) -> Result<()> {
        if let Some(host) = var_non_empty("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = parse_var::<u16>("SERVER_PORT") {
            self.port = port;
        }
        if let Some(w) = parse_var::<usize>("TOKIO_WORKER_THREADS") {
            self.worker_threads = Some(w);
        }
        if let Some(t) = parse_var::<u64>("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = t;
        }

        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            self.port = default_port;
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("server.request_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Some(url) = var_non_empty("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    /// Only services that own a database call this.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl StorageConfig {
    /// `STORAGE_ADDR` wins over the file. A bare `host:port` gets an
    /// `http://` scheme, and trailing slashes are dropped.
    pub fn normalize_from_env(&mut self) {
        if let Some(addr) = var_non_empty("STORAGE_ADDR") {
            self.addr = addr;
        }
        let trimmed = self.addr.trim().trim_end_matches('/');
        self.addr = if trimmed.is_empty() {
            String::new()
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };
    }

    pub fn validate(&self) -> Result<()> {
        if self.addr.is_empty() {
            return Err(anyhow!("storage.addr is empty; set it in config.toml or STORAGE_ADDR"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("storage.timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = load_from_str("").unwrap();
        assert_eq!(cfg.server.port, 0);
        assert_eq!(cfg.server.request_timeout_secs, 30);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.storage.addr, "http://127.0.0.1:8000");
    }

    #[test]
    fn zero_port_falls_back_to_service_port() {
        let mut server = ServerConfig::default();
        server.normalize(8001).unwrap();
        assert!(server.port != 0);
        assert!(server.worker_threads.unwrap() > 0);
    }

    #[test]
    fn sections_parse_from_toml() {
        let cfg = load_from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            request_timeout_secs = 5

            [database]
            url = "postgres://u:p@localhost:5432/ads"
            max_connections = 4
            min_connections = 1

            [storage]
            addr = "storage:8000"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.server.request_timeout(), Duration::from_secs(5));
        assert!(cfg.database.validate().is_ok());
        assert_eq!(cfg.storage.addr, "storage:8000");
    }

    #[test]
    fn database_validation_rejects_bad_urls_and_pools() {
        let mut db = DatabaseConfig { url: "mysql://localhost/ads".into(), ..Default::default() };
        assert!(db.validate().is_err());
        db.url = "postgres://localhost/ads".into();
        db.min_connections = 5;
        db.max_connections = 2;
        assert!(db.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load_for_service_from("/nonexistent/marketplace-config.toml", 8002).unwrap();
        assert!(cfg.server.port != 0);
    }

    #[test]
    fn malformed_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("marketplace-bad-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[server\nport = \"eighty\"").unwrap();

        std::env::set_var("CONFIG_PATH", &path);
        let res = AppConfig::load_for_service(8000);
        std::env::remove_var("CONFIG_PATH");
        std::fs::remove_file(&path).ok();

        let err = res.unwrap_err();
        assert!(err.to_string().contains("failed to load"), "{err:#}");
    }

    #[test]
    fn storage_addr_gets_scheme() {
        let mut storage = StorageConfig { addr: "storage:8000/".into(), timeout_secs: 3 };
        if std::env::var("STORAGE_ADDR").is_err() {
            storage.normalize_from_env();
            assert_eq!(storage.addr, "http://storage:8000");
        }
        assert!(storage.validate().is_ok());
    }
}
