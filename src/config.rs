use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory of UI assets served for any route the API does not match.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    // Synchronous scans of large folders run inside a request.
    600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Number of background scans allowed to run at once.
    #[serde(default = "default_max_concurrent_scans")]
    pub max_concurrent_scans: usize,
}

fn default_image_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
}

fn default_max_concurrent_scans() -> usize {
    2
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            image_extensions: default_image_extensions(),
            max_concurrent_scans: default_max_concurrent_scans(),
        }
    }
}

/// Values the UI shows in its footer and map view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub created_on: Option<String>,

    #[serde(default = "default_tile_url_template")]
    pub tile_url_template: String,
}

fn default_tile_url_template() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            author: None,
            created_on: None,
            tile_url_template: default_tile_url_template(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    /// Send logs to systemd-journald instead of files when it is reachable.
    #[serde(default)]
    pub journald: bool,
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dayalbum")
        .join("logs")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            journald: false,
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dayalbum")
        .join("dayalbum.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            server: ServerConfig::default(),
            scanner: ScannerConfig::default(),
            site: SiteConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load from `DAYALBUM_CONFIG` or the default location, writing a default
    /// file when none exists yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::read(&config_path)?
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            config
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// | Env Var         | Overrides      |
    /// |-----------------|----------------|
    /// | `DAYALBUM_DB`   | `db_path`      |
    /// | `DAYALBUM_HOST` | `server.host`  |
    /// | `DAYALBUM_PORT` | `server.port`  |
    pub fn apply_env_overrides(&mut self) {
        if let Ok(db) = std::env::var("DAYALBUM_DB") {
            self.db_path = PathBuf::from(db);
        }
        if let Ok(host) = std::env::var("DAYALBUM_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("DAYALBUM_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(%port, "Ignoring invalid DAYALBUM_PORT"),
            }
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dayalbum")
    }

    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("DAYALBUM_CONFIG") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }
}
