use crate::core::ConfigProvider;
use crate::utils::error::{IdentityError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "crt.sh";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_USER: &str = "guest";
pub const DEFAULT_DATABASE: &str = "certwatch";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ERROR_LOG: &str = "script_errors.log";
pub const DEFAULT_MAX_IDENTITIES: usize = 1_000_000;

/// Settings for one run. Every field has a default, so an empty file (or no
/// file at all) gives the public crt.sh guest profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub connection: ConnectionProfile,
    pub output: OutputConfig,
}

/// How to reach the certwatch database. TLS is always required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionProfile {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
    pub connect_timeout_secs: u64,
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ConnectionProfile {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Where `<domain>_identities.txt` goes; `None` means the working directory.
    pub directory: Option<PathBuf>,
    pub error_log: PathBuf,
    pub max_identities: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            error_log: PathBuf::from(DEFAULT_ERROR_LOG),
            max_identities: DEFAULT_MAX_IDENTITIES,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| IdentityError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| IdentityError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn output_dir(&self) -> &Path {
        self.output
            .directory
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        let conn = &self.connection;
        validation::validate_non_empty_string("connection.host", &conn.host)?;
        validation::validate_non_empty_string("connection.user", &conn.user)?;
        validation::validate_non_empty_string("connection.database", &conn.database)?;
        validation::validate_range("connection.port", conn.port, 1, u16::MAX)?;
        validation::validate_range(
            "connection.connect_timeout_secs",
            conn.connect_timeout_secs,
            1,
            300,
        )?;

        validation::validate_path("output.error_log", &self.output.error_log)?;
        if let Some(dir) = &self.output.directory {
            validation::validate_path("output.directory", dir)?;
        }
        validation::validate_positive_number("output.max_identities", self.output.max_identities, 1)?;

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn max_identities(&self) -> usize {
        self.output.max_identities
    }
}
