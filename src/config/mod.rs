pub mod toml_config;

pub use toml_config::{AppConfig, ConnectionProfile, OutputConfig};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "crt-identities", version)]
#[command(about = "Fetch certificate common names for a domain from crt.sh")]
pub struct CliConfig {
    /// Domain to search for (letters, digits, dots and hyphens only)
    pub domain: String,

    /// Optional TOML file overriding the connection profile and output settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for <domain>_identities.txt (default: current directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of identities kept from the query result
    #[arg(long)]
    pub max_identities: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log CPU and memory usage after each stage
    #[arg(long)]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Load the config file (if any) and apply command-line overrides.
    pub fn to_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output.directory = Some(dir.clone());
        }
        if let Some(max) = self.max_identities {
            config.output.max_identities = max;
        }

        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_single_positional_domain() {
        let cli = CliConfig::try_parse_from(["crt-identities", "example.com"]).unwrap();
        assert_eq!(cli.domain, "example.com");
        assert!(!cli.verbose);

        let config = cli.to_app_config().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_wrong_argument_count_is_rejected() {
        assert!(CliConfig::try_parse_from(["crt-identities"]).is_err());
        assert!(CliConfig::try_parse_from(["crt-identities", "a.com", "b.com"]).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("crt.toml");
        std::fs::write(&file, "[output]\ndirectory = \"from-file\"\nmax_identities = 10\n").unwrap();

        let cli = CliConfig::try_parse_from([
            "crt-identities",
            "--config",
            file.to_str().unwrap(),
            "--output-dir",
            "from-flag",
            "a.com",
        ])
        .unwrap();
        let config = cli.to_app_config().unwrap();

        assert_eq!(config.output_dir(), Path::new("from-flag"));
        assert_eq!(config.output.max_identities, 10);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = CliConfig::try_parse_from(["crt-identities", "-c", "/nonexistent/crt.toml", "a.com"]).unwrap();
        assert_eq!(cli.to_app_config().unwrap_err().kind(), "ConfigError");
    }
}
