//! Command-line and config-file settings for the docchat client.
//!
//! Precedence, lowest first: built-in defaults, the RON config file, CLI flags
//! (which also read their `DOCCHAT_*` environment variables).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use docchat_engine::ClientSettings;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "docchat.ron";
pub const DEFAULT_LOG_FILE: &str = "docchat.log";

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal client for the document Q&A server", long_about = None)]
pub struct Cli {
    /// Base URL of the document server
    #[arg(long, env = "DOCCHAT_SERVER")]
    pub server: Option<String>,

    /// RON config file path
    #[arg(short, long, env = "DOCCHAT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Chat deadline in seconds (0 disables it)
    #[arg(long)]
    pub chat_timeout_secs: Option<u64>,

    /// Upload deadline in seconds (0 disables it)
    #[arg(long)]
    pub upload_timeout_secs: Option<u64>,

    /// Clear-data deadline in seconds (0 disables it)
    #[arg(long)]
    pub clear_timeout_secs: Option<u64>,

    /// Where to write the log
    #[arg(long, env = "DOCCHAT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

/// On-disk config; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub server: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub chat_timeout_secs: Option<u64>,
    pub upload_timeout_secs: Option<u64>,
    pub clear_timeout_secs: Option<u64>,
    pub max_upload_mb: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub verbose: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid arguments: {0}")]
    Args(#[from] clap::Error),
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings: ClientSettings,
    pub log_file: PathBuf,
    pub verbose: bool,
    /// The config file that was applied, if one existed.
    pub config_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_args(std::env::args_os())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        let file = load_config_file(&cli.config)?;
        let config_path = file.as_ref().map(|_| cli.config.clone());
        Ok(Self::merge(&cli, file.unwrap_or_default(), config_path))
    }

    fn merge(cli: &Cli, file: ConfigFile, config_path: Option<PathBuf>) -> Self {
        let mut settings = ClientSettings::default();

        if let Some(server) = cli.server.clone().or(file.server) {
            settings.base_url = server;
        }
        if let Some(secs) = file.connect_timeout_secs {
            settings.connect_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = cli.chat_timeout_secs.or(file.chat_timeout_secs) {
            settings.chat_timeout = deadline_from_secs(secs);
        }
        if let Some(secs) = cli.upload_timeout_secs.or(file.upload_timeout_secs) {
            settings.upload_timeout = deadline_from_secs(secs);
        }
        if let Some(secs) = cli.clear_timeout_secs.or(file.clear_timeout_secs) {
            settings.clear_timeout = deadline_from_secs(secs);
        }
        if let Some(mb) = file.max_upload_mb {
            settings.max_upload_bytes = mb.saturating_mul(1024 * 1024);
        }

        Self {
            settings,
            log_file: cli
                .log_file
                .clone()
                .or(file.log_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            verbose: cli.verbose || file.verbose.unwrap_or(false),
            config_path,
        }
    }
}

fn deadline_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Returns `Ok(None)` when the file does not exist.
fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
