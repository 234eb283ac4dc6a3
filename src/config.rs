//! Layered configuration for the widget.
//!
//! Priority: CLI flag > CLI env var > `CHAT_WIDGET__*` env vars > config file >
//! defaults. The config file is `--config`/`CONFIG_FILE` when given, otherwise
//! an optional `chat-widget.{yaml,toml,json}` in the working directory.

use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

use crate::error::{Result, WidgetError};

/// Default upload ceiling enforced by the chat server (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the chat server
    #[arg(long, env = "CHAT_SERVER_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CHAT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub server: ServerConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub base_url: String,
    pub send_path: String,
    pub clear_history_path: String,
    /// Prefix under which the server exposes uploaded files.
    pub uploads_prefix: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LimitsConfig {
    pub max_upload_bytes: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://127.0.0.1:5000".to_string(),
                send_path: "/send_message".to_string(),
                clear_history_path: "/clear_history".to_string(),
                uploads_prefix: "/uploads/".to_string(),
                timeout_secs: 60,
            },
            limits: LimitsConfig {
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
        }
    }
}

impl WidgetConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| WidgetError::Config(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Build the layered configuration for an already parsed command line.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("server.base_url", defaults.server.base_url)?
            .set_default("server.send_path", defaults.server.send_path)?
            .set_default("server.clear_history_path", defaults.server.clear_history_path)?
            .set_default("server.uploads_prefix", defaults.server.uploads_prefix)?
            .set_default("server.timeout_secs", defaults.server.timeout_secs)?
            .set_default("limits.max_upload_bytes", defaults.limits.max_upload_bytes)?;

        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("chat-widget").required(false)),
        };

        // E.g. CHAT_WIDGET__SERVER__BASE_URL=http://localhost:8000
        builder = builder.add_source(
            Environment::with_prefix("CHAT_WIDGET")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = &cli.url {
            builder = builder.set_override("server.base_url", url.as_str())?;
        }
        if let Some(timeout) = cli.timeout_secs {
            builder = builder.set_override("server.timeout_secs", timeout)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.base_url()?;
        Ok(config)
    }

    /// Parsed server base URL.
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.server.base_url)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_server_routes() {
        let config = WidgetConfig::default();
        assert_eq!(config.server.send_path, "/send_message");
        assert_eq!(config.server.uploads_prefix, "/uploads/");
        assert_eq!(config.limits.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_base_url_parses() {
        let config = WidgetConfig::default();
        assert_eq!(config.base_url().unwrap().as_str(), "http://127.0.0.1:5000/");
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = WidgetConfig::default();
        config.server.base_url = "not a url".to_string();
        assert!(matches!(config.base_url(), Err(WidgetError::InvalidUrl(_))));
    }
}
