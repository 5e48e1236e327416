//! Server configuration
//!
//! Values come from three layers, highest first: command-line flags (and
//! their environment variables), an optional TOML file, then defaults.
//! The merged [`ServerConfig`] is validated once before anything starts.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use gtm_api::{Credentials, DEFAULT_BASE_URL};
use serde::Deserialize;
use url::Url;

use crate::{Error, Result};

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Which transport serves MCP messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Newline-delimited JSON-RPC on stdin/stdout
    #[default]
    Stdio,
    /// `POST /mcp` over HTTP with per-request bearer tokens
    Http,
}

/// Contents of the `--config` TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub transport: Option<TransportKind>,
    pub bind: Option<String>,
    pub credentials_file: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub max_body_bytes: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub transport: Option<TransportKind>,
    pub bind: Option<String>,
    pub credentials_file: Option<PathBuf>,
    pub api_base_url: Option<String>,
}

/// Fully resolved and validated configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub transport: TransportKind,
    /// Listen address; only resolved for [`TransportKind::Http`]
    pub bind: Option<SocketAddr>,
    pub credentials_file: Option<PathBuf>,
    pub api_base_url: Url,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Merge overrides over an optional file over defaults, then validate.
    pub fn resolve(overrides: Overrides, file: Option<FileConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let transport = overrides.transport.or(file.transport).unwrap_or_default();
        let bind = overrides.bind.or(file.bind);
        let credentials_file = overrides.credentials_file.or(file.credentials_file);
        let api_base_url = overrides
            .api_base_url
            .or(file.api_base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let max_body_bytes = file.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES);

        // A stray bind value must not stop a stdio server from starting
        let bind: Option<SocketAddr> = match transport {
            TransportKind::Stdio => None,
            TransportKind::Http => {
                let bind = bind.unwrap_or_else(|| DEFAULT_BIND.to_string());
                Some(
                    bind.parse()
                        .map_err(|e| Error::Config(format!("bind address {bind:?}: {e}")))?,
                )
            }
        };

        let api_base_url = Url::parse(&api_base_url)
            .map_err(|e| Error::Config(format!("api_base_url {api_base_url:?}: {e}")))?;
        if api_base_url.cannot_be_a_base() || !api_base_url.path().ends_with('/') {
            return Err(Error::Config(format!(
                "api_base_url must be an absolute URL ending in '/': {api_base_url}"
            )));
        }

        if max_body_bytes == 0 {
            return Err(Error::Config("max_body_bytes must be greater than zero".into()));
        }

        if let Some(path) = &credentials_file {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "credentials file not found: {}",
                    path.display()
                )));
            }
        }

        Ok(Self {
            transport,
            bind,
            credentials_file,
            api_base_url,
            max_body_bytes,
        })
    }

    /// Credentials used when a call brings none of its own
    pub fn credentials(&self) -> Credentials {
        match &self.credentials_file {
            Some(path) => Credentials::ServiceAccountKey(path.clone()),
            None => Credentials::ApplicationDefault,
        }
    }
}
