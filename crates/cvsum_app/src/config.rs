//! Client configuration loaded from a RON file, with environment and CLI overrides.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cvsum_engine::GatewaySettings;
use serde::{Deserialize, Serialize};

use crate::args::CliArgs;
use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_PATH: &str = "./cvsum.ron";
pub const API_BASE_URL_ENV: &str = "CVSUM_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub use_mock: bool,
    pub log_destination: LogDestination,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
            use_mock: true,
            log_destination: LogDestination::Terminal,
        }
    }
}

impl ClientConfig {
    /// A missing file yields defaults; a file that exists but cannot be parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };
        ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Applies the environment (through `lookup`) and then the command line.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
        args: &CliArgs,
    ) -> Self {
        if let Some(url) = lookup(API_BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(url) = &args.api_url {
            self.api_base_url = url.clone();
        }
        if let Some(use_mock) = args.use_mock {
            self.use_mock = use_mock;
        }
        self
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
