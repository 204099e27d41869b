//! Application-wide configuration constants and the optional settings file.

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

pub const NAME: &str = concat!("Comic Pages ", env!("CARGO_PKG_VERSION"));
/// Path prefix under which pages are served.
pub const DEFAULT_ROUTE_PREFIX: &str = "/image";
/// Workers per logical core.
pub const DEFAULT_WORKER_MULTIPLIER: usize = 2;
pub const DEFAULT_PORT: u16 = 34115;

/// Settings read from a TOML file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub bind: SocketAddr,
    pub route_prefix: String,
    /// Directory served to every request outside the page route.
    pub assets_dir: Option<PathBuf>,
    pub worker_multiplier: usize,
    /// Fixed worker count, overriding the multiplier.
    pub workers: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            assets_dir: None,
            worker_multiplier: DEFAULT_WORKER_MULTIPLIER,
            workers: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Extraction workers per load, never less than one.
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| self.worker_multiplier * num_cpus::get())
            .max(1)
    }
}
