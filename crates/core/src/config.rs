use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};

/// Top-level configuration. Every section falls back to its defaults, so a
/// user file only needs the keys it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub discovery: DiscoveryConfig,
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub recorder: RecorderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub multicast_addr: String,
    pub search_target: String,
    pub mx: u8,
    /// Stop listening once no response arrived for this long
    pub idle_timeout_ms: u64,
    /// Hard bound on the whole listening loop
    pub deadline_ms: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            multicast_addr: "239.255.255.250:1900".to_string(),
            search_target: "ssdp:all".to_string(),
            mx: 1,
            idle_timeout_ms: 3000,
            deadline_ms: 10_000,
        }
    }
}

impl DiscoveryConfig {
    pub fn multicast_socket_addr(&self) -> Result<SocketAddr> {
        self.multicast_addr.parse().map_err(|e| {
            FetchError::Config(format!(
                "invalid multicast address {}: {}",
                self.multicast_addr, e
            ))
        })
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub description_path: String,
    /// Devices whose manufacturer URL differs are ignored
    pub manufacturer_url: String,
    pub recordings_title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 49152,
            description_path: "/MediaServer.xml".to_string(),
            manufacturer_url: "http://www.fetch.com/".to_string(),
            recordings_title: "Recordings".to_string(),
        }
    }
}

impl ServerConfig {
    /// Description URL for a server given by address, bypassing discovery
    pub fn location_for(&self, ip: &str, port: Option<u16>) -> String {
        let path = self.description_path.trim_start_matches('/');
        format!("http://{}:{}/{}", ip, port.unwrap_or(self.port), path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 5,
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub ledger_file: String,
    pub lock_suffix: String,
    pub extension: String,
    /// Content length the server declares for items still being recorded
    pub recording_sentinel: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            ledger_file: "fetchtv_save_list.json".to_string(),
            lock_suffix: ".lock".to_string(),
            extension: "mpeg".to_string(),
            recording_sentinel: 4_398_046_510_080,
        }
    }
}

impl FetchConfig {
    /// Load from an explicit file, else the user config file if present,
    /// else the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FetchError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FetchError::Config(e.to_string()))
    }

    /// `<config_dir>/fetchtv/config.toml` (XDG on Linux, AppData on Windows)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fetchtv").join("config.toml"))
    }
}
