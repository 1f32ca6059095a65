use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 42069;

/// Server process settings.
///
/// Built from defaults overridden by either the environment
/// ([`Config::load`]) or a YAML file ([`Config::from_file`]).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TCP port to listen on, on all interfaces
    pub port: u16,
    /// File served on `/video`
    pub video_path: PathBuf,
    /// Base URL that `/httpbin/...` requests are streamed from
    pub upstream: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            video_path: PathBuf::from("./assets/vim.mp4"),
            upstream: "http://httpbin.org".to_string(),
        }
    }
}

impl Config {
    /// Reads `PORT`, `VIDEO_PATH` and `UPSTREAM` from the environment.
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            match port.parse() {
                Ok(port) => cfg.port = port,
                Err(_) => tracing::warn!(%port, "ignoring invalid PORT"),
            }
        }
        if let Ok(path) = std::env::var("VIDEO_PATH") {
            cfg.video_path = PathBuf::from(path);
        }
        if let Ok(upstream) = std::env::var("UPSTREAM") {
            cfg.upstream = upstream;
        }

        cfg
    }

    pub fn from_yaml_str(s: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(s).context("invalid YAML configuration")
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }
}
