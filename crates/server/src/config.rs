//! Server settings read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_IMG_DIR: &str = "img";
pub const DEFAULT_TIMEOUT: u64 = 30;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub steam_api_key: String,
    pub addr: SocketAddr,
    pub img_dir: PathBuf,
    /// Overrides the statistics site base URL.
    pub site_url: Option<String>,
    /// Upstream request timeout in seconds.
    pub timeout: u64,
}

impl ServerConfig {
    /// Reads `STEAM_API_KEY` (required), `MODSTATS_ADDR`, `MODSTATS_IMG_DIR`,
    /// `MODSTATS_SITE_URL` and `MODSTATS_TIMEOUT`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let steam_api_key = match lookup("STEAM_API_KEY") {
            Some(key) if !key.trim().is_empty() => key,
            _ => bail!("STEAM_API_KEY must be set to a Steam Web API key"),
        };

        let addr = lookup("MODSTATS_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()
            .context("MODSTATS_ADDR is not a socket address")?;

        let img_dir = lookup("MODSTATS_IMG_DIR").map_or_else(|| PathBuf::from(DEFAULT_IMG_DIR), PathBuf::from);

        let timeout = match lookup("MODSTATS_TIMEOUT") {
            Some(raw) => raw.parse().with_context(|| format!("MODSTATS_TIMEOUT is not a number: {raw:?}"))?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self { steam_api_key, addr, img_dir, site_url: lookup("MODSTATS_SITE_URL"), timeout })
    }
}
