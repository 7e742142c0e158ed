use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Gateway settings, read from the environment at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream XML listing feed (`IMOVEIS_FEED_URL`, required)
    pub feed_url: String,
    /// Listen address (`IMOVEIS_BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// Upper bound on one upstream fetch (`IMOVEIS_FETCH_TIMEOUT_SECS`)
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let feed_url = get("IMOVEIS_FEED_URL").context("IMOVEIS_FEED_URL must be set")?;

        let bind_addr = get("IMOVEIS_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("IMOVEIS_BIND_ADDR is not a valid socket address")?;

        let fetch_timeout = match get("IMOVEIS_FETCH_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .context("IMOVEIS_FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        Ok(Self {
            feed_url,
            bind_addr,
            fetch_timeout: Duration::from_secs(fetch_timeout),
        })
    }
}
