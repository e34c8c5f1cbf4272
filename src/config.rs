//! Discovery and client configuration.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::cache::CacheStore;
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Tunables for discovery, pairing and the HTTP client.
///
/// Every value has a default suitable for a real network. Tests and unusual
/// setups override individual fields with the `with_*` builders.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hue_bridge_rs::DiscoveryConfig;
///
/// let config = DiscoveryConfig::default().with_deadline(Duration::from_secs(2));
/// assert_eq!(config.deadline(), Duration::from_secs(2));
/// assert_eq!(config.multicast_addr().to_string(), "239.255.255.250:1900");
/// ```
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    multicast_addr: SocketAddr,
    deadline: Duration,
    remote_url: String,
    product_name: String,
    http_timeout: Duration,
    cache_path: Option<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            multicast_addr: SocketAddr::V4(SocketAddrV4::new(Self::SSDP_GROUP, Self::SSDP_PORT)),
            deadline: Duration::from_secs(5),
            remote_url: Self::REMOTE_URL.to_string(),
            product_name: Self::PRODUCT_NAME.to_string(),
            http_timeout: Duration::from_secs(10),
            cache_path: None,
        }
    }
}

impl DiscoveryConfig {
    pub const SSDP_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
    pub const SSDP_PORT: u16 = 1900;
    pub const REMOTE_URL: &'static str = "https://discovery.meethue.com/";
    pub const PRODUCT_NAME: &'static str = "Philips hue";
    pub const CACHE_FILE: &'static str = ".hue";

    pub fn new() -> Self {
        Self::default()
    }

    /// Where the SSDP search datagram is sent.
    pub fn with_multicast_addr(mut self, addr: SocketAddr) -> Self {
        self.multicast_addr = addr;
        self
    }

    /// How long local discovery waits for a valid reply.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// The lookup service queried when local discovery fails.
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = url.into();
        self
    }

    /// Substring a device description must carry to be accepted.
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    /// Upper bound for every outbound HTTP request.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Store the paired bridge at `path` instead of `~/.hue`.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    pub fn multicast_addr(&self) -> SocketAddr {
        self.multicast_addr
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// The cache store described by this configuration.
    pub fn cache_store(&self) -> CacheStore {
        match &self.cache_path {
            Some(path) => CacheStore::at(path),
            None => CacheStore::in_home_dir(Self::CACHE_FILE),
        }
    }

    /// Builds the HTTP client shared by discovery, pairing and resource calls.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| Error::http("client", e))
    }

    /// Like [`DiscoveryConfig::http_client`], falling back to an unbounded
    /// client with a warning when the configured one cannot be built.
    pub(crate) fn http_client_or_default(&self) -> reqwest::Client {
        self.http_client().unwrap_or_else(|e| {
            warn!("using an HTTP client without timeout: {e}");
            reqwest::Client::new()
        })
    }
}
