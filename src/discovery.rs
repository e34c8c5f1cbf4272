//! Finding a bridge: cache first, then each discovery strategy in turn.

use futures::future::BoxFuture;
use log::{debug, info};

use crate::bridge::Bridge;
use crate::cache::CacheStore;
use crate::config::DiscoveryConfig;
use crate::errors::Error;
use crate::identity::{BridgeIdentity, Discovered};
use crate::remote::RemoteDiscoverer;
use crate::ssdp::LocalDiscoverer;

type Result<T> = std::result::Result<T, Error>;

/// A way of locating a bridge on the network.
pub trait DiscoveryStrategy: Send + Sync {
    /// Short label used in logs and in [`Discovered::Found`].
    fn name(&self) -> &'static str;

    /// Looks for a bridge once.
    fn attempt(&self) -> BoxFuture<'_, Result<BridgeIdentity>>;
}

/// Locates a bridge, preferring the cached pairing over the network.
///
/// # Examples
///
/// ```no_run
/// use hue_bridge_rs::{Discoverer, DiscoveryConfig};
///
/// # async fn run() -> Result<(), hue_bridge_rs::Error> {
/// let discoverer = Discoverer::new(&DiscoveryConfig::default())?;
/// let bridge = discoverer.discover_bridge().await?;
/// println!("using {}", bridge.identity());
/// # Ok(())
/// # }
/// ```
pub struct Discoverer {
    cache: CacheStore,
    http: reqwest::Client,
    strategies: Vec<Box<dyn DiscoveryStrategy>>,
}

impl Discoverer {
    /// SSDP on the local network, then the remote lookup service.
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let http = config.http_client()?;
        let strategies: Vec<Box<dyn DiscoveryStrategy>> = vec![
            Box::new(LocalDiscoverer::new(config, http.clone())),
            Box::new(RemoteDiscoverer::new(config, http.clone())),
        ];
        Ok(Discoverer {
            cache: config.cache_store(),
            http,
            strategies,
        })
    }

    /// Tries `strategies` in the given order after the cache.
    pub fn with_strategies(cache: CacheStore, strategies: Vec<Box<dyn DiscoveryStrategy>>) -> Self {
        Discoverer {
            cache,
            http: DiscoveryConfig::default().http_client_or_default(),
            strategies,
        }
    }

    /// Client handed to bridges built by [`Discoverer::discover_bridge`].
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Returns the cached bridge if there is one, otherwise the first bridge
    /// any strategy finds.
    ///
    /// A cached bridge is returned as is; it is not checked to still be
    /// reachable. Fails with [`Error::NotFound`] when every strategy fails.
    pub async fn discover(&self) -> Result<Discovered> {
        if let Some(paired) = self.cache.load() {
            debug!("using cached bridge {}", paired.identity());
            return Ok(Discovered::Cached(paired));
        }

        for strategy in &self.strategies {
            match strategy.attempt().await {
                Ok(identity) => {
                    info!("found bridge {identity} via {}", strategy.name());
                    return Ok(Discovered::Found {
                        identity,
                        strategy: strategy.name(),
                    });
                }
                Err(e) => info!("{} discovery failed: {e}", strategy.name()),
            }
        }

        Err(Error::NotFound)
    }

    /// Like [`Discoverer::discover`], returning a client for the bridge.
    ///
    /// The client is paired when the bridge came from the cache, and saves
    /// to the same cache when paired later.
    pub async fn discover_bridge(&self) -> Result<Bridge> {
        let discovered = self.discover().await?;
        Ok(Bridge::from_discovered(discovered)
            .with_http_client(self.http.clone())
            .with_cache(self.cache.clone()))
    }
}

/// Finds a bridge with the default configuration.
///
/// ```no_run
/// # async fn run() -> Result<(), hue_bridge_rs::Error> {
/// let mut bridge = hue_bridge_rs::discover().await?;
/// if !bridge.is_paired() {
///     bridge.pair().await?;
/// }
/// # Ok(())
/// # }
/// ```
pub async fn discover() -> Result<Bridge> {
    Discoverer::new(&DiscoveryConfig::default())?
        .discover_bridge()
        .await
}
