//! Bridge lookup through the vendor's discovery service.

use futures::FutureExt;
use futures::future::BoxFuture;
use log::debug;
use serde::Deserialize;

use crate::config::DiscoveryConfig;
use crate::discovery::DiscoveryStrategy;
use crate::errors::Error;
use crate::identity::BridgeIdentity;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Deserialize)]
struct RemoteBridge {
    id: String,
    #[serde(rename = "internalipaddress")]
    internal_ip_address: String,
}

/// Asks the lookup service which bridges registered from this network.
#[derive(Debug, Clone)]
pub struct RemoteDiscoverer {
    url: String,
    http: reqwest::Client,
}

impl RemoteDiscoverer {
    pub fn new(config: &DiscoveryConfig, http: reqwest::Client) -> Self {
        RemoteDiscoverer {
            url: config.remote_url().to_string(),
            http,
        }
    }

    /// Returns the first bridge the service reports.
    ///
    /// Any further bridges are ignored.
    pub async fn discover(&self) -> Result<BridgeIdentity> {
        let bridges: Vec<RemoteBridge> = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::http("lookup", e))?
            .json()
            .await
            .map_err(|e| Error::http("lookup", e))?;

        let mut bridges = bridges.into_iter();
        let Some(first) = bridges.next() else {
            return Err(Error::NotFound);
        };
        let ignored: Vec<String> = bridges.map(|b| b.id).collect();
        if !ignored.is_empty() {
            debug!("ignoring other bridges {ignored:?}");
        }

        Ok(BridgeIdentity::new(
            first.id,
            format!("http://{}/", first.internal_ip_address),
        ))
    }
}

impl DiscoveryStrategy for RemoteDiscoverer {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn attempt(&self) -> BoxFuture<'_, Result<BridgeIdentity>> {
        self.discover().boxed()
    }
}
