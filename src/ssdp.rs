//! Local bridge discovery via SSDP multicast search.

use std::net::SocketAddr;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use log::debug;
use serde::Deserialize;
use tokio::net::UdpSocket;
use tokio::time::{Instant, timeout_at};

use crate::config::DiscoveryConfig;
use crate::discovery::DiscoveryStrategy;
use crate::errors::Error;
use crate::identity::BridgeIdentity;

type Result<T> = std::result::Result<T, Error>;

const SEARCH: &[u8] = b"M-SEARCH * HTTP/1.1\r\n\
HOST: 239.255.255.250:1900\r\n\
MAN: ssdp:discover\r\n\
MX: 10\r\n\
ST: ssdp:all\r\n";

/// Finds a bridge on the local network by multicasting an SSDP search and
/// checking the device description behind each `Location` it hears about.
#[derive(Debug, Clone)]
pub struct LocalDiscoverer {
    multicast_addr: SocketAddr,
    deadline: Duration,
    product_name: String,
    http: reqwest::Client,
}

impl LocalDiscoverer {
    pub fn new(config: &DiscoveryConfig, http: reqwest::Client) -> Self {
        LocalDiscoverer {
            multicast_addr: config.multicast_addr(),
            deadline: config.deadline(),
            product_name: config.product_name().to_string(),
            http,
        }
    }

    /// Returns the first bridge that answers before the deadline.
    ///
    /// Fails with [`Error::NotFound`] if no valid bridge answered in time.
    pub async fn discover(&self) -> Result<BridgeIdentity> {
        let bind_addr = if self.multicast_addr.is_ipv6() {
            "[::]:0"
        } else {
            "0.0.0.0:0"
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| Error::socket("bind", e))?;
        socket
            .send_to(SEARCH, self.multicast_addr)
            .await
            .map_err(|e| Error::socket("send_to", e))?;

        let deadline = Instant::now() + self.deadline;
        let mut buffer = [0u8; 4096];

        loop {
            let received = timeout_at(deadline, socket.recv_from(&mut buffer)).await;
            let Some((size, from)) = received.ok().and_then(reply_received) else {
                break;
            };

            let locations: Vec<String> = parse_datagram(&buffer[..size])
                .iter()
                .filter_map(|msg| {
                    let location = msg.header("location");
                    if location.is_none() {
                        debug!("no location in {:?} from {from}", msg.status);
                    }
                    location.map(String::from)
                })
                .collect();

            for location in locations {
                match timeout_at(deadline, self.try_location(&location)).await {
                    Ok(Ok(identity)) => {
                        debug!("bridge {identity} answered from {from}");
                        return Ok(identity);
                    }
                    Ok(Err(e)) => debug!("skipping {location} from {from}: {e}"),
                    Err(_) => {
                        debug!("deadline passed while fetching {location}");
                        return Err(Error::NotFound);
                    }
                }
            }
        }

        Err(Error::NotFound)
    }

    async fn try_location(&self, url: &str) -> Result<BridgeIdentity> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http("description", e))?;
        let body = resp
            .text()
            .await
            .map_err(|e| Error::http("description", e))?;
        parse_description(&body, &self.product_name)
    }
}

impl DiscoveryStrategy for LocalDiscoverer {
    fn name(&self) -> &'static str {
        "ssdp"
    }

    fn attempt(&self) -> BoxFuture<'_, Result<BridgeIdentity>> {
        self.discover().boxed()
    }
}

/// Size and sender of a reply, or `None` when the read failed and the search
/// should stop.
fn reply_received(read: std::io::Result<(usize, SocketAddr)>) -> Option<(usize, SocketAddr)> {
    match read {
        Ok(received) => Some(received),
        Err(e) => {
            debug!("ssdp receive failed: {e}");
            None
        }
    }
}

/// One HTTP-style message from an SSDP reply.
#[derive(Debug)]
struct SsdpMessage<'a> {
    status: &'a str,
    headers: Vec<(&'a str, &'a str)>,
}

impl<'a> SsdpMessage<'a> {
    /// Header lookup ignoring case, first occurrence wins.
    fn header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

/// Splits a datagram into its messages, dropping those without a status
/// line or without any header.
fn parse_datagram(datagram: &[u8]) -> Vec<SsdpMessage<'_>> {
    let Ok(text) = std::str::from_utf8(datagram) else {
        return Vec::new();
    };

    text.split("\r\n\r\n")
        .filter_map(|block| {
            let mut lines = block.lines();
            let status = lines.next()?.trim();
            if status.is_empty() {
                return None;
            }
            let headers: Vec<(&str, &str)> = lines
                .filter_map(|line| line.split_once(':'))
                .map(|(key, value)| (key.trim(), value.trim()))
                .collect();
            if headers.is_empty() {
                return None;
            }
            Some(SsdpMessage { status, headers })
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeviceDescription {
    #[serde(rename = "URLBase")]
    url_base: String,
    device: Device,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Device {
    #[serde(rename = "modelDescription")]
    model_description: String,
    #[serde(rename = "modelName")]
    model_name: String,
    #[serde(rename = "serialNumber")]
    serial_number: String,
}

/// Checks a UPnP device description and extracts the bridge identity.
///
/// The description must carry a `URLBase` and name `product` in either the
/// model description or the model name.
pub(crate) fn parse_description(xml: &str, product: &str) -> Result<BridgeIdentity> {
    let desc: DeviceDescription = quick_xml::de::from_str(xml).map_err(Error::Xml)?;

    if desc.url_base.is_empty() {
        return Err(Error::BadResponse("description has no URLBase".into()));
    }
    let device = &desc.device;
    if !device.model_description.contains(product) && !device.model_name.contains(product) {
        return Err(Error::BadResponse(format!(
            "not a {product} device: {:?}",
            device.model_name
        )));
    }

    Ok(BridgeIdentity::new(&device.serial_number, &desc.url_base))
}
