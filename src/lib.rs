//! # hue_bridge_rs
//!
//! An async Rust client for Philips Hue bridges.
//!
//! This crate finds a bridge on your network, pairs with it, and controls the
//! lights and groups it manages through the bridge's JSON API. The paired
//! bridge is remembered in a small cache file so later runs skip discovery.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hue_bridge_rs::{Brightness, Color, State};
//!
//! async fn lights_up() -> Result<(), hue_bridge_rs::Error> {
//!     // Cached bridge if there is one, otherwise SSDP then the remote lookup
//!     let mut bridge = hue_bridge_rs::discover().await?;
//!
//!     // Press the link button on the bridge first
//!     if !bridge.is_paired() {
//!         bridge.pair().await?;
//!     }
//!
//!     let mut lamp = bridge.lights().get("Desk").await?;
//!     let mut state = State::new();
//!     state
//!         .on(true)
//!         .brightness(&Brightness::from_percent(80))
//!         .color(&Color::rgb(255, 140, 0));
//!     lamp.set(&state).await?;
//!
//!     bridge.groups().get("Living room").await?.off().await
//! }
//! ```
//!
//! ## Features
//!
//! - **Discovery**: cache, then SSDP multicast search, then the vendor lookup
//!   service, via [`Discoverer`] and pluggable [`DiscoveryStrategy`]s
//! - **Pairing**: link-button authentication with [`Bridge::pair`]; the
//!   result is stored by [`CacheStore`]
//! - **Lights**: list, rename, switch and set state with [`Light`]
//! - **Groups**: create, modify, switch and delete [`Group`]s
//! - **State updates**: partial updates built with [`State`] from
//!   [`Brightness`], [`Color`], [`Xy`], [`HueSaturation`], [`Mired`],
//!   [`Effect`] and [`Alert`]
//!
//! ## Configuration
//!
//! [`DiscoveryConfig`] holds the multicast address, discovery deadline,
//! lookup URL, HTTP timeout and cache location. All of them have defaults.
//!
//! ## Feature Flags
//!
//! - `rustls-tls` (default): TLS for the remote lookup through rustls
//! - `native-tls`: TLS through the platform library

mod bridge;
mod cache;
mod config;
mod discovery;
mod errors;
mod groups;
mod identity;
mod lights;
mod pairing;
mod remote;
mod ssdp;
mod state;
mod status;
#[cfg(test)]
mod testing;
mod types;

// Re-export public API
pub use bridge::Bridge;
pub use cache::CacheStore;
pub use config::DiscoveryConfig;
pub use discovery::{Discoverer, DiscoveryStrategy, discover};
pub use errors::{ApiError, CacheError, Error};
pub use groups::{Group, GroupsService};
pub use identity::{BridgeIdentity, Discovered, PairedBridge};
pub use lights::{Light, LightsService};
pub use pairing::DEFAULT_APP_NAME;
pub use remote::RemoteDiscoverer;
pub use ssdp::LocalDiscoverer;
pub use state::State;
pub use status::LightState;
pub use types::{Alert, Brightness, Color, ColorMode, Effect, HueSaturation, Mired, Xy};
