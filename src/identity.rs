//! Bridge identity values produced by discovery and pairing.

use std::fmt;

/// A discovered bridge: its serial and the base URL of its API.
///
/// The address always ends with exactly one `/`, so resource paths can be
/// appended without checking.
///
/// # Examples
///
/// ```
/// use hue_bridge_rs::BridgeIdentity;
///
/// let a = BridgeIdentity::new("00178829da0d", "http://1.2.3.4");
/// let b = BridgeIdentity::new("00178829da0d", "http://1.2.3.4//");
/// assert_eq!(a.address(), "http://1.2.3.4/");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BridgeIdentity {
    id: String,
    address: String,
}

impl BridgeIdentity {
    pub fn new(id: impl Into<String>, address: impl AsRef<str>) -> Self {
        BridgeIdentity {
            id: id.into(),
            address: normalize_address(address.as_ref()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for BridgeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.id, self.address)
    }
}

/// A bridge together with the username it issued to this application.
///
/// An empty username means pairing has not happened yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedBridge {
    identity: BridgeIdentity,
    username: String,
}

impl PairedBridge {
    pub fn new(identity: BridgeIdentity, username: impl Into<String>) -> Self {
        PairedBridge {
            identity,
            username: username.into(),
        }
    }

    pub fn identity(&self) -> &BridgeIdentity {
        &self.identity
    }

    pub fn id(&self) -> &str {
        self.identity.id()
    }

    pub fn address(&self) -> &str {
        self.identity.address()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_paired(&self) -> bool {
        !self.username.is_empty()
    }

    pub fn into_identity(self) -> BridgeIdentity {
        self.identity
    }
}

/// Outcome of [`crate::Discoverer::discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovered {
    /// Read back from the cache file; no network traffic happened.
    Cached(PairedBridge),
    /// Found on the network by the named strategy; not paired yet.
    Found {
        identity: BridgeIdentity,
        strategy: &'static str,
    },
}

impl Discovered {
    pub fn identity(&self) -> &BridgeIdentity {
        match self {
            Discovered::Cached(paired) => paired.identity(),
            Discovered::Found { identity, .. } => identity,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Discovered::Cached(_))
    }
}

/// Appends a single trailing slash, collapsing any that were already there.
pub(crate) fn normalize_address(address: &str) -> String {
    let trimmed = address.trim().trim_end_matches('/');
    format!("{trimmed}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("http://1.2.3.4"), "http://1.2.3.4/");
        assert_eq!(normalize_address("http://1.2.3.4/"), "http://1.2.3.4/");
        assert_eq!(normalize_address("http://1.2.3.4///"), "http://1.2.3.4/");
        assert_eq!(normalize_address(" http://1.2.3.4/ \n"), "http://1.2.3.4/");
    }

    #[test]
    fn test_paired_state() {
        let identity = BridgeIdentity::new("id", "http://1.2.3.4");
        assert!(!PairedBridge::new(identity.clone(), "").is_paired());

        let paired = PairedBridge::new(identity, "user");
        assert!(paired.is_paired());
        assert_eq!(paired.address(), "http://1.2.3.4/");
    }

    #[test]
    fn test_discovered_identity() {
        let identity = BridgeIdentity::new("id", "http://1.2.3.4/");
        let found = Discovered::Found {
            identity: identity.clone(),
            strategy: "remote",
        };
        assert_eq!(found.identity(), &identity);
        assert!(!found.is_cached());

        let cached = Discovered::Cached(PairedBridge::new(identity.clone(), "user"));
        assert_eq!(cached.identity(), &identity);
        assert!(cached.is_cached());
    }
}
