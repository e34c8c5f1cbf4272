use std::fmt;

use serde::Deserialize;

/// All error types that can occur when talking to a Hue bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No bridge could be found by any discovery method.
    #[error("no bridge was found")]
    NotFound,

    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The device description document was not valid XML.
    #[error("failed to load xml: {0}")]
    Xml(quick_xml::DeError),

    /// An HTTP request to the bridge or a lookup service failed.
    #[error("http {action} error: {err}")]
    Http { action: String, err: reqwest::Error },

    /// A UDP socket operation failed during local discovery.
    #[error("socket {action} error: {err:?}")]
    Socket { action: String, err: std::io::Error },

    /// The bridge answered with an error payload.
    #[error("bridge error: {0}")]
    Api(ApiError),

    /// The bridge answered with something that could not be interpreted.
    #[error("bad response: {0}")]
    BadResponse(String),

    /// A resource call was attempted before pairing with the bridge.
    #[error("bridge is not paired")]
    NotPaired,

    /// The requested light does not exist on the bridge.
    #[error("light {0:?} does not exist")]
    LightNotFound(String),

    /// The requested group does not exist on the bridge.
    #[error("group {0:?} does not exist")]
    GroupNotFound(String),

    /// The local hostname could not be read while building a device label.
    #[error("failed to read hostname: {0:?}")]
    Hostname(std::io::Error),

    /// Attempted to send a [`crate::State`] with no attributes set.
    #[error("invalid state; no attributes set")]
    NoAttribute,
}

impl Error {
    /// Create a new HTTP error
    pub fn http(action: &str, err: reqwest::Error) -> Self {
        Error::Http {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new socket error
    pub fn socket(action: &str, err: std::io::Error) -> Self {
        Error::Socket {
            action: action.to_string(),
            err,
        }
    }

    /// Returns the bridge error code, if this error came from the bridge.
    pub fn api_code(&self) -> Option<u16> {
        match self {
            Error::Api(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Detailed information about a failed API call, as reported by the bridge.
///
/// Type 101 means the link button was not pressed before pairing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub code: u16,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
}

impl ApiError {
    pub const UNAUTHORIZED_USER: u16 = 1;
    pub const LINK_BUTTON_NOT_PRESSED: u16 = 101;
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (type {})", self.description, self.code)?;
        if !self.address.is_empty() {
            write!(f, " at {}", self.address)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Failures of the on-disk bridge cache.
///
/// These never escape [`crate::CacheStore::load`] or
/// [`crate::CacheStore::save`]; they are logged and treated as a miss.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("could not resolve home directory")]
    NoHomeDir,

    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
