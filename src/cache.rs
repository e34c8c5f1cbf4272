//! On-disk cache of the paired bridge.
//!
//! The cache is a best-effort optimization: [`CacheStore::load`] and
//! [`CacheStore::save`] never fail, they log and carry on. The `try_*`
//! variants expose what actually happened.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::CacheError;
use crate::identity::{BridgeIdentity, PairedBridge};

type Result<T> = std::result::Result<T, CacheError>;

/// File format of the cache. Any change here breaks existing cache files.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "IP")]
    ip: String,
    #[serde(rename = "Username")]
    username: String,
}

impl From<&PairedBridge> for CacheRecord {
    fn from(bridge: &PairedBridge) -> Self {
        CacheRecord {
            id: bridge.id().to_string(),
            ip: bridge.address().to_string(),
            username: bridge.username().to_string(),
        }
    }
}

impl From<CacheRecord> for PairedBridge {
    fn from(record: CacheRecord) -> Self {
        PairedBridge::new(BridgeIdentity::new(record.id, record.ip), record.username)
    }
}

/// Location of the cached bridge record.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: Option<PathBuf>,
}

impl CacheStore {
    /// A cache file named `file_name` in the current user's home directory.
    ///
    /// If the home directory cannot be resolved the store has no path and
    /// behaves as a permanently empty cache.
    pub fn in_home_dir(file_name: &str) -> Self {
        CacheStore {
            path: dirs::home_dir().map(|home| home.join(file_name)),
        }
    }

    /// A cache file at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        CacheStore {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reads the cached bridge, returning `None` on any failure.
    pub fn load(&self) -> Option<PairedBridge> {
        match self.try_load() {
            Ok(bridge) => bridge,
            Err(e) => {
                warn!("could not retrieve cache: {e}");
                None
            }
        }
    }

    /// Reads the cached bridge.
    ///
    /// A missing file is `Ok(None)`; unreadable or malformed files are errors.
    pub fn try_load(&self) -> Result<Option<PairedBridge>> {
        let path = self.path.as_ref().ok_or(CacheError::NoHomeDir)?;
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: CacheRecord = serde_json::from_slice(&data)?;
        Ok(Some(record.into()))
    }

    /// Writes `bridge` to the cache, logging any failure.
    pub fn save(&self, bridge: &PairedBridge) {
        if let Err(e) = self.try_save(bridge) {
            warn!("could not cache: {e}");
        }
    }

    /// Writes `bridge` to the cache, overwriting any previous record.
    pub fn try_save(&self, bridge: &PairedBridge) -> Result<()> {
        let path = self.path.as_ref().ok_or(CacheError::NoHomeDir)?;
        let data = serde_json::to_vec(&CacheRecord::from(bridge))?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Removes the cache file. Returns `false` if there was nothing to remove.
    pub fn clear(&self) -> Result<bool> {
        let path = self.path.as_ref().ok_or(CacheError::NoHomeDir)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paired() -> PairedBridge {
        PairedBridge::new(BridgeIdentity::new("id", "http://1.2.3.4/"), "user")
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::at(dir.path().join(".hue-test"));

        store.save(&paired());
        assert_eq!(store.load(), Some(paired()));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::at(dir.path().join(".hue-test"));

        store.save(&paired());
        let other = PairedBridge::new(BridgeIdentity::new("other", "http://5.6.7.8"), "u2");
        store.save(&other);
        assert_eq!(store.load(), Some(other));
    }

    #[test]
    fn test_missing_file_is_silent_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::at(dir.path().join("does-not-exist"));

        assert!(store.try_load().unwrap().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_corrupt_file_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".hue-test");
        fs::write(&path, b"{not json").unwrap();
        let store = CacheStore::at(&path);

        assert!(matches!(store.try_load(), Err(CacheError::Json(_))));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".hue-test");
        let store = CacheStore::at(&path);
        store.try_save(&paired()).unwrap();

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"ID": "id", "IP": "http://1.2.3.4/", "Username": "user"})
        );
    }

    #[test]
    fn test_legacy_address_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".hue-test");
        fs::write(&path, br#"{"ID":"id","IP":"http://1.2.3.4","Username":"user"}"#).unwrap();

        assert_eq!(CacheStore::at(&path).load(), Some(paired()));
    }

    #[test]
    fn test_unwritable_location_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::at(dir.path().join("missing-dir").join(".hue"));

        assert!(matches!(store.try_save(&paired()), Err(CacheError::Io(_))));
        store.save(&paired());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_no_home_dir() {
        let store = CacheStore { path: None };
        assert!(matches!(store.try_load(), Err(CacheError::NoHomeDir)));
        assert!(store.load().is_none());
        store.save(&paired());
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::at(dir.path().join(".hue-test"));

        assert!(!store.clear().unwrap());
        store.save(&paired());
        assert!(store.clear().unwrap());
        assert!(store.load().is_none());
    }
}
