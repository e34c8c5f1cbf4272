//! Link-button pairing helpers.

use serde::Deserialize;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Application label used by [`crate::Bridge::pair`].
pub const DEFAULT_APP_NAME: &str = "hue-bridge-rs";

const MAX_APP_LEN: usize = 20;
const MAX_DEVICE_LEN: usize = 19;

#[derive(Debug, Deserialize)]
struct PairResponse {
    success: Option<PairSuccess>,
}

#[derive(Debug, Deserialize)]
struct PairSuccess {
    #[serde(default)]
    username: String,
}

/// Builds the `devicetype` value, capping both halves to the bridge limits.
pub(crate) fn device_type(app: &str, device: &str) -> String {
    format!(
        "{}#{}",
        truncate(app, MAX_APP_LEN),
        truncate(device, MAX_DEVICE_LEN)
    )
}

/// `<hostname>-<os>` for the machine we are running on.
pub(crate) fn local_device_label() -> Result<String> {
    let host = hostname::get().map_err(Error::Hostname)?;
    Ok(format!(
        "{}-{}",
        host.to_string_lossy(),
        std::env::consts::OS
    ))
}

/// Pulls the issued username out of a pairing reply.
pub(crate) fn parse_username(body: &[u8]) -> Result<String> {
    let bad = || Error::BadResponse(String::from_utf8_lossy(body).into_owned());
    let resp: Vec<PairResponse> = serde_json::from_slice(body).map_err(|_| bad())?;
    match resp.first().and_then(|r| r.success.as_ref()) {
        Some(success) if !success.username.is_empty() => Ok(success.username.clone()),
        _ => Err(bad()),
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
