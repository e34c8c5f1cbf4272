//! The bridge client: URL construction, the request helper and pairing.

use log::{debug, info};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::cache::CacheStore;
use crate::config::DiscoveryConfig;
use crate::errors::{ApiError, Error};
use crate::groups::GroupsService;
use crate::identity::{BridgeIdentity, Discovered, PairedBridge};
use crate::lights::LightsService;
use crate::pairing;

type Result<T> = std::result::Result<T, Error>;

/// A handle to one Hue bridge.
///
/// Cloning is cheap; the underlying HTTP connection pool is shared. Lights
/// and groups returned by the services keep their own clone so they can
/// issue requests on their own.
///
/// # Example
///
/// ```
/// use hue_bridge_rs::{Bridge, BridgeIdentity};
///
/// let bridge = Bridge::new(BridgeIdentity::new("00178829da0d", "http://192.168.1.2"));
/// assert_eq!(bridge.address(), "http://192.168.1.2/");
/// assert!(!bridge.is_paired());
/// ```
#[derive(Debug, Clone)]
pub struct Bridge {
    identity: BridgeIdentity,
    username: Option<String>,
    http: reqwest::Client,
    cache: CacheStore,
}

impl Bridge {
    /// An unpaired bridge using the default HTTP timeout and the `~/.hue`
    /// cache.
    pub fn new(identity: BridgeIdentity) -> Self {
        Bridge {
            identity,
            username: None,
            http: DiscoveryConfig::default().http_client_or_default(),
            cache: CacheStore::in_home_dir(DiscoveryConfig::CACHE_FILE),
        }
    }

    /// A bridge for a record that was paired earlier.
    pub fn from_paired(paired: PairedBridge) -> Self {
        let username = Some(paired.username().to_string()).filter(|u| !u.is_empty());
        Bridge {
            username,
            ..Bridge::new(paired.into_identity())
        }
    }

    /// A bridge for whatever discovery returned.
    pub fn from_discovered(discovered: Discovered) -> Self {
        match discovered {
            Discovered::Cached(paired) => Bridge::from_paired(paired),
            Discovered::Found { identity, .. } => Bridge::new(identity),
        }
    }

    /// Use `http` for every request instead of the default client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Store the paired record in `cache` instead of `~/.hue`.
    pub fn with_cache(mut self, cache: CacheStore) -> Self {
        self.cache = cache;
        self
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

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_paired(&self) -> bool {
        self.username.is_some()
    }

    /// The paired record, if pairing has happened.
    pub fn paired(&self) -> Option<PairedBridge> {
        self.username
            .as_ref()
            .map(|u| PairedBridge::new(self.identity.clone(), u.clone()))
    }

    /// Authenticates with the bridge under the default application name.
    ///
    /// The link button on the bridge must have been pressed shortly before.
    pub async fn pair(&mut self) -> Result<PairedBridge> {
        self.pair_as(pairing::DEFAULT_APP_NAME).await
    }

    /// Authenticates with the bridge as `app_name`.
    ///
    /// On success the bridge becomes paired and the record is written to the
    /// cache before it is returned. If the link button was not pressed the
    /// bridge answers with [`Error::Api`] of type
    /// [`ApiError::LINK_BUTTON_NOT_PRESSED`].
    pub async fn pair_as(&mut self, app_name: &str) -> Result<PairedBridge> {
        let device = pairing::local_device_label()?;
        self.pair_with_device(app_name, &device).await
    }

    pub(crate) async fn pair_with_device(
        &mut self,
        app_name: &str,
        device: &str,
    ) -> Result<PairedBridge> {
        let body = json!({ "devicetype": pairing::device_type(app_name, device) });
        let resp = self.call(Method::POST, Some(&body), &[]).await?;
        let username = pairing::parse_username(&resp)?;

        info!("paired with bridge {}", self.identity);
        self.username = Some(username.clone());
        let paired = PairedBridge::new(self.identity.clone(), username);
        self.cache.save(&paired);
        Ok(paired)
    }

    /// Access the lights known to this bridge.
    pub fn lights(&self) -> LightsService<'_> {
        LightsService::new(self)
    }

    /// Access the groups configured on this bridge.
    pub fn groups(&self) -> GroupsService<'_> {
        GroupsService::new(self)
    }

    /// Builds an API URL from path tokens:
    ///
    /// ```text
    /// addr([])              => <address>api
    /// addr(["lights"])      => <address>api/<username>/lights
    /// addr(["lights", "1"]) => <address>api/<username>/lights/1
    /// ```
    pub(crate) fn addr(&self, tokens: &[&str]) -> String {
        let mut url = format!("{}api", self.identity.address());
        if tokens.is_empty() {
            return url;
        }
        url.push('/');
        url.push_str(self.username.as_deref().unwrap_or_default());
        for token in tokens {
            url.push('/');
            url.push_str(token);
        }
        url
    }

    /// Calls the API at the URL named by `tokens` and returns the raw body.
    ///
    /// The body must be JSON. A bridge error payload is turned into
    /// [`Error::Api`].
    pub(crate) async fn call(
        &self,
        method: Method,
        body: Option<&Value>,
        tokens: &[&str],
    ) -> Result<Vec<u8>> {
        if !tokens.is_empty() && self.username.is_none() {
            return Err(Error::NotPaired);
        }

        let url = self.addr(tokens);
        debug!("{method} {url}");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = request.send().await.map_err(|e| Error::http("send", e))?;
        let bytes = resp.bytes().await.map_err(|e| Error::http("read", e))?;

        check_api_error(&bytes)?;
        Ok(bytes.to_vec())
    }

    /// Like [`Bridge::call`], deserializing the body into `T`.
    pub(crate) async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        body: Option<&Value>,
        tokens: &[&str],
    ) -> Result<T> {
        let resp = self.call(method, body, tokens).await?;
        serde_json::from_slice(&resp).map_err(Error::JsonLoad)
    }
}

/// Fails with the first error entry if the bridge answered with one.
///
/// A body that is not JSON, or an error entry that cannot be decoded, is
/// [`Error::BadResponse`] carrying the raw body.
fn check_api_error(body: &[u8]) -> Result<()> {
    let bad = || Error::BadResponse(String::from_utf8_lossy(body).into_owned());
    let value: Value = serde_json::from_slice(body).map_err(|_| bad())?;
    let Some(entry) = value
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(|first| first.get("error"))
    else {
        return Ok(());
    };

    let err: ApiError = serde_json::from_value(entry.clone()).map_err(|_| bad())?;
    if err.code != 0 {
        return Err(Error::Api(err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeServer;

    fn paired_bridge(address: &str) -> Bridge {
        Bridge::from_paired(PairedBridge::new(
            BridgeIdentity::new("bridge_id", address),
            "user",
        ))
    }

    #[test]
    fn test_addr() {
        let b = paired_bridge("http://1.2.3.4/");
        assert_eq!(b.addr(&[]), "http://1.2.3.4/api");
        assert_eq!(b.addr(&["a"]), "http://1.2.3.4/api/user/a");
        assert_eq!(b.addr(&["a", "b", "c"]), "http://1.2.3.4/api/user/a/b/c");
    }

    #[test]
    fn test_from_paired_with_empty_username() {
        let b = Bridge::from_paired(PairedBridge::new(BridgeIdentity::new("id", "http://h"), ""));
        assert!(!b.is_paired());
        assert!(b.paired().is_none());
    }

    #[test]
    fn test_check_api_error() {
        assert!(check_api_error(br#"{"some": "message"}"#).is_ok());
        assert!(check_api_error(br#"[{"some": "message"},{"some": "message"}]"#).is_ok());
        assert!(check_api_error(br#"[]"#).is_ok());
        assert!(matches!(
            check_api_error(b"not json"),
            Err(Error::BadResponse(raw)) if raw == "not json"
        ));
        assert!(matches!(
            check_api_error(br#"[{"error": {"description": "oops"}}]"#),
            Err(Error::BadResponse(_))
        ));

        let err = check_api_error(
            br#"[{"error": {"type":101,"address":"a/b/c","description":"blah"}}]"#,
        )
        .unwrap_err();
        match err {
            Error::Api(api) => assert_eq!(
                api,
                ApiError {
                    code: 101,
                    address: "a/b/c".into(),
                    description: "blah".into(),
                }
            ),
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_passes_body_through() {
        let srv = FakeServer::with_body(r#"[{"some": "message"},{"some": "message"}]"#).await;
        let b = Bridge::new(BridgeIdentity::new("id", &srv.base_url));

        let msg = b.call(Method::GET, None, &[]).await.unwrap();
        assert_eq!(msg, br#"[{"some": "message"},{"some": "message"}]"#);
        assert_eq!(srv.last_request().path, "/api");
    }

    #[tokio::test]
    async fn test_call_reports_api_error() {
        let srv = FakeServer::with_body(
            r#"[{"error": {"type":3,"address":"/lights/9","description":"not available"}}]"#,
        )
        .await;
        let b = paired_bridge(&srv.base_url);

        let err = b.call(Method::GET, None, &["lights", "9"]).await.unwrap_err();
        assert_eq!(err.api_code(), Some(3));
        assert_eq!(srv.last_request().path, "/api/user/lights/9");
    }

    #[tokio::test]
    async fn test_call_requires_pairing_for_resources() {
        let b = Bridge::new(BridgeIdentity::new("id", "http://127.0.0.1:9/"));
        let err = b.call(Method::GET, None, &["lights"]).await.unwrap_err();
        assert!(matches!(err, Error::NotPaired));
    }

    #[tokio::test]
    async fn test_pair_caches_username() {
        let srv = FakeServer::with_body(r#"[{"success":{"username":"issued-user"}}]"#).await;
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::at(dir.path().join(".hue"));
        let mut b = Bridge::new(BridgeIdentity::new("bridge_id", &srv.base_url))
            .with_cache(cache.clone());

        let paired = b.pair_as("test-app").await.unwrap();
        assert_eq!(paired.username(), "issued-user");
        assert!(b.is_paired());
        assert_eq!(b.username(), Some("issued-user"));
        assert_eq!(cache.load(), Some(paired));

        let req = srv.last_request();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/api");
        let devicetype = req.json()["devicetype"].as_str().unwrap().to_string();
        assert!(devicetype.starts_with("test-app#"));
    }

    #[tokio::test]
    async fn test_pair_truncates_labels() {
        let srv = FakeServer::with_body(r#"[{"success":{"username":"u"}}]"#).await;
        let dir = tempfile::tempdir().unwrap();
        let mut b = Bridge::new(BridgeIdentity::new("id", &srv.base_url))
            .with_cache(CacheStore::at(dir.path().join(".hue")));

        b.pair_with_device("an-application-label-over-limit", "some-very-long-host-linux")
            .await
            .unwrap();

        assert_eq!(
            srv.last_request().json(),
            json!({"devicetype": "an-application-label#some-very-long-host"})
        );
    }

    #[tokio::test]
    async fn test_pair_link_button_not_pressed() {
        let srv = FakeServer::with_body(
            r#"[{"error":{"type":101,"address":"","description":"link button not pressed"}}]"#,
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::at(dir.path().join(".hue"));
        let mut b = Bridge::new(BridgeIdentity::new("id", &srv.base_url)).with_cache(cache.clone());

        let err = b.pair_as("app").await.unwrap_err();
        assert_eq!(err.api_code(), Some(ApiError::LINK_BUTTON_NOT_PRESSED));
        assert!(!b.is_paired());
        assert!(cache.load().is_none());
    }

    #[tokio::test]
    async fn test_pair_empty_response() {
        let srv = FakeServer::with_body("[]").await;
        let dir = tempfile::tempdir().unwrap();
        let mut b = Bridge::new(BridgeIdentity::new("id", &srv.base_url))
            .with_cache(CacheStore::at(dir.path().join(".hue")));

        let err = b.pair_as("app").await.unwrap_err();
        assert!(matches!(err, Error::BadResponse(raw) if raw == "[]"));
    }

    #[tokio::test]
    async fn test_pair_malformed_replies_keep_body() {
        for reply in [
            "<html>404 Not Found</html>",
            r#"[{"error":{"description":"oops"}}]"#,
            r#"[{"success":{}}]"#,
        ] {
            let srv = FakeServer::with_body(reply).await;
            let dir = tempfile::tempdir().unwrap();
            let cache = CacheStore::at(dir.path().join(".hue"));
            let mut b =
                Bridge::new(BridgeIdentity::new("id", &srv.base_url)).with_cache(cache.clone());

            let err = b.pair_as("app").await.unwrap_err();
            assert!(matches!(&err, Error::BadResponse(raw) if raw == reply), "{err:?}");
            assert!(!b.is_paired());
            assert!(cache.load().is_none());
        }
    }
}
