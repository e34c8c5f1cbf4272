//! Lights attached to a bridge.

use std::collections::HashMap;

use futures::future::try_join_all;
use log::debug;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use crate::bridge::Bridge;
use crate::errors::Error;
use crate::state::State;
use crate::status::LightState;
use crate::types::{Alert, Brightness, Color, Effect, HueSaturation, Mired, Xy};

type Result<T> = std::result::Result<T, Error>;

/// Lights API of a paired bridge, obtained from [`Bridge::lights`].
#[derive(Debug, Clone, Copy)]
pub struct LightsService<'a> {
    bridge: &'a Bridge,
}

impl<'a> LightsService<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self { bridge }
    }

    /// All lights known to the bridge, ordered by id.
    pub async fn list(&self) -> Result<Vec<Light>> {
        let mut lights: Vec<Light> = self.id_map().await?.into_values().collect();
        lights.sort_by(|a, b| by_id(&a.id, &b.id));
        Ok(lights)
    }

    /// The light with the given bridge id.
    pub async fn get_by_id(&self, id: &str) -> Result<Light> {
        self.id_map()
            .await?
            .remove(id)
            .ok_or_else(|| Error::LightNotFound(id.to_string()))
    }

    /// The first light whose name matches exactly.
    pub async fn get(&self, name: &str) -> Result<Light> {
        self.list()
            .await?
            .into_iter()
            .find(|l| l.name == name)
            .ok_or_else(|| Error::LightNotFound(name.to_string()))
    }

    /// Asks the bridge to search for new lights.
    ///
    /// The search runs on the bridge for about a minute; new lights show up
    /// in [`LightsService::list`] afterwards.
    pub async fn scan(&self) -> Result<()> {
        self.bridge.call(Method::POST, None, &["lights"]).await?;
        Ok(())
    }

    /// Turns every light on.
    pub async fn on(&self) -> Result<()> {
        let mut lights = self.list().await?;
        try_join_all(lights.iter_mut().map(|l| l.on())).await?;
        Ok(())
    }

    /// Turns every light off.
    pub async fn off(&self) -> Result<()> {
        let mut lights = self.list().await?;
        try_join_all(lights.iter_mut().map(|l| l.off())).await?;
        Ok(())
    }

    /// Flips every light based on its reported state.
    pub async fn toggle(&self) -> Result<()> {
        let mut lights = self.list().await?;
        try_join_all(lights.iter_mut().map(|l| l.toggle())).await?;
        Ok(())
    }

    async fn id_map(&self) -> Result<HashMap<String, Light>> {
        let records: HashMap<String, LightRecord> =
            self.bridge.call_json(Method::GET, None, &["lights"]).await?;
        debug!("bridge {} reports {} lights", self.bridge.id(), records.len());

        Ok(records
            .into_iter()
            .map(|(id, record)| {
                let light = Light::link(self.bridge, id.clone(), record);
                (id, light)
            })
            .collect())
    }
}

/// Numeric ids in numeric order, anything else after them.
pub(crate) fn by_id(a: &str, b: &str) -> std::cmp::Ordering {
    (a.len(), a).cmp(&(b.len(), b))
}

#[derive(Debug, Deserialize)]
struct LightRecord {
    #[serde(default, rename = "uniqueid")]
    unique_id: String,
    #[serde(default, rename = "swversion")]
    sw_version: String,
    #[serde(default)]
    state: LightState,
    #[serde(default, rename = "type")]
    light_type: String,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "modelid")]
    model_id: String,
    #[serde(default, rename = "manufacturername")]
    manufacturer_name: String,
}

/// A single light, as last reported by the bridge.
///
/// Methods that change the light also update the local copy, so
/// [`Light::toggle`] works on what this value last saw.
#[derive(Debug, Clone)]
pub struct Light {
    bridge: Bridge,
    id: String,
    unique_id: String,
    sw_version: String,
    state: LightState,
    light_type: String,
    name: String,
    model_id: String,
    manufacturer_name: String,
}

impl Light {
    fn link(bridge: &Bridge, id: String, record: LightRecord) -> Self {
        Light {
            bridge: bridge.clone(),
            id,
            unique_id: record.unique_id,
            sw_version: record.sw_version,
            state: record.state,
            light_type: record.light_type,
            name: record.name,
            model_id: record.model_id,
            manufacturer_name: record.manufacturer_name,
        }
    }

    /// The id the bridge uses for this light.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// MAC address with endpoint, e.g. `AA:BB:CC:DD:EE:FF:00:11-XX`.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn sw_version(&self) -> &str {
        &self.sw_version
    }

    pub fn state(&self) -> &LightState {
        &self.state
    }

    /// Fixed name describing the kind of light, e.g. `Extended color light`.
    pub fn light_type(&self) -> &str {
        &self.light_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn manufacturer_name(&self) -> &str {
        &self.manufacturer_name
    }

    pub async fn on(&mut self) -> Result<()> {
        self.switch(true).await
    }

    pub async fn off(&mut self) -> Result<()> {
        self.switch(false).await
    }

    pub async fn toggle(&mut self) -> Result<()> {
        self.switch(!self.state.on).await
    }

    async fn switch(&mut self, on: bool) -> Result<()> {
        let body = json!({ "on": on });
        self.bridge
            .call(Method::PUT, Some(&body), &["lights", self.id.as_str(), "state"])
            .await?;
        self.state.on = on;
        Ok(())
    }

    /// Sets the name by which this light can be addressed.
    pub async fn rename(&mut self, name: &str) -> Result<()> {
        let body = json!({ "name": name });
        self.bridge
            .call(Method::PUT, Some(&body), &["lights", self.id.as_str()])
            .await?;
        self.name = name.to_string();
        Ok(())
    }

    /// Sends a state update, then reloads the light from the bridge.
    ///
    /// Fails with [`Error::NoAttribute`] if the state changes nothing.
    pub async fn set(&mut self, state: &State) -> Result<()> {
        if !state.is_valid() {
            return Err(Error::NoAttribute);
        }
        let body = serde_json::to_value(state).map_err(Error::JsonDump)?;
        self.bridge
            .call(Method::PUT, Some(&body), &["lights", self.id.as_str(), "state"])
            .await?;
        self.refresh().await
    }

    /// Reloads this light from the bridge.
    pub async fn refresh(&mut self) -> Result<()> {
        let record: LightRecord = self
            .bridge
            .call_json(Method::GET, None, &["lights", self.id.as_str()])
            .await?;
        let id = std::mem::take(&mut self.id);
        *self = Light::link(&self.bridge, id, record);
        Ok(())
    }

    pub async fn set_brightness(&mut self, brightness: &Brightness) -> Result<()> {
        self.set(&State::from(brightness)).await
    }

    pub async fn set_color(&mut self, color: &Color) -> Result<()> {
        self.set(&State::from(color)).await
    }

    pub async fn set_xy(&mut self, xy: &Xy) -> Result<()> {
        let mut state = State::new();
        state.xy(xy);
        self.set(&state).await
    }

    pub async fn set_hue_saturation(&mut self, hs: &HueSaturation) -> Result<()> {
        let mut state = State::new();
        state.hue_saturation(hs);
        self.set(&state).await
    }

    pub async fn set_color_temperature(&mut self, ct: &Mired) -> Result<()> {
        self.set(&State::from(ct)).await
    }

    pub async fn set_effect(&mut self, effect: Effect) -> Result<()> {
        self.set(&State::from(&effect)).await
    }

    pub async fn set_alert(&mut self, alert: Alert) -> Result<()> {
        self.set(&State::from(&alert)).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::identity::{BridgeIdentity, PairedBridge};
    use crate::testing::FakeServer;

    pub(crate) const LIGHTS: &str = r#"{
        "1": {
            "state": {"on": true, "bri": 144, "hue": 13088, "sat": 212,
                      "xy": [0.5128, 0.4147], "ct": 467, "alert": "none",
                      "effect": "none", "colormode": "xy", "reachable": true},
            "type": "Extended color light",
            "name": "Hue Lamp 1",
            "modelid": "LCT001",
            "manufacturername": "Philips",
            "uniqueid": "00:17:88:01:00:bd:c7:b9-0b",
            "swversion": "66009461"
        },
        "2": {
            "state": {"on": false, "bri": 0, "alert": "none", "reachable": true},
            "type": "Dimmable light",
            "name": "Hallway",
            "modelid": "LWB004",
            "swversion": "66012040"
        },
        "10": {
            "state": {"on": false, "reachable": false},
            "name": "Porch"
        }
    }"#;

    pub(crate) const LIGHT_1: &str = r#"{
        "state": {"on": true, "bri": 60, "alert": "none", "effect": "colorloop",
                  "colormode": "hs", "reachable": true},
        "type": "Extended color light",
        "name": "Hue Lamp 1",
        "modelid": "LCT001",
        "uniqueid": "00:17:88:01:00:bd:c7:b9-0b",
        "swversion": "66009461"
    }"#;

    pub(crate) fn bridge_at(server: &FakeServer) -> Bridge {
        Bridge::from_paired(PairedBridge::new(
            BridgeIdentity::new("bridge_id", &server.base_url),
            "user",
        ))
    }

    /// Serves the light list on GET and a success array on anything else.
    async fn fake_bridge() -> FakeServer {
        FakeServer::start(|method, path| match (method.as_str(), path) {
            ("GET", "/api/user/lights") => LIGHTS.to_string(),
            ("GET", "/api/user/lights/1") => LIGHT_1.to_string(),
            _ => r#"[{"success":{}}]"#.to_string(),
        })
        .await
    }

    #[tokio::test]
    async fn test_list_links_ids() {
        let server = fake_bridge().await;
        let bridge = bridge_at(&server);

        let lights = bridge.lights().list().await.unwrap();
        let ids: Vec<&str> = lights.iter().map(|l| l.id()).collect();
        assert_eq!(ids, ["1", "2", "10"]);

        let lamp = &lights[0];
        assert_eq!(lamp.name(), "Hue Lamp 1");
        assert_eq!(lamp.light_type(), "Extended color light");
        assert_eq!(lamp.unique_id(), "00:17:88:01:00:bd:c7:b9-0b");
        assert_eq!(lamp.manufacturer_name(), "Philips");
        assert!(lamp.state().on);

        assert_eq!(lights[2].manufacturer_name(), "");
        assert!(!lights[2].state().reachable);
    }

    #[tokio::test]
    async fn test_get_by_name_and_id() {
        let server = fake_bridge().await;
        let bridge = bridge_at(&server);

        let hallway = bridge.lights().get("Hallway").await.unwrap();
        assert_eq!(hallway.id(), "2");
        assert_eq!(hallway.model_id(), "LWB004");

        let porch = bridge.lights().get_by_id("10").await.unwrap();
        assert_eq!(porch.name(), "Porch");
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = fake_bridge().await;
        let bridge = bridge_at(&server);

        let err = bridge.lights().get("Kitchen").await.unwrap_err();
        assert_eq!(err, Error::LightNotFound("Kitchen".into()));

        let err = bridge.lights().get_by_id("7").await.unwrap_err();
        assert_eq!(err, Error::LightNotFound("7".into()));
    }

    #[tokio::test]
    async fn test_on_off_toggle() {
        let server = fake_bridge().await;
        let bridge = bridge_at(&server);
        let mut light = bridge.lights().get_by_id("2").await.unwrap();

        light.on().await.unwrap();
        let req = server.last_request();
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.path, "/api/user/lights/2/state");
        assert_eq!(req.json(), json!({"on": true}));
        assert!(light.state().on);

        light.toggle().await.unwrap();
        assert_eq!(server.last_request().json(), json!({"on": false}));
        assert!(!light.state().on);

        light.off().await.unwrap();
        assert_eq!(server.last_request().json(), json!({"on": false}));
    }

    #[tokio::test]
    async fn test_rename() {
        let server = fake_bridge().await;
        let bridge = bridge_at(&server);
        let mut light = bridge.lights().get_by_id("1").await.unwrap();

        light.rename("Desk").await.unwrap();
        let req = server.last_request();
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.path, "/api/user/lights/1");
        assert_eq!(req.json(), json!({"name": "Desk"}));
        assert_eq!(light.name(), "Desk");
    }

    #[tokio::test]
    async fn test_set_refreshes() {
        let server = fake_bridge().await;
        let bridge = bridge_at(&server);
        let mut light = bridge.lights().get_by_id("1").await.unwrap();

        light.set_effect(Effect::ColorLoop).await.unwrap();

        let requests = server.requests();
        let put = &requests[requests.len() - 2];
        assert_eq!(put.method, Method::PUT);
        assert_eq!(put.path, "/api/user/lights/1/state");
        assert_eq!(put.json(), json!({"effect": "colorloop"}));

        let get = server.last_request();
        assert_eq!(get.method, Method::GET);
        assert_eq!(get.path, "/api/user/lights/1");

        assert_eq!(light.id(), "1");
        assert_eq!(light.state().effect, Some(Effect::ColorLoop));
        assert_eq!(light.state().bri, Some(60));
    }

    #[tokio::test]
    async fn test_set_empty_state() {
        let server = fake_bridge().await;
        let bridge = bridge_at(&server);
        let mut light = bridge.lights().get_by_id("1").await.unwrap();
        let sent = server.requests().len();

        let err = light.set(&State::new()).await.unwrap_err();
        assert_eq!(err, Error::NoAttribute);
        assert_eq!(server.requests().len(), sent);
    }

    #[tokio::test]
    async fn test_all_off() {
        let server = fake_bridge().await;
        let bridge = bridge_at(&server);

        bridge.lights().off().await.unwrap();

        let mut paths: Vec<String> = server
            .requests()
            .into_iter()
            .filter(|r| r.method == Method::PUT)
            .map(|r| {
                assert_eq!(r.json(), json!({"on": false}));
                r.path
            })
            .collect();
        paths.sort();
        assert_eq!(
            paths,
            [
                "/api/user/lights/1/state",
                "/api/user/lights/10/state",
                "/api/user/lights/2/state"
            ]
        );
    }

    #[tokio::test]
    async fn test_scan() {
        let server = fake_bridge().await;
        let bridge = bridge_at(&server);

        bridge.lights().scan().await.unwrap();
        let req = server.last_request();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/api/user/lights");
    }

    #[tokio::test]
    async fn test_unauthorized_user() {
        let server = FakeServer::with_body(
            r#"[{"error":{"type":1,"address":"/lights","description":"unauthorized user"}}]"#,
        )
        .await;
        let bridge = bridge_at(&server);

        let err = bridge.lights().list().await.unwrap_err();
        assert_eq!(err.api_code(), Some(1));
    }
}
