//! Groups of lights configured on a bridge.

use std::collections::HashMap;

use log::{debug, info};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::bridge::Bridge;
use crate::errors::Error;
use crate::lights::{Light, by_id};
use crate::state::State;
use crate::status::LightState;

type Result<T> = std::result::Result<T, Error>;

/// Groups API of a paired bridge, obtained from [`Bridge::groups`].
#[derive(Debug, Clone, Copy)]
pub struct GroupsService<'a> {
    bridge: &'a Bridge,
}

impl<'a> GroupsService<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self { bridge }
    }

    /// All groups on the bridge, ordered by id.
    pub async fn list(&self) -> Result<Vec<Group>> {
        let mut groups: Vec<Group> = self.id_map().await?.into_values().collect();
        groups.sort_by(|a, b| by_id(&a.id, &b.id));
        Ok(groups)
    }

    /// The first group whose name matches exactly.
    pub async fn get(&self, name: &str) -> Result<Group> {
        self.list()
            .await?
            .into_iter()
            .find(|g| g.name == name)
            .ok_or_else(|| Error::GroupNotFound(name.to_string()))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Group> {
        self.id_map()
            .await?
            .remove(id)
            .ok_or_else(|| Error::GroupNotFound(id.to_string()))
    }

    /// Creates a group holding the given lights and returns its id.
    pub async fn create(&self, name: &str, light_ids: &[&str]) -> Result<String> {
        let body = json!({ "name": name, "lights": light_ids });
        let resp: Value = self
            .bridge
            .call_json(Method::POST, Some(&body), &["groups"])
            .await?;

        let id = resp
            .as_array()
            .and_then(|entries| entries.first())
            .and_then(|first| first.pointer("/success/id"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::BadResponse(resp.to_string()))?;

        info!("created group {name:?} with id {id}");
        Ok(id.to_string())
    }

    async fn id_map(&self) -> Result<HashMap<String, Group>> {
        let records: HashMap<String, GroupRecord> =
            self.bridge.call_json(Method::GET, None, &["groups"]).await?;
        debug!("bridge {} reports {} groups", self.bridge.id(), records.len());

        Ok(records
            .into_iter()
            .map(|(id, record)| {
                let group = Group::link(self.bridge, id.clone(), record);
                (id, group)
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct GroupRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    lights: Vec<String>,
    #[serde(default, rename = "type")]
    group_type: String,
    action: Option<LightState>,
}

/// A named set of lights that can be switched together.
#[derive(Debug, Clone)]
pub struct Group {
    bridge: Bridge,
    id: String,
    name: String,
    lights: Vec<String>,
    group_type: String,
    action: Option<LightState>,
}

impl Group {
    fn link(bridge: &Bridge, id: String, record: GroupRecord) -> Self {
        Group {
            bridge: bridge.clone(),
            id,
            name: record.name,
            lights: record.lights,
            group_type: record.group_type,
            action: record.action,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ids of the member lights.
    pub fn light_ids(&self) -> &[String] {
        &self.lights
    }

    /// e.g. `LightGroup`, `Room` or `Luminaire`.
    pub fn group_type(&self) -> &str {
        &self.group_type
    }

    /// The last action applied to the whole group.
    pub fn action(&self) -> Option<&LightState> {
        self.action.as_ref()
    }

    pub async fn rename(&mut self, name: &str) -> Result<()> {
        let body = json!({ "name": name });
        self.bridge
            .call(Method::PUT, Some(&body), &["groups", self.id.as_str()])
            .await?;
        self.name = name.to_string();
        Ok(())
    }

    /// Replaces the member lights.
    pub async fn set_lights(&mut self, light_ids: &[&str]) -> Result<()> {
        let body = json!({ "lights": light_ids });
        self.bridge
            .call(Method::PUT, Some(&body), &["groups", self.id.as_str()])
            .await?;
        self.lights = light_ids.iter().map(|id| id.to_string()).collect();
        Ok(())
    }

    /// Applies a state update to every light in the group.
    pub async fn set(&mut self, state: &State) -> Result<()> {
        if !state.is_valid() {
            return Err(Error::NoAttribute);
        }
        let body = serde_json::to_value(state).map_err(Error::JsonDump)?;
        self.bridge
            .call(
                Method::PUT,
                Some(&body),
                &["groups", self.id.as_str(), "action"],
            )
            .await?;
        self.action.get_or_insert_with(LightState::default).apply(state);
        Ok(())
    }

    pub async fn on(&mut self) -> Result<()> {
        let mut state = State::new();
        state.on(true);
        self.set(&state).await
    }

    pub async fn off(&mut self) -> Result<()> {
        let mut state = State::new();
        state.on(false);
        self.set(&state).await
    }

    /// Switches the group based on its last known action.
    pub async fn toggle(&mut self) -> Result<()> {
        if self.action.as_ref().is_some_and(|a| a.on) {
            self.off().await
        } else {
            self.on().await
        }
    }

    /// Removes the group from the bridge. The lights themselves are kept.
    pub async fn delete(self) -> Result<()> {
        self.bridge
            .call(Method::DELETE, None, &["groups", self.id.as_str()])
            .await?;
        info!("deleted group {}", self.id);
        Ok(())
    }

    /// Resolves the member lights, skipping ids the bridge no longer knows.
    pub async fn lights(&self) -> Result<Vec<Light>> {
        let members: Vec<Light> = self
            .bridge
            .lights()
            .list()
            .await?
            .into_iter()
            .filter(|l| self.lights.iter().any(|id| id == l.id()))
            .collect();
        if members.len() < self.lights.len() {
            debug!(
                "group {} lists {} lights, bridge knows {}",
                self.id,
                self.lights.len(),
                members.len()
            );
        }
        Ok(members)
    }
}
