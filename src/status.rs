//! Light state as reported by the bridge.

use serde::{Deserialize, Serialize};

use crate::state::State;
use crate::types::{Alert, Brightness, ColorMode, Effect, HueSaturation, Mired, Xy};

/// The active state of a light, or the last action sent to a group.
///
/// Every field tolerates being absent: lights only report the attributes
/// they support, and group actions never report reachability.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LightState {
    #[serde(default)]
    pub on: bool,
    /// Brightness, 1 to 254.
    pub bri: Option<u8>,
    pub hue: Option<u16>,
    pub sat: Option<u8>,
    pub xy: Option<Xy>,
    /// Color temperature in mired.
    pub ct: Option<u16>,
    pub alert: Option<Alert>,
    pub effect: Option<Effect>,
    #[serde(rename = "colormode")]
    pub color_mode: Option<ColorMode>,
    #[serde(default)]
    pub reachable: bool,
}

impl LightState {
    pub fn brightness(&self) -> Option<Brightness> {
        self.bri.and_then(Brightness::create)
    }

    pub fn hue_saturation(&self) -> Option<HueSaturation> {
        match (self.hue, self.sat) {
            (Some(hue), Some(sat)) => HueSaturation::create(hue, sat),
            _ => None,
        }
    }

    pub fn color_temperature(&self) -> Option<Mired> {
        self.ct.and_then(Mired::create)
    }

    /// Applies the absolute attributes of a sent update to this state.
    pub(crate) fn apply(&mut self, update: &State) {
        if let Some(on) = update.on {
            self.on = on;
        }
        if update.bri.is_some() {
            self.bri = update.bri;
        }
        if update.hue.is_some() {
            self.hue = update.hue;
            self.color_mode = Some(ColorMode::Hs);
        }
        if update.sat.is_some() {
            self.sat = update.sat;
            self.color_mode = Some(ColorMode::Hs);
        }
        if update.xy.is_some() {
            self.xy = update.xy;
            self.color_mode = Some(ColorMode::Xy);
        }
        if update.ct.is_some() {
            self.ct = update.ct;
            self.color_mode = Some(ColorMode::Ct);
        }
        if update.alert.is_some() {
            self.alert = update.alert;
        }
        if update.effect.is_some() {
            self.effect = update.effect;
        }
    }
}
