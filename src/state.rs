//! State update payload for Hue lights and groups.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Alert, Brightness, Color, Effect, HueSaturation, Mired, Xy};

/// A partial state update to send to a light or a group.
///
/// Only the attributes that were set are serialized, so a `State` can change
/// one attribute without touching the others.
///
/// # Creating States
///
/// 1. **From a single attribute** using the [`From`] trait:
///    ```
///    use hue_bridge_rs::{State, Effect};
///    let state = State::from(&Effect::ColorLoop);
///    assert!(state.is_valid());
///    ```
///
/// 2. **Builder pattern** for combining multiple attributes:
///    ```
///    use std::str::FromStr;
///    use hue_bridge_rs::{State, Brightness, Color};
///    let mut state = State::new();
///    state.brightness(&Brightness::create(200).unwrap());
///    state.color(&Color::from_str("255,128,0").unwrap());
///    ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct State {
    pub(crate) on: Option<bool>,
    pub(crate) bri: Option<u8>,
    pub(crate) hue: Option<u16>,
    pub(crate) sat: Option<u8>,
    pub(crate) xy: Option<Xy>,
    pub(crate) ct: Option<u16>,
    pub(crate) alert: Option<Alert>,
    pub(crate) effect: Option<Effect>,
    #[serde(rename = "transitiontime")]
    pub(crate) transition_time: Option<u16>,
    pub(crate) bri_inc: Option<i16>,
    pub(crate) sat_inc: Option<i16>,
    pub(crate) hue_inc: Option<i32>,
    pub(crate) ct_inc: Option<i32>,
    pub(crate) xy_inc: Option<[f64; 2]>,
}

impl State {
    /// Create a new empty state.
    ///
    /// At least one attribute must be set for the state to be valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::State;
    ///
    /// let state = State::new();
    /// assert_eq!(state.is_valid(), false);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this state changes at least one attribute.
    ///
    /// A transition time alone changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use hue_bridge_rs::State;
    ///
    /// let mut state = State::new();
    ///
    /// state.transition(Duration::from_secs(1));
    /// assert_eq!(state.is_valid(), false);
    ///
    /// state.on(true);
    /// assert_eq!(state.is_valid(), true);
    /// ```
    pub fn is_valid(&self) -> bool {
        self.on.is_some()
            || self.bri.is_some()
            || self.hue.is_some()
            || self.sat.is_some()
            || self.xy.is_some()
            || self.ct.is_some()
            || self.alert.is_some()
            || self.effect.is_some()
            || self.bri_inc.is_some()
            || self.sat_inc.is_some()
            || self.hue_inc.is_some()
            || self.ct_inc.is_some()
            || self.xy_inc.is_some()
    }

    /// Turn the light on or off.
    pub fn on(&mut self, on: bool) -> &mut Self {
        self.on = Some(on);
        self
    }

    /// Set the brightness level.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::{State, Brightness};
    ///
    /// let mut state = State::new();
    /// state.brightness(&Brightness::create(60).unwrap());
    /// assert_eq!(serde_json::to_string(&state).unwrap(), r#"{"bri":60}"#);
    /// ```
    pub fn brightness(&mut self, brightness: &Brightness) -> &mut Self {
        self.bri = Some(brightness.value);
        self
    }

    pub fn hue_saturation(&mut self, hs: &HueSaturation) -> &mut Self {
        self.hue = Some(hs.hue());
        self.sat = Some(hs.saturation());
        self
    }

    pub fn xy(&mut self, xy: &Xy) -> &mut Self {
        self.xy = Some(*xy);
        self
    }

    /// Set an RGB color, sent as its xy coordinates.
    pub fn color(&mut self, color: &Color) -> &mut Self {
        self.xy(&color.to_xy())
    }

    /// Set the color temperature.
    pub fn color_temperature(&mut self, ct: &Mired) -> &mut Self {
        self.ct = Some(ct.value);
        self
    }

    pub fn alert(&mut self, alert: Alert) -> &mut Self {
        self.alert = Some(alert);
        self
    }

    pub fn effect(&mut self, effect: Effect) -> &mut Self {
        self.effect = Some(effect);
        self
    }

    /// Set how long the change takes, in steps of 100ms.
    ///
    /// The bridge default is 400ms.
    ///
    /// ```
    /// use std::time::Duration;
    /// use hue_bridge_rs::State;
    ///
    /// let mut state = State::new();
    /// state.on(true).transition(Duration::from_millis(1500));
    /// assert_eq!(
    ///     serde_json::to_string(&state).unwrap(),
    ///     r#"{"on":true,"transitiontime":15}"#
    /// );
    /// ```
    pub fn transition(&mut self, duration: Duration) -> &mut Self {
        let steps = (duration.as_millis() / 100).min(u128::from(u16::MAX));
        self.transition_time = Some(steps as u16);
        self
    }

    /// Change the brightness relative to its current value (-254 to 254).
    ///
    /// Ignored by the bridge if an absolute brightness is also set.
    pub fn brightness_delta(&mut self, delta: i16) -> &mut Self {
        self.bri_inc = Some(delta.clamp(-254, 254));
        self
    }

    /// Change the saturation relative to its current value (-254 to 254).
    pub fn saturation_delta(&mut self, delta: i16) -> &mut Self {
        self.sat_inc = Some(delta.clamp(-254, 254));
        self
    }

    /// Change the hue relative to its current value. The result wraps.
    pub fn hue_delta(&mut self, delta: i32) -> &mut Self {
        self.hue_inc = Some(delta.clamp(-65534, 65534));
        self
    }

    /// Change the color temperature relative to its current value.
    pub fn color_temperature_delta(&mut self, delta: i32) -> &mut Self {
        self.ct_inc = Some(delta.clamp(-65534, 65534));
        self
    }

    /// Move the xy coordinates, stopping at the gamut boundary.
    pub fn xy_delta(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.xy_inc = Some([dx.clamp(-0.5, 0.5), dy.clamp(-0.5, 0.5)]);
        self
    }
}

impl From<&Brightness> for State {
    fn from(brightness: &Brightness) -> Self {
        let mut s = State::new();
        s.brightness(brightness);
        s
    }
}

impl From<&Color> for State {
    fn from(color: &Color) -> Self {
        let mut s = State::new();
        s.color(color);
        s
    }
}

impl From<&Mired> for State {
    fn from(ct: &Mired) -> Self {
        let mut s = State::new();
        s.color_temperature(ct);
        s
    }
}

impl From<&Effect> for State {
    fn from(effect: &Effect) -> Self {
        let mut s = State::new();
        s.effect(*effect);
        s
    }
}

impl From<&Alert> for State {
    fn from(alert: &Alert) -> Self {
        let mut s = State::new();
        s.alert(*alert);
        s
    }
}
