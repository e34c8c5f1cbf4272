//! Alerts, dynamic effects and color modes.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// A temporary change to the light's state.
///
/// The bridge reports the last alert that was sent, not the current one:
/// after a breathe cycle has finished it does not reset to `none`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Alert {
    /// No alert effect.
    None,
    /// One breathe cycle.
    Select,
    /// Breathe cycles for 15 seconds or until `none` is sent.
    LSelect,
    #[serde(other)]
    Unknown,
}

/// A dynamic effect.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Effect {
    None,
    /// Cycles through all hues using the current brightness and saturation.
    ColorLoop,
    #[serde(other)]
    Unknown,
}

/// The color mode a light is in, i.e. the last kind of color command it got.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorMode {
    /// Hue and saturation
    Hs,
    Xy,
    /// Color temperature
    Ct,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Alert::LSelect).unwrap(), r#""lselect""#);
        assert_eq!(serde_json::to_string(&Effect::ColorLoop).unwrap(), r#""colorloop""#);
        assert_eq!(Effect::ColorLoop.to_string(), "colorloop");
    }

    #[test]
    fn test_unknown_values_are_tolerated() {
        let effect: Effect = serde_json::from_str(r#""sparkle""#).unwrap();
        assert_eq!(effect, Effect::Unknown);
        let mode: ColorMode = serde_json::from_str(r#""ct""#).unwrap();
        assert_eq!(mode, ColorMode::Ct);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Alert::from_str("LSELECT").unwrap(), Alert::LSelect);
        assert_eq!(Effect::from_str("colorloop").unwrap(), Effect::ColorLoop);
        assert!(Effect::from_str("sparkle").is_err());
    }

    #[test]
    fn test_iter_lists_effects() {
        let names: Vec<String> = Effect::iter().map(|e| e.to_string()).collect();
        assert!(names.contains(&"none".to_string()));
        assert!(names.contains(&"colorloop".to_string()));
    }
}
