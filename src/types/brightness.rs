//! Brightness control for Hue lights.

use serde::{Deserialize, Serialize};

/// Brightness level from 1 (dimmest the light can do) to 254.
///
/// A brightness of 1 is not off; use [`crate::Light::off`] for that.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Default for Brightness {
    fn default() -> Self {
        Self::new()
    }
}

impl Brightness {
    const MIN: u8 = 1;
    const MAX: u8 = 254;

    pub fn new() -> Self {
        Brightness { value: Self::MAX }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside valid range (1-254).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Brightness;
    ///
    /// assert!(Brightness::create(0).is_none());
    /// assert!(Brightness::create(1).is_some());
    /// assert!(Brightness::create(254).is_some());
    /// assert!(Brightness::create(255).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if Self::is_valid(value) {
            Some(Brightness { value })
        } else {
            None
        }
    }

    /// Returns default (254) if value is invalid.
    pub fn create_or(value: u8) -> Self {
        if Self::is_valid(value) {
            Brightness { value }
        } else {
            Self::new()
        }
    }

    /// Maps a 0-100 percentage onto the bridge scale.
    ///
    /// ```
    /// use hue_bridge_rs::Brightness;
    ///
    /// assert_eq!(Brightness::from_percent(100).value(), 254);
    /// assert_eq!(Brightness::from_percent(0).value(), 1);
    /// assert_eq!(Brightness::from_percent(250).value(), 254);
    /// ```
    pub fn from_percent(percent: u8) -> Self {
        let percent = u16::from(percent.min(100));
        let value = (percent * u16::from(Self::MAX) + 50) / 100;
        Brightness {
            value: (value as u8).max(Self::MIN),
        }
    }

    fn is_valid(value: u8) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }
}
