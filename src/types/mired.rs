//! Color temperature control.

use serde::{Deserialize, Serialize};

/// Color temperature in mired (micro reciprocal degrees), 153 to 500.
///
/// 153 is the coolest (6500K) and 500 the warmest (2000K) white a 2012
/// connected light can produce.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Mired {
    pub(crate) value: u16,
}

impl Default for Mired {
    fn default() -> Self {
        Self::new()
    }
}

impl Mired {
    const MIN: u16 = 153;
    const MAX: u16 = 500;

    /// Create a new Mired with the warmest value (500).
    pub fn new() -> Self {
        Mired { value: Self::MAX }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    /// The temperature in Kelvin, rounded.
    pub fn kelvin(&self) -> u32 {
        (1_000_000 + u32::from(self.value) / 2) / u32::from(self.value)
    }

    /// Returns `None` if value is outside the valid range (153-500).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Mired;
    ///
    /// assert!(Mired::create(152).is_none());
    /// assert!(Mired::create(153).is_some());
    /// assert!(Mired::create(500).is_some());
    /// assert!(Mired::create(501).is_none());
    /// ```
    pub fn create(value: u16) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Some(Mired { value })
        } else {
            None
        }
    }

    /// Converts a Kelvin temperature, clamping to the supported range.
    ///
    /// ```
    /// use hue_bridge_rs::Mired;
    ///
    /// assert_eq!(Mired::from_kelvin(2000).value(), 500);
    /// assert_eq!(Mired::from_kelvin(4000).value(), 250);
    /// assert_eq!(Mired::from_kelvin(10_000).value(), 153);
    /// assert_eq!(Mired::from_kelvin(0).value(), 500);
    /// ```
    pub fn from_kelvin(kelvin: u32) -> Self {
        if kelvin == 0 {
            return Self::new();
        }
        let mired = (1_000_000 + kelvin / 2) / kelvin;
        let clamped = mired.clamp(u32::from(Self::MIN), u32::from(Self::MAX));
        Mired {
            value: clamped as u16,
        }
    }
}
