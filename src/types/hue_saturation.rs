//! Hue and Saturation color representation.

use serde::{Deserialize, Serialize};

/// Hue and saturation as the bridge understands them.
///
/// - Hue: wrapping value from 0 to 65535. Both 0 and 65535 are red, 25500 is
///   green and 46920 is blue.
/// - Saturation: 0 (white) to 254 (most colored).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct HueSaturation {
    hue: u16,
    saturation: u8,
}

impl HueSaturation {
    const MAX_SATURATION: u8 = 254;

    /// Returns `None` if the saturation is above 254.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::HueSaturation;
    ///
    /// assert!(HueSaturation::create(0, 254).is_some());
    /// assert!(HueSaturation::create(46920, 100).is_some());
    /// assert!(HueSaturation::create(25500, 255).is_none());
    /// ```
    pub fn create(hue: u16, saturation: u8) -> Option<Self> {
        if saturation <= Self::MAX_SATURATION {
            Some(HueSaturation { hue, saturation })
        } else {
            None
        }
    }

    /// Builds from a color wheel angle (0-360) and a 0-100 percentage.
    ///
    /// ```
    /// use hue_bridge_rs::HueSaturation;
    ///
    /// let hs = HueSaturation::from_degrees(120, 100).unwrap();
    /// assert_eq!(hs.hue(), 21845);
    /// assert_eq!(hs.saturation(), 254);
    /// assert!(HueSaturation::from_degrees(361, 50).is_none());
    /// assert!(HueSaturation::from_degrees(180, 101).is_none());
    /// ```
    pub fn from_degrees(degrees: u16, percent: u8) -> Option<Self> {
        if degrees > 360 || percent > 100 {
            return None;
        }
        let hue = (u32::from(degrees) * u32::from(u16::MAX) / 360) as u16;
        let saturation = (u16::from(percent) * u16::from(Self::MAX_SATURATION) / 100) as u8;
        Some(HueSaturation { hue, saturation })
    }

    pub fn hue(&self) -> u16 {
        self.hue
    }

    pub fn saturation(&self) -> u8 {
        self.saturation
    }
}
