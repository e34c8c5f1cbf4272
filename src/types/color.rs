//! RGB colors and CIE xy coordinates.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A point in the CIE color space, both coordinates between 0 and 1.
///
/// If the point lies outside the gamut of a light, the bridge picks the
/// closest color the light can produce.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Xy {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl Xy {
    /// The D65 white point.
    pub const WHITE: Xy = Xy {
        x: 0.3127,
        y: 0.3290,
    };

    /// Returns `None` unless both coordinates are within `[0, 1]`.
    ///
    /// ```
    /// use hue_bridge_rs::Xy;
    ///
    /// assert!(Xy::create(0.675, 0.322).is_some());
    /// assert!(Xy::create(1.2, 0.3).is_none());
    /// assert!(Xy::create(0.3, f64::NAN).is_none());
    /// ```
    pub fn create(x: f64, y: f64) -> Option<Self> {
        let valid = |v: f64| (0.0..=1.0).contains(&v);
        if valid(x) && valid(y) {
            Some(Xy { x, y })
        } else {
            None
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

impl From<[f64; 2]> for Xy {
    fn from([x, y]: [f64; 2]) -> Self {
        Xy { x, y }
    }
}

impl From<Xy> for [f64; 2] {
    fn from(xy: Xy) -> Self {
        [xy.x, xy.y]
    }
}

/// An RGB color with red, green, and blue components (0-255 each).
///
/// The bridge has no RGB mode; colors are sent as [`Xy`] coordinates.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
}

impl Color {
    /// Create a color with the given RGB values.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Converts to CIE xy using the sRGB gamma curve and the wide gamut D65
    /// matrix. Black maps to the white point.
    ///
    /// ```
    /// use hue_bridge_rs::Color;
    ///
    /// let xy = Color::rgb(255, 0, 0).to_xy();
    /// assert!((xy.x() - 0.7006).abs() < 0.001);
    /// assert!((xy.y() - 0.2993).abs() < 0.001);
    /// ```
    pub fn to_xy(&self) -> Xy {
        let r = gamma(self.red);
        let g = gamma(self.green);
        let b = gamma(self.blue);

        let x = r * 0.664_511 + g * 0.154_324 + b * 0.162_028;
        let y = r * 0.283_881 + g * 0.668_433 + b * 0.047_685;
        let z = r * 0.000_088 + g * 0.072_310 + b * 0.986_039;

        let sum = x + y + z;
        if sum == 0.0 {
            return Xy::WHITE;
        }
        Xy {
            x: x / sum,
            y: y / sum,
        }
    }
}

fn gamma(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse from comma-separated string (e.g., "255,128,0").
    fn from_str(s: &str) -> Result<Self, String> {
        let parts = s
            .split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| format!("invalid color component: {e}"))?;
        match parts.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            _ => Err("Expected format: r,g,b".into()),
        }
    }
}

impl From<&Color> for Xy {
    fn from(color: &Color) -> Self {
        color.to_xy()
    }
}
