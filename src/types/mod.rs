//! Value types for light control parameters.

mod brightness;
mod color;
mod effect;
mod hue_saturation;
mod mired;

pub use brightness::Brightness;
pub use color::{Color, Xy};
pub use effect::{Alert, ColorMode, Effect};
pub use hue_saturation::HueSaturation;
pub use mired::Mired;
