#![cfg_attr(not(feature = "std"), no_std)]

//! Colour model shared by the strip streamer and its tools.
//!
//! - `color` - HSV and RGB value types plus the selectable conversion law
//! - `math8` - 8-bit fixed-point multiply primitives
//! - `rainbow` - the hardware-oriented "rainbow" HSV to RGB law
//! - `spectrum` - the symmetric triangular-ramp HSV to RGB law

pub mod color;
pub mod math8;
pub mod rainbow;
pub mod spectrum;

pub use color::{hue, rgb_to_hsv, ColorLaw, HsvColor, RgbColor};
pub use rainbow::{hsv_to_rgb_rainbow, hsv_to_rgb_rainbow_tuned, RainbowTuning, YellowBias};
pub use spectrum::hsv_to_rgb_spectrum;
