//! Rainbow HSV to RGB conversion
//!
//! Splits the wheel into eight sectors of 32 hue steps. Inside a sector one
//! channel ramps up while a neighbour ramps down, giving a hexagonal wheel
//! that spends more of its range on yellow than a plain HSV transform does.
//! The byte output is part of the wire contract, so every step uses the same
//! 8-bit fixed-point arithmetic as the LED controllers it talks to.

use crate::color::{HsvColor, RgbColor};
use crate::math8::{scale8, scale8_video};

const K255: u8 = 255;
const K171: u8 = 171;
const K170: u8 = 170;
const K85: u8 = 85;

/// How the yellow sectors (hues 32-95) are shaped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YellowBias {
    /// Yellow holds red at 171 while green climbs.
    #[default]
    Standard,
    /// Red and green both climb faster, widening the yellow band.
    Boosted,
}

/// Correction knobs for the rainbow law. The default leaves output untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RainbowTuning {
    pub yellow: YellowBias,
    /// Halve the green channel before saturation is applied.
    pub halve_green: bool,
    /// Scale green by this factor with [`scale8_video`]. Zero disables it.
    pub green_scale: u8,
}

/// Convert with the default (inert) [`RainbowTuning`].
pub fn hsv_to_rgb_rainbow(hsv: HsvColor) -> RgbColor {
    hsv_to_rgb_rainbow_tuned(hsv, RainbowTuning::default())
}

pub fn hsv_to_rgb_rainbow_tuned(hsv: HsvColor, tuning: RainbowTuning) -> RgbColor {
    let HsvColor {
        hue,
        saturation,
        value,
    } = hsv;

    let offset8 = (hue & 0x1F) << 3;
    let third = scale8(offset8, (256 / 3) as u8);
    let two_thirds = scale8(offset8, (512 / 3) as u8);

    let (mut r, mut g, mut b) = match hue >> 5 {
        // red -> orange
        0 => (K255 - third, third, 0),
        // orange -> yellow
        1 => match tuning.yellow {
            YellowBias::Standard => (K171, K85 + third, 0),
            YellowBias::Boosted => (K170 + third, K85 + two_thirds, 0),
        },
        // yellow -> green
        2 => match tuning.yellow {
            YellowBias::Standard => (K171 - two_thirds, K170 + third, 0),
            YellowBias::Boosted => (K255 - offset8, K170 + third, 0),
        },
        // green -> aqua
        3 => (0, K255 - third, third),
        // aqua -> blue
        4 => (0, K171 - two_thirds, K85 + two_thirds),
        // blue -> purple
        5 => (third, 0, K255 - third),
        // purple -> pink
        6 => (K85 + third, 0, K171 - third),
        // pink -> red
        _ => (K170 + third, 0, K85 - third),
    };

    if tuning.halve_green {
        g >>= 1;
    }
    if tuning.green_scale != 0 {
        g = scale8_video(g, tuning.green_scale);
    }

    if saturation != 255 {
        if saturation == 0 {
            (r, g, b) = (255, 255, 255);
        } else {
            let desat = scale8_video(255 - saturation, 255 - saturation);
            let satscale = 255 - desat;

            r = desaturate(r, satscale, desat);
            g = desaturate(g, satscale, desat);
            b = desaturate(b, satscale, desat);
        }
    }

    if value != 255 {
        let value = scale8_video(value, value);
        if value == 0 {
            (r, g, b) = (0, 0, 0);
        } else {
            r = dim(r, value);
            g = dim(g, value);
            b = dim(b, value);
        }
    }

    RgbColor::new(r, g, b)
}

/// Shrink the channel amplitude, then lift it onto the white floor.
#[inline]
fn desaturate(channel: u8, satscale: u8, floor: u8) -> u8 {
    let scaled = if channel != 0 {
        scale8(channel, satscale).wrapping_add(1)
    } else {
        0
    };
    scaled.wrapping_add(floor)
}

#[inline]
fn dim(channel: u8, value: u8) -> u8 {
    if channel != 0 {
        scale8(channel, value).wrapping_add(1)
    } else {
        0
    }
}
