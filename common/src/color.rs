use core::fmt::{self, Display};
use core::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::math8::dim8;
use crate::rainbow::hsv_to_rgb_rainbow;
use crate::spectrum::hsv_to_rgb_spectrum;

/// Hue positions of the named colours on the 0-255 wheel.
pub mod hue {
    pub const RED: u8 = 0;
    pub const ORANGE: u8 = 32;
    pub const YELLOW: u8 = 64;
    pub const GREEN: u8 = 96;
    pub const AQUA: u8 = 140;
    pub const BLUE: u8 = 160;
    pub const PURPLE: u8 = 192;
    pub const PINK: u8 = 224;
}

/// A colour as hue, saturation and value bytes.
///
/// The hue is a position on a cyclic wheel where 0-255 covers 0-360 degrees,
/// so hue arithmetic wraps modulo 256.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HsvColor {
    pub hue: u8,
    pub saturation: u8,
    pub value: u8,
}

impl HsvColor {
    pub const fn new(hue: u8, saturation: u8, value: u8) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// A colour with only the hue set; saturation and value are zero.
    pub const fn from_hue(hue: u8) -> Self {
        Self::new(hue, 0, 0)
    }

    /// Rotate the hue, wrapping around the wheel.
    #[must_use]
    pub const fn rotate(self, delta: u8) -> Self {
        Self::new(self.hue.wrapping_add(delta), self.saturation, self.value)
    }
}

impl Add<u8> for HsvColor {
    type Output = HsvColor;

    fn add(self, hue: u8) -> Self::Output {
        self.rotate(hue)
    }
}

impl AddAssign<u8> for HsvColor {
    fn add_assign(&mut self, hue: u8) {
        self.hue = self.hue.wrapping_add(hue);
    }
}

impl From<RgbColor> for HsvColor {
    fn from(rgb: RgbColor) -> Self {
        rgb_to_hsv(rgb)
    }
}

/// Saturation and value are shown as truncated percentages.
impl Display for HsvColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} : {}",
            self.hue,
            u16::from(self.saturation) * 100 / 255,
            u16::from(self.value) * 100 / 255
        )
    }
}

/// A colour as red, green and blue bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);
    pub const WHITE: RgbColor = RgbColor::new(255, 255, 255);

    pub const RED: RgbColor = RgbColor::new(255, 0, 0);
    pub const ORANGE: RgbColor = RgbColor::new(171, 85, 0);
    pub const YELLOW: RgbColor = RgbColor::new(171, 177, 0);
    pub const GREEN: RgbColor = RgbColor::new(0, 255, 0);
    pub const AQUA: RgbColor = RgbColor::new(0, 171, 85);
    pub const BLUE: RgbColor = RgbColor::new(0, 0, 255);
    pub const PURPLE: RgbColor = RgbColor::new(85, 0, 85);
    pub const PINK: RgbColor = RgbColor::new(170, 0, 85);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// All three channels set to the same level.
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Create a colour from a packed `0xRRGGBB` code. The top byte is ignored.
    pub const fn from_code(code: u32) -> Self {
        Self {
            red: ((code >> 16) & 0xFF) as u8,
            green: ((code >> 8) & 0xFF) as u8,
            blue: (code & 0xFF) as u8,
        }
    }

    pub const fn code(self) -> u32 {
        (self.red as u32) << 16 | (self.green as u32) << 8 | self.blue as u32
    }

    /// Scale every channel by `brightness / 255`, truncating.
    #[must_use]
    pub const fn scale(self, brightness: u8) -> Self {
        Self {
            red: dim8(self.red, brightness),
            green: dim8(self.green, brightness),
            blue: dim8(self.blue, brightness),
        }
    }

    pub fn hue(self) -> u8 {
        rgb_to_hsv(self).hue
    }

    pub const fn to_bytes(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl From<u32> for RgbColor {
    fn from(code: u32) -> Self {
        Self::from_code(code)
    }
}

impl From<HsvColor> for RgbColor {
    fn from(hsv: HsvColor) -> Self {
        hsv_to_rgb_rainbow(hsv)
    }
}

impl Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} : {}", self.red, self.green, self.blue)
    }
}

/// The HSV to RGB conversion applied when a frame is serialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorLaw {
    /// Piecewise-linear eight sector wheel, see [`hsv_to_rgb_rainbow`].
    #[default]
    Rainbow,
    /// Triangular ramps over 64 unit sections, see [`hsv_to_rgb_spectrum`].
    Spectrum,
}

impl ColorLaw {
    pub fn to_rgb(self, hsv: HsvColor) -> RgbColor {
        match self {
            ColorLaw::Rainbow => hsv_to_rgb_rainbow(hsv),
            ColorLaw::Spectrum => hsv_to_rgb_spectrum(hsv),
        }
    }
}

/// Convert RGB to HSV using the exact floating point definition.
///
/// This is not the inverse of the rainbow law, so a round trip through both
/// is not expected to return the original colour.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rgb_to_hsv(rgb: RgbColor) -> HsvColor {
    let r = f32::from(rgb.red) / 255.0;
    let g = f32::from(rgb.green) / 255.0;
    let b = f32::from(rgb.blue) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = (255.0 * max) as u8;
    let saturation = if max < 0.0001 {
        0
    } else {
        (255.0 * (delta / max)) as u8
    };

    let mut degrees = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };
    if degrees < 0.0 {
        degrees += 360.0;
    }

    HsvColor {
        hue: ((degrees / 360.0) * 255.0) as u8,
        saturation,
        value,
    }
}
