use common::HsvColor;
use serde::{Deserialize, Serialize};

use crate::strip::FrameBuffer;

/// What gets drawn into the frame buffer before each frame is sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Every LED the same colour
    Solid(HsvColor),
    /// A rainbow along the strip, rotating by `speed` hue steps per frame
    Rainbow {
        initial: HsvColor,
        delta_hue: u8,
        #[serde(default)]
        speed: u8,
    },
}

impl Default for Effect {
    fn default() -> Self {
        Effect::Rainbow {
            initial: HsvColor::new(10, 255, 255),
            delta_hue: 5,
            speed: 0,
        }
    }
}

impl Effect {
    /// Draw the current state into `strip` and step the animation.
    pub fn render(&mut self, strip: &mut FrameBuffer) {
        match self {
            Effect::Solid(color) => strip.fill_solid(*color),
            Effect::Rainbow {
                initial,
                delta_hue,
                speed,
            } => {
                strip.fill_rainbow(*initial, *delta_hue);
                *initial += *speed;
            }
        }
    }
}
