pub mod config;
pub mod controller;
pub mod error;
pub mod packet;
pub mod render;
pub mod strip;
pub mod transport;

pub use common;

pub mod prelude {
    pub use crate::{
        config::*, controller::*, error::StripError, packet::*, render::*, strip::*, transport::*,
    };
    pub use common::{hue, ColorLaw, HsvColor, RgbColor};
}
