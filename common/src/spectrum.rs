use crate::color::{HsvColor, RgbColor};

/// Convert with evenly spaced triangular ramps.
///
/// The hue is split into sections of 64 steps. Within a section one channel
/// ramps up from the brightness floor while another ramps down towards it and
/// the third stays on the floor. Hues from 192 up reuse the rotation of the
/// section before them.
#[allow(clippy::cast_possible_truncation)]
pub fn hsv_to_rgb_spectrum(hsv: HsvColor) -> RgbColor {
    let value = u16::from(hsv.value);
    let invsat = u16::from(255 - hsv.saturation);

    let brightness_floor = (value * invsat / 256) as u8;
    let colour_amplitude = u16::from(hsv.value - brightness_floor);

    let section = hsv.hue / 0x40;
    let offset = hsv.hue % 0x40;

    let rampup = u16::from(offset);
    let rampdown = u16::from((0x40 - 1) - offset);

    let rampup_amp_adj = (rampup * colour_amplitude / (256 / 4)) as u8;
    let rampdown_amp_adj = (rampdown * colour_amplitude / (256 / 4)) as u8;

    let rampup_with_floor = rampup_amp_adj.wrapping_add(brightness_floor);
    let rampdown_with_floor = rampdown_amp_adj.wrapping_add(brightness_floor);

    match section {
        0 => RgbColor::new(rampdown_with_floor, rampup_with_floor, brightness_floor),
        1 => RgbColor::new(brightness_floor, rampdown_with_floor, rampup_with_floor),
        _ => RgbColor::new(rampup_with_floor, brightness_floor, rampdown_with_floor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_section_rotation() {
        assert_eq!(
            hsv_to_rgb_spectrum(HsvColor::new(0, 255, 255)),
            RgbColor::new(251, 0, 0)
        );
        assert_eq!(
            hsv_to_rgb_spectrum(HsvColor::new(64, 255, 255)),
            RgbColor::new(0, 251, 0)
        );
        assert_eq!(
            hsv_to_rgb_spectrum(HsvColor::new(128, 255, 255)),
            RgbColor::new(0, 0, 251)
        );
        assert_eq!(
            hsv_to_rgb_spectrum(HsvColor::new(63, 255, 255)),
            RgbColor::new(0, 251, 0)
        );
    }

    #[test]
    fn test_last_section_matches_third() {
        assert_eq!(
            hsv_to_rgb_spectrum(HsvColor::new(200, 255, 255)),
            hsv_to_rgb_spectrum(HsvColor::new(136, 255, 255))
        );
    }

    #[test]
    fn test_floor_from_saturation() {
        // floor = 255 * 255 / 256 = 254, amplitude = 1
        assert_eq!(
            hsv_to_rgb_spectrum(HsvColor::new(0, 0, 255)),
            RgbColor::new(254, 254, 254)
        );
        // floor = 200 * 155 / 256 = 121, amplitude = 79
        // rampup 16 -> 19, rampdown 47 -> 58
        assert_eq!(
            hsv_to_rgb_spectrum(HsvColor::new(16, 100, 200)),
            RgbColor::new(179, 140, 121)
        );
    }

    proptest! {
        #[test]
        fn prop_zero_value_is_black(h: u8, s: u8) {
            prop_assert_eq!(hsv_to_rgb_spectrum(HsvColor::new(h, s, 0)), RgbColor::BLACK);
        }

        #[test]
        fn prop_channels_stay_within_value(h: u8, s: u8, v: u8) {
            let color = hsv_to_rgb_spectrum(HsvColor::new(h, s, v));
            prop_assert!(color.red <= v && color.green <= v && color.blue <= v);
        }
    }
}
