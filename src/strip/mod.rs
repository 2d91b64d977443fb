use common::HsvColor;
use log::debug;

use crate::error::{Result, StripError};

/// The value every LED holds right after [`FrameBuffer::setup`] or when the
/// strip grows. Deliberately not black.
pub const DEFAULT_LED: HsvColor = HsvColor::new(0x10, 0x10, 0x10);

/// Current colour state of one LED strip.
///
/// Brightness applies to the whole strip and is only used when a frame is
/// serialized; the stored colours are never rewritten by it.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    leds: Vec<HsvColor>,
    brightness: u8,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self {
            leds: Vec::new(),
            brightness: 255,
        }
    }
}

impl FrameBuffer {
    pub fn new(count: usize) -> Self {
        let mut strip = Self::default();
        strip.setup(count);
        strip
    }

    /// Reset the strip to `count` LEDs, all set to [`DEFAULT_LED`].
    pub fn setup(&mut self, count: usize) {
        debug!("Strip: setting up {} LEDs", count);
        self.leds.clear();
        self.leds.resize(count, DEFAULT_LED);
    }

    /// Truncate or extend the strip. Kept LEDs keep their colour.
    pub fn resize(&mut self, count: usize) {
        debug!("Strip: resizing from {} to {} LEDs", self.leds.len(), count);
        self.leds.resize(count, DEFAULT_LED);
    }

    pub fn len(&self) -> usize {
        self.leds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    /// Writes past the end of the strip are ignored.
    pub fn set_led(&mut self, index: usize, color: HsvColor) {
        if let Some(led) = self.leds.get_mut(index) {
            *led = color;
        }
    }

    pub fn get_led(&self, index: usize) -> Result<HsvColor> {
        self.leds
            .get(index)
            .copied()
            .ok_or(StripError::IndexOutOfRange {
                index,
                len: self.leds.len(),
            })
    }

    pub fn get_led_mut(&mut self, index: usize) -> Result<&mut HsvColor> {
        let len = self.leds.len();
        self.leds
            .get_mut(index)
            .ok_or(StripError::IndexOutOfRange { index, len })
    }

    /// The stored colour with its value dimmed by the strip brightness.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn get_led_with_brightness(&self, index: usize) -> Result<HsvColor> {
        let mut color = self.get_led(index)?;
        color.value = (f32::from(color.value) * self.brightness_factor()) as u8;
        Ok(color)
    }

    pub fn fill_solid(&mut self, color: HsvColor) {
        self.leds.fill(color);
    }

    /// Fill `length` LEDs from `start`, clamped to the end of the strip.
    pub fn fill_solid_range(&mut self, color: HsvColor, start: usize, length: usize) {
        let len = self.leds.len();
        let start = start.min(len);
        let end = start.saturating_add(length).min(len);
        self.leds[start..end].fill(color);
    }

    /// LED `i` gets the hue `initial.hue + delta_hue * i`, wrapping around the
    /// wheel, with the saturation and value of `initial`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fill_rainbow(&mut self, initial: HsvColor, delta_hue: u8) {
        for (i, led) in self.leds.iter_mut().enumerate() {
            let step = delta_hue.wrapping_mul(i as u8);
            *led = HsvColor::new(
                initial.hue.wrapping_add(step),
                initial.saturation,
                initial.value,
            );
        }
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    /// Brightness as a factor between 0.0 and 1.0.
    pub fn brightness_factor(&self) -> f32 {
        f32::from(self.brightness) / 255.0
    }

    pub fn as_slice(&self) -> &[HsvColor] {
        &self.leds
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HsvColor> {
        self.leds.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_uses_default_led() {
        let strip = FrameBuffer::new(4);
        assert_eq!(strip.len(), 4);
        assert!(strip.iter().all(|led| *led == DEFAULT_LED));
        assert_eq!(strip.brightness(), 255);
    }

    #[test]
    fn test_setup_resets_existing_leds() {
        let mut strip = FrameBuffer::new(2);
        strip.fill_solid(HsvColor::new(1, 2, 3));
        strip.setup(3);
        assert_eq!(strip.as_slice(), &[DEFAULT_LED; 3]);
    }

    #[test]
    fn test_set_led_out_of_range_is_ignored() {
        let mut strip = FrameBuffer::new(3);
        let before = strip.clone();
        strip.set_led(3, HsvColor::new(1, 2, 3));
        strip.set_led(usize::MAX, HsvColor::new(1, 2, 3));
        assert_eq!(strip, before);
        assert_eq!(strip.len(), 3);
    }

    #[test]
    fn test_set_and_get_led() -> Result<()> {
        let mut strip = FrameBuffer::new(3);
        strip.set_led(1, HsvColor::new(7, 8, 9));
        assert_eq!(strip.get_led(1)?, HsvColor::new(7, 8, 9));
        *strip.get_led_mut(2)? += 4;
        assert_eq!(strip.get_led(2)?, HsvColor::new(0x14, 0x10, 0x10));
        Ok(())
    }

    #[test]
    fn test_get_led_out_of_range() {
        let strip = FrameBuffer::new(3);
        assert_eq!(
            strip.get_led(3),
            Err(StripError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            strip.get_led(3).unwrap_err().to_string(),
            "LED index 3 is out of range for a strip of 3 LEDs"
        );
    }

    #[test]
    fn test_fill_solid_range_clamps() {
        let red = HsvColor::new(0, 255, 255);
        let mut strip = FrameBuffer::new(5);
        strip.fill_solid_range(red, 3, 10);
        assert_eq!(
            strip.as_slice(),
            &[DEFAULT_LED, DEFAULT_LED, DEFAULT_LED, red, red]
        );

        let mut strip = FrameBuffer::new(5);
        strip.fill_solid_range(red, 7, 2);
        assert_eq!(strip.as_slice(), &[DEFAULT_LED; 5]);

        strip.fill_solid_range(red, 1, usize::MAX);
        assert_eq!(strip.get_led(0), Ok(DEFAULT_LED));
        assert!(strip.as_slice()[1..].iter().all(|led| *led == red));
    }

    #[test]
    fn test_fill_rainbow_wraps_hue() {
        let mut strip = FrameBuffer::new(5);
        strip.fill_rainbow(HsvColor::new(250, 200, 100), 10);
        let hues: Vec<u8> = strip.iter().map(|led| led.hue).collect();
        assert_eq!(hues, vec![250, 4, 14, 24, 34]);
        assert!(strip
            .iter()
            .all(|led| led.saturation == 200 && led.value == 100));
    }

    #[test]
    fn test_fill_rainbow_long_strip() {
        let mut strip = FrameBuffer::new(300);
        strip.fill_rainbow(HsvColor::new(0, 255, 255), 1);
        assert_eq!(strip.get_led(255).map(|led| led.hue), Ok(255));
        assert_eq!(strip.get_led(256).map(|led| led.hue), Ok(0));
        assert_eq!(strip.get_led(299).map(|led| led.hue), Ok(43));
    }

    #[test]
    fn test_resize_truncates_and_extends() {
        let red = HsvColor::new(0, 255, 255);
        let mut strip = FrameBuffer::new(2);
        strip.fill_solid(red);
        strip.resize(4);
        assert_eq!(strip.as_slice(), &[red, red, DEFAULT_LED, DEFAULT_LED]);
        strip.resize(1);
        assert_eq!(strip.as_slice(), &[red]);
    }

    #[test]
    fn test_brightness_is_not_applied_to_storage() -> Result<()> {
        let mut strip = FrameBuffer::new(1);
        strip.set_led(0, HsvColor::new(0, 255, 200));
        strip.set_brightness(51);
        assert_eq!(strip.get_led(0)?, HsvColor::new(0, 255, 200));
        assert_eq!(strip.get_led_with_brightness(0)?, HsvColor::new(0, 255, 40));
        assert!((strip.brightness_factor() - 0.2).abs() < f32::EPSILON);
        Ok(())
    }
}
