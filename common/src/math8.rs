/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// `(value * scale) >> 8`, so `scale8(255, 255) == 254`.
#[inline]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * scale as u16) >> 8) as u8
}

/// Like [`scale8`], but a nonzero value scaled by a nonzero factor never
/// comes out as zero.
#[inline]
pub const fn scale8_video(value: u8, scale: u8) -> u8 {
    let scaled = scale8(value, scale);
    if value != 0 && scale != 0 {
        scaled.wrapping_add(1)
    } else {
        scaled
    }
}

/// Multiply by `brightness / 255`, truncating.
#[inline]
pub const fn dim8(value: u8, brightness: u8) -> u8 {
    (value as u16 * brightness as u16 / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(0, 255), 0);
        assert_eq!(scale8(255, 255), 254);
        assert_eq!(scale8(255, 128), 127);
        assert_eq!(scale8(168, 85), 55);
    }

    #[test]
    fn test_scale8_video_keeps_nonzero() {
        assert_eq!(scale8_video(1, 1), 1);
        assert_eq!(scale8_video(0, 200), 0);
        assert_eq!(scale8_video(200, 0), 0);
        assert_eq!(scale8_video(255, 255), 255);
        assert_eq!(scale8_video(16, 16), 2);
    }

    #[test]
    fn test_dim8() {
        assert_eq!(dim8(255, 255), 255);
        assert_eq!(dim8(255, 0), 0);
        assert_eq!(dim8(200, 128), 100);
        assert_eq!(dim8(1, 254), 0);
    }
}
