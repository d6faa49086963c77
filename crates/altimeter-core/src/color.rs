//! Altitude to color mapping
//!
//! The screen background fades from a light sky blue at sea level to a very
//! dark night blue at 10 km. Each RGB channel is interpolated linearly and
//! rounded, so both ends of the range reproduce the reference colors exactly.
//!
//! Colors are kept in [`Rgb888`] so the reference values are exact. Displays
//! with fewer bits per channel convert at draw time.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// Background at sea level - light sky blue (0x87CEEB)
pub const SEA_LEVEL_COLOR: Rgb888 = Rgb888::new(0x87, 0xCE, 0xEB);

/// Background at and above [`MAX_DISPLAY_ALTITUDE_M`] - very dark blue (0x000033)
pub const HIGH_ALTITUDE_COLOR: Rgb888 = Rgb888::new(0x00, 0x00, 0x33);

/// Altitude at which the background reaches [`HIGH_ALTITUDE_COLOR`]
pub const MAX_DISPLAY_ALTITUDE_M: f32 = 10_000.0;

/// Fraction above which text switches from black to white
pub const LIGHT_TEXT_THRESHOLD: f32 = 0.4;

/// Opacity of secondary labels drawn over the background
const LABEL_OPACITY: f32 = 0.8;

/// Colors for one altitude value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AltitudeColors {
    /// Screen background fill
    pub background: Rgb888,
    /// Primary text, black or white depending on the background
    pub text: Rgb888,
    /// Secondary labels: the text color at 80% opacity over the background
    pub label: Rgb888,
}

/// Normalize an altitude onto `[0, 1]` over the displayed range.
///
/// Negative altitudes clamp to 0, altitudes at or above 10 km clamp to 1.
/// NaN maps to 0.
pub fn altitude_fraction(altitude_m: f32) -> f32 {
    let fraction = altitude_m / MAX_DISPLAY_ALTITUDE_M;
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0)
}

/// Map an altitude in meters to its background, text and label colors.
pub fn map_color(altitude_m: f32) -> AltitudeColors {
    colors_for_fraction(altitude_fraction(altitude_m))
}

/// Colors for an already normalized fraction in `[0, 1]`.
pub fn colors_for_fraction(fraction: f32) -> AltitudeColors {
    let background = lerp(SEA_LEVEL_COLOR, HIGH_ALTITUDE_COLOR, fraction);
    let text = if fraction > LIGHT_TEXT_THRESHOLD {
        Rgb888::WHITE
    } else {
        Rgb888::BLACK
    };

    AltitudeColors {
        background,
        text,
        label: lerp(background, text, LABEL_OPACITY),
    }
}

/// Per-channel linear interpolation from `start` (t = 0) to `end` (t = 1).
pub fn lerp(start: Rgb888, end: Rgb888, t: f32) -> Rgb888 {
    Rgb888::new(
        lerp_channel(start.r(), end.r(), t),
        lerp_channel(start.g(), end.g(), t),
        lerp_channel(start.b(), end.b(), t),
    )
}

fn lerp_channel(start: u8, end: u8, t: f32) -> u8 {
    let value = f32::from(start) + (f32::from(end) - f32::from(start)) * t;
    // Round half up; value is always within [0, 255]
    (value + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sea_level_colors() {
        let colors = map_color(0.0);
        assert_eq!(colors.background, SEA_LEVEL_COLOR);
        assert_eq!(colors.text, Rgb888::BLACK);
    }

    #[test]
    fn test_high_altitude_colors() {
        for altitude in [10_000.0, 12_500.0, 40_000.0] {
            let colors = map_color(altitude);
            assert_eq!(colors.background, HIGH_ALTITUDE_COLOR);
            assert_eq!(colors.text, Rgb888::WHITE);
        }
    }

    #[test]
    fn test_fraction_clamps() {
        assert_eq!(altitude_fraction(-700.0), 0.0);
        assert_eq!(altitude_fraction(5_000.0), 0.5);
        assert_eq!(altitude_fraction(20_000.0), 1.0);
        assert_eq!(altitude_fraction(f32::NAN), 0.0);
    }

    #[test]
    fn test_negative_altitude_uses_sea_level_colors() {
        assert_eq!(map_color(-350.0), map_color(0.0));
    }

    #[test]
    fn test_text_threshold_is_strict() {
        assert_eq!(colors_for_fraction(0.4).text, Rgb888::BLACK);
        assert_eq!(colors_for_fraction(0.41).text, Rgb888::WHITE);
    }

    #[test]
    fn test_channels_vary_monotonically() {
        let mut previous = map_color(0.0).background;
        let mut altitude = 50.0;
        while altitude <= MAX_DISPLAY_ALTITUDE_M {
            let current = map_color(altitude).background;
            assert!(current.r() <= previous.r());
            assert!(current.g() <= previous.g());
            assert!(current.b() <= previous.b());
            previous = current;
            altitude += 50.0;
        }
    }

    #[test]
    fn test_mid_range_color() {
        // 988.65 m from 900 hPa: fraction ~0.099, still close to sky blue
        let colors = map_color(988.65);
        assert_eq!(colors.background, Rgb888::new(122, 186, 217));
        assert_eq!(colors.text, Rgb888::BLACK);

        // 9165.16 m from 300 hPa: fraction ~0.917, close to night blue
        let colors = map_color(9165.16);
        assert_eq!(colors.background, Rgb888::new(11, 17, 66));
        assert_eq!(colors.text, Rgb888::WHITE);
    }

    #[test]
    fn test_label_blends_toward_text() {
        let colors = map_color(0.0);
        // 0x87 * 0.2 = 27, 0xCE * 0.2 = 41.2, 0xEB * 0.2 = 47
        assert_eq!(colors.label, Rgb888::new(27, 41, 47));

        let colors = map_color(MAX_DISPLAY_ALTITUDE_M);
        // 255 * 0.8 = 204 plus 20% of the background
        assert_eq!(colors.label, Rgb888::new(204, 204, 214));
    }
}
