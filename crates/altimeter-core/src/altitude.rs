//! Pressure to altitude conversion
//!
//! Uses the International Standard Atmosphere approximation of the barometric
//! formula:
//!
//! ```text
//! h = 44330 * (1 - (p / p0) ^ (1 / 5.255))
//! ```
//!
//! where `p0` is the standard sea-level pressure. The reference pressure is a
//! fixed constant; the estimate is therefore an altitude above the ISA sea
//! level, not a QNH-corrected altitude.

use num_traits::Float;

/// Standard sea-level reference pressure in hectopascals
pub const SEA_LEVEL_PRESSURE_HPA: f32 = 1013.25;

/// Scale height of the ISA approximation in meters
const ALTITUDE_SCALE_M: f64 = 44330.0;

/// Exponent of the ISA approximation (1 / 5.255)
const BAROMETRIC_EXPONENT: f64 = 1.0 / 5.255;

/// Estimate the altitude in meters for a pressure reading in hPa.
///
/// Returns `None` when the pressure cannot produce a physical altitude:
/// zero, negative, NaN or infinite pressure. Callers display this as an
/// unknown altitude rather than a NaN.
///
/// The computation runs in `f64` and is narrowed once at the end, so the same
/// input always produces the same output.
pub fn estimate_altitude(pressure_hpa: f32) -> Option<f32> {
    if !pressure_hpa.is_finite() || pressure_hpa <= 0.0 {
        return None;
    }

    let ratio = f64::from(pressure_hpa) / f64::from(SEA_LEVEL_PRESSURE_HPA);
    let altitude = ALTITUDE_SCALE_M * (1.0 - Float::powf(ratio, BAROMETRIC_EXPONENT));

    Some(altitude as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn altitude(pressure_hpa: f32) -> f32 {
        estimate_altitude(pressure_hpa).unwrap()
    }

    #[test]
    fn test_sea_level_is_zero() {
        assert!(altitude(SEA_LEVEL_PRESSURE_HPA).abs() < 1e-3);
    }

    #[test]
    fn test_known_pressures() {
        // Reference values computed from the formula in double precision
        assert!((altitude(900.0) - 988.65).abs() < 0.1);
        assert!((altitude(300.0) - 9165.16).abs() < 0.1);
    }

    #[test]
    fn test_below_sea_level_pressure_is_non_negative() {
        let mut p = 1.0_f32;
        while p <= SEA_LEVEL_PRESSURE_HPA {
            assert!(altitude(p) >= 0.0, "negative altitude at {p} hPa");
            p += 0.25;
        }
    }

    #[test]
    fn test_monotonically_decreasing() {
        let mut previous = altitude(0.5);
        let mut p = 1.0_f32;
        while p <= 1100.0 {
            let current = altitude(p);
            assert!(current < previous, "not decreasing at {p} hPa");
            previous = current;
            p += 0.5;
        }
    }

    #[test]
    fn test_above_sea_level_pressure_is_negative() {
        assert!(altitude(1100.0) < 0.0);
    }

    #[test]
    fn test_degenerate_pressure_is_unknown() {
        assert_eq!(estimate_altitude(0.0), None);
        assert_eq!(estimate_altitude(-0.0), None);
        assert_eq!(estimate_altitude(-12.5), None);
        assert_eq!(estimate_altitude(f32::NAN), None);
        assert_eq!(estimate_altitude(f32::INFINITY), None);
        assert_eq!(estimate_altitude(f32::NEG_INFINITY), None);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            estimate_altitude(812.34).map(f32::to_bits),
            estimate_altitude(812.34).map(f32::to_bits)
        );
    }
}
