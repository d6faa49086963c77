//! Latest values shown on the altimeter screen

use core::fmt::Write;

use crate::altitude::{SEA_LEVEL_PRESSURE_HPA, estimate_altitude};
use crate::color::{AltitudeColors, map_color};
use crate::sensors::PressureReading;

/// Capacity of formatted display strings.
///
/// Fits `f32::MIN` printed with two decimals plus the pressure prefix and unit.
pub const LABEL_CAPACITY: usize = 64;

/// Formatted display string
pub type Label = heapless::String<LABEL_CAPACITY>;

/// Message shown instead of the readings when the device has no barometer
pub const NO_SENSOR_MESSAGE: &str = "No Pressure Sensor Detected";

const UNKNOWN_PRESSURE_LABEL: &str = "Pressure: -- hPa";
const UNKNOWN_ALTITUDE_LABEL: &str = "-- m";

/// Most recent `{pressure, altitude, sensor_present}` tuple.
///
/// Overwritten by every reading; no history is kept. The altitude is always
/// derived from the stored pressure and nothing else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayState {
    pressure_hpa: f32,
    altitude_m: Option<f32>,
    sensor_present: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    /// State before the first reading: standard sea-level pressure, 0 m
    pub fn new() -> Self {
        Self {
            pressure_hpa: SEA_LEVEL_PRESSURE_HPA,
            altitude_m: estimate_altitude(SEA_LEVEL_PRESSURE_HPA),
            sensor_present: true,
        }
    }

    /// Record whether the subscription found a pressure sensor.
    pub fn set_sensor_present(&mut self, present: bool) {
        self.sensor_present = present;
    }

    /// Replace the state with a new raw reading.
    ///
    /// Returns `true` if anything visible changed.
    pub fn apply_reading(&mut self, reading: PressureReading) -> bool {
        let altitude_m = estimate_altitude(reading.pressure_hpa);
        let changed = self.pressure_hpa.to_bits() != reading.pressure_hpa.to_bits()
            || self.altitude_m.map(f32::to_bits) != altitude_m.map(f32::to_bits);

        self.pressure_hpa = reading.pressure_hpa;
        self.altitude_m = altitude_m;
        changed
    }

    pub fn pressure_hpa(&self) -> f32 {
        self.pressure_hpa
    }

    /// Estimated altitude, `None` when the pressure is degenerate
    pub fn altitude_m(&self) -> Option<f32> {
        self.altitude_m
    }

    pub fn sensor_present(&self) -> bool {
        self.sensor_present
    }

    /// Screen colors for the current altitude.
    ///
    /// An unknown altitude uses the sea-level colors.
    pub fn colors(&self) -> AltitudeColors {
        map_color(self.altitude_m.unwrap_or(0.0))
    }

    /// `"Pressure: 1013.25 hPa"`
    pub fn pressure_label(&self) -> Label {
        let mut label = Label::new();
        if write!(label, "Pressure: {:.2} hPa", self.pressure_hpa).is_err() {
            return fixed_label(UNKNOWN_PRESSURE_LABEL);
        }
        label
    }

    /// `"988.65 m"`, or `"-- m"` when the altitude is unknown
    pub fn altitude_label(&self) -> Label {
        let Some(altitude) = self.altitude_m else {
            return fixed_label(UNKNOWN_ALTITUDE_LABEL);
        };

        let mut label = Label::new();
        if write!(label, "{:.2} m", altitude).is_err() {
            return fixed_label(UNKNOWN_ALTITUDE_LABEL);
        }
        label
    }
}

/// Label from a constant that always fits
fn fixed_label(text: &str) -> Label {
    let mut label = Label::new();
    label.push_str(text).ok();
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{HIGH_ALTITUDE_COLOR, SEA_LEVEL_COLOR};
    use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

    fn reading(pressure_hpa: f32) -> PressureReading {
        PressureReading {
            pressure_hpa,
            timestamp_ns: 0,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = DisplayState::new();
        assert_eq!(state.pressure_hpa(), SEA_LEVEL_PRESSURE_HPA);
        assert_eq!(state.altitude_m(), Some(0.0));
        assert!(state.sensor_present());
        assert_eq!(state.pressure_label().as_str(), "Pressure: 1013.25 hPa");
        assert_eq!(state.altitude_label().as_str(), "0.00 m");
    }

    #[test]
    fn test_sea_level_scenario() {
        let mut state = DisplayState::new();
        state.apply_reading(reading(1013.25));

        let colors = state.colors();
        assert_eq!(colors.background, SEA_LEVEL_COLOR);
        assert_eq!(colors.text, Rgb888::BLACK);
        assert_eq!(state.altitude_label().as_str(), "0.00 m");
    }

    #[test]
    fn test_mid_altitude_scenario() {
        let mut state = DisplayState::new();
        assert!(state.apply_reading(reading(900.0)));

        let altitude = state.altitude_m().unwrap();
        assert!((altitude - 988.65).abs() < 0.1);
        assert_eq!(state.pressure_label().as_str(), "Pressure: 900.00 hPa");
        assert_eq!(state.colors().text, Rgb888::BLACK);
    }

    #[test]
    fn test_high_altitude_scenario() {
        let mut state = DisplayState::new();
        state.apply_reading(reading(300.0));

        let altitude = state.altitude_m().unwrap();
        assert!((altitude - 9165.16).abs() < 0.1);
        assert_eq!(state.colors().text, Rgb888::WHITE);
        assert_ne!(state.colors().background, HIGH_ALTITUDE_COLOR);
    }

    #[test]
    fn test_latest_reading_wins() {
        let mut state = DisplayState::new();
        state.apply_reading(reading(300.0));
        state.apply_reading(reading(1013.25));
        assert_eq!(state.colors().background, SEA_LEVEL_COLOR);
    }

    #[test]
    fn test_repeated_reading_is_not_a_change() {
        let mut state = DisplayState::new();
        assert!(state.apply_reading(reading(950.0)));
        assert!(!state.apply_reading(reading(950.0)));
    }

    #[test]
    fn test_degenerate_pressure_shows_unknown_altitude() {
        let mut state = DisplayState::new();
        state.apply_reading(reading(0.0));

        assert_eq!(state.altitude_m(), None);
        assert_eq!(state.altitude_label().as_str(), "-- m");
        assert_eq!(state.colors().background, SEA_LEVEL_COLOR);
    }

    #[test]
    fn test_extreme_readings_keep_their_unit() {
        let mut state = DisplayState::new();

        for pressure_hpa in [1.0e20, -1.0e25, f32::MAX, f32::MIN] {
            state.apply_reading(reading(pressure_hpa));
            let label = state.pressure_label();
            assert!(label.starts_with("Pressure: "), "{}", label);
            assert!(label.ends_with(" hPa"), "{}", label);
        }

        state.apply_reading(reading(f32::MIN));
        assert_eq!(state.altitude_label().as_str(), "-- m");
    }

    #[test]
    fn test_non_finite_pressure_label() {
        let mut state = DisplayState::new();
        state.apply_reading(reading(f32::NAN));

        assert_eq!(state.pressure_label().as_str(), "Pressure: NaN hPa");
        assert_eq!(state.altitude_label().as_str(), "-- m");
    }
}
