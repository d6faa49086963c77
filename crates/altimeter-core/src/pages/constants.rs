//! Layout constants for the altimeter page
//!
//! Vertical positions are text baselines in pixels from the top of the page.

/// Page title baseline
pub const TITLE_BASELINE_Y: i32 = 50;

/// Pressure line baseline
pub const PRESSURE_BASELINE_Y: i32 = 100;

/// "Altitude" caption baseline
pub const ALTITUDE_CAPTION_BASELINE_Y: i32 = 145;

/// Altitude value baseline
pub const ALTITUDE_VALUE_BASELINE_Y: i32 = 180;

/// "No sensor" message baseline
pub const NO_SENSOR_BASELINE_Y: i32 = 130;
