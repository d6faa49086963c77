//! Runtime configuration
//!
//! The sea-level reference pressure is intentionally not part of the
//! configuration; see [`crate::altitude::SEA_LEVEL_PRESSURE_HPA`].

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::sensors::SamplingRate;

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Config {
    pub sensor: SensorConfig,
    pub display: DisplayConfig,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    /// Delivery rate hint for the pressure listener
    pub sampling_rate: SamplingRate,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DisplayConfig {
    /// Pixel scale factor for hosts that magnify the screen
    pub scale: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { scale: 2 }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown sampling rate (expected normal, ui, game or fastest)")]
    UnknownSamplingRate,
    #[error("display scale must be between 1 and {max}")]
    ScaleOutOfRange { max: u32 },
}

/// Largest accepted display scale
pub const MAX_DISPLAY_SCALE: u32 = 8;

impl FromStr for SamplingRate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [Self::Normal, Self::Ui, Self::Game, Self::Fastest]
            .into_iter()
            .find(|rate| rate.label().eq_ignore_ascii_case(s))
            .ok_or(ConfigError::UnknownSamplingRate)
    }
}

impl DisplayConfig {
    /// Validate and set the display scale.
    pub fn set_scale(&mut self, scale: u32) -> Result<(), ConfigError> {
        if !(1..=MAX_DISPLAY_SCALE).contains(&scale) {
            return Err(ConfigError::ScaleOutOfRange {
                max: MAX_DISPLAY_SCALE,
            });
        }
        self.scale = scale;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sensor.sampling_rate, SamplingRate::Ui);
        assert_eq!(config.display.scale, 2);
    }

    #[test]
    fn test_parse_sampling_rate() {
        assert_eq!("ui".parse::<SamplingRate>(), Ok(SamplingRate::Ui));
        assert_eq!(" GAME ".parse::<SamplingRate>(), Ok(SamplingRate::Game));
        assert_eq!("Fastest".parse::<SamplingRate>(), Ok(SamplingRate::Fastest));
        assert_eq!("normal".parse::<SamplingRate>(), Ok(SamplingRate::Normal));
        assert_eq!(
            "turbo".parse::<SamplingRate>(),
            Err(ConfigError::UnknownSamplingRate)
        );
    }

    #[test]
    fn test_scale_bounds() {
        let mut display = DisplayConfig::default();
        assert!(display.set_scale(4).is_ok());
        assert_eq!(display.scale, 4);
        assert_eq!(
            display.set_scale(0),
            Err(ConfigError::ScaleOutOfRange { max: 8 })
        );
        assert_eq!(display.scale, 4);
    }
}
