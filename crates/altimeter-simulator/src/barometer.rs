//! Simulated barometer platform
//!
//! Stands in for the phone's sensor service on the desktop. Readings are
//! generated from a pressure profile and pushed into the registered sink at
//! the requested rate as the simulator clock advances.

use std::time::Duration;

use altimeter_core::altitude::SEA_LEVEL_PRESSURE_HPA;
use altimeter_core::sensors::{
    ReadingSender, SamplingRate, SensorError, SensorEvent, SensorPlatform, publish,
};
use log::{debug, info};

const SENSOR_NAME: &str = "Simulated barometer";

/// Highest point of the climb profile in meters
const CLIMB_PEAK_ALTITUDE_M: f64 = 11_000.0;

/// Duration of one full climb and descent
const CLIMB_PERIOD: Duration = Duration::from_secs(120);

/// Shape of the simulated pressure over time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressureProfile {
    /// Climb linearly from sea level to 11 km and back down, repeating
    Climb,
    /// Constant pressure in hPa
    Fixed(f32),
}

impl PressureProfile {
    /// Parse `"climb"` or a fixed pressure in hPa such as `"900"`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("climb") {
            return Some(Self::Climb);
        }
        value.parse::<f32>().ok().map(Self::Fixed)
    }

    /// Pressure in hPa after `elapsed` simulated time
    pub fn pressure_at(self, elapsed: Duration) -> f32 {
        match self {
            Self::Fixed(pressure_hpa) => pressure_hpa,
            Self::Climb => {
                let period = CLIMB_PERIOD.as_secs_f64();
                let phase = (elapsed.as_secs_f64() % period) / period;
                // Triangle wave: up for the first half, down for the second
                let altitude = if phase < 0.5 {
                    CLIMB_PEAK_ALTITUDE_M * phase * 2.0
                } else {
                    CLIMB_PEAK_ALTITUDE_M * (1.0 - phase) * 2.0
                };
                pressure_for_altitude(altitude)
            }
        }
    }
}

/// Inverse of the ISA altitude estimate
fn pressure_for_altitude(altitude_m: f64) -> f32 {
    let p0 = f64::from(SEA_LEVEL_PRESSURE_HPA);
    (p0 * (1.0 - altitude_m / 44330.0).powf(5.255)) as f32
}

/// Handle for the one simulated sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedSensor;

pub struct SimulatedBarometer<'ch> {
    profile: PressureProfile,
    present: bool,
    sink: Option<ReadingSender<'ch>>,
    interval: Duration,
    elapsed: Duration,
    since_last_event: Duration,
}

impl<'ch> SimulatedBarometer<'ch> {
    pub fn new(profile: PressureProfile, present: bool) -> Self {
        Self {
            profile,
            present,
            sink: None,
            interval: SamplingRate::default().interval(),
            elapsed: Duration::ZERO,
            since_last_event: Duration::ZERO,
        }
    }

    /// Advance the simulated clock and deliver any events that fall due.
    ///
    /// The clock keeps running while no listener is registered, like a
    /// real sensor would.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed += dt;

        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        self.since_last_event += dt;
        if self.since_last_event < self.interval {
            return;
        }
        self.since_last_event = Duration::ZERO;

        let pressure_hpa = self.profile.pressure_at(self.elapsed);
        let event = SensorEvent::pressure(pressure_hpa, self.elapsed.as_nanos() as u64);
        if publish(sink, SENSOR_NAME, event).is_ok() {
            debug!("{}: {:.2} hPa", SENSOR_NAME, pressure_hpa);
        }
    }
}

impl<'ch> SensorPlatform<'ch> for SimulatedBarometer<'ch> {
    type Sensor = SimulatedSensor;

    fn default_pressure_sensor(&mut self) -> Option<SimulatedSensor> {
        self.present.then_some(SimulatedSensor)
    }

    fn register_listener(
        &mut self,
        _sensor: &SimulatedSensor,
        rate: SamplingRate,
        sink: ReadingSender<'ch>,
    ) -> Result<(), SensorError> {
        if self.sink.is_some() {
            return Err(SensorError::RegistrationRejected {
                sensor: SENSOR_NAME,
                details: "listener already registered",
            });
        }

        info!("{}: listener registered at {:?}", SENSOR_NAME, rate.interval());
        self.interval = rate.interval();
        // Deliver the first reading on the next tick
        self.since_last_event = self.interval;
        self.sink = Some(sink);
        Ok(())
    }

    fn unregister_listener(&mut self, _sensor: &SimulatedSensor) {
        info!("{}: listener unregistered", SENSOR_NAME);
        self.sink = None;
    }
}
