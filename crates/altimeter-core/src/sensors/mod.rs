//! Sensor events, the platform sensor seam and the pressure reading source
//!
//! The platform (Android `SensorManager`, a simulated barometer, a test mock)
//! implements [`SensorPlatform`] and pushes [`SensorEvent`]s into a
//! [`ReadingSender`]. The application side only ever sees
//! [`PressureReading`]s through a [`Subscription`].

mod source;

pub use source::{SensorReadingSource, Subscription};

use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Number of sensor events that can be queued between two drains
/// Sized for a burst of a few UI-rate frames without dropping readings
pub const READING_CHANNEL_CAPACITY: usize = 8;

/// Maximum number of values carried by one sensor event
pub const MAX_EVENT_VALUES: usize = 3;

/// Unicast channel carrying sensor events from the platform to a subscription
pub type ReadingChannel = Channel<CriticalSectionRawMutex, SensorEvent, READING_CHANNEL_CAPACITY>;

/// Platform side of the [`ReadingChannel`]
pub type ReadingSender<'ch> =
    Sender<'ch, CriticalSectionRawMutex, SensorEvent, READING_CHANNEL_CAPACITY>;

/// Application side of the [`ReadingChannel`]
pub type ReadingReceiver<'ch> =
    Receiver<'ch, CriticalSectionRawMutex, SensorEvent, READING_CHANNEL_CAPACITY>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor}: listener registration rejected: {details}")]
    RegistrationRejected {
        sensor: &'static str,
        details: &'static str,
    },
    #[error("{sensor}: reading channel full, event dropped")]
    ChannelFull { sensor: &'static str },
}

/// Kind of sensor that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// Barometer, `values[0]` is pressure in hPa
    Pressure,
    /// Any other sensor sharing the listener, identified by its platform
    /// type number
    Other(i32),
}

/// Raw event as delivered by the platform
#[derive(Debug, Clone, PartialEq)]
pub struct SensorEvent {
    pub kind: SensorKind,
    pub values: heapless::Vec<f32, MAX_EVENT_VALUES>,
    /// Platform timestamp in nanoseconds
    pub timestamp_ns: u64,
}

impl SensorEvent {
    pub fn new(kind: SensorKind, values: &[f32], timestamp_ns: u64) -> Self {
        let mut event_values = heapless::Vec::new();
        for value in values.iter().take(MAX_EVENT_VALUES) {
            event_values.push(*value).ok();
        }

        Self {
            kind,
            values: event_values,
            timestamp_ns,
        }
    }

    /// Event from a barometer carrying a single pressure value
    pub fn pressure(pressure_hpa: f32, timestamp_ns: u64) -> Self {
        Self::new(SensorKind::Pressure, &[pressure_hpa], timestamp_ns)
    }
}

/// One raw barometer reading
///
/// No bounds are enforced here; the value is exactly what the sensor reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureReading {
    pub pressure_hpa: f32,
    pub timestamp_ns: u64,
}

impl PressureReading {
    /// Extract a pressure reading from a raw event.
    ///
    /// Returns `None` for events from other sensors or events without values.
    pub fn from_event(event: &SensorEvent) -> Option<Self> {
        if event.kind != SensorKind::Pressure {
            return None;
        }

        event.values.first().map(|&pressure_hpa| Self {
            pressure_hpa,
            timestamp_ns: event.timestamp_ns,
        })
    }
}

/// Delivery rate hint passed to the platform when registering a listener
///
/// The platform may deliver faster or slower; the hint only sets the
/// nominal interval between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplingRate {
    /// Suitable for screen orientation changes (200 ms)
    Normal,
    /// Suitable for the user interface (~66.7 ms)
    #[default]
    Ui,
    /// Suitable for games (20 ms)
    Game,
    /// As fast as the hardware allows
    Fastest,
}

impl SamplingRate {
    /// Nominal interval between two events
    pub const fn interval(self) -> Duration {
        match self {
            Self::Normal => Duration::from_micros(200_000),
            Self::Ui => Duration::from_micros(66_667),
            Self::Game => Duration::from_micros(20_000),
            Self::Fastest => Duration::ZERO,
        }
    }

    /// Get a short label for display and logs
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Ui => "ui",
            Self::Game => "game",
            Self::Fastest => "fastest",
        }
    }
}

/// Platform sensor service
///
/// Mirrors the shape of a mobile sensor manager: look up the default pressure
/// sensor (which may not exist), then register a listener that receives events
/// until it is unregistered. Events are pushed into the provided sink from
/// whatever context the platform delivers them on.
pub trait SensorPlatform<'ch> {
    /// Handle identifying a hardware sensor
    type Sensor;

    /// Get the default pressure sensor, or `None` if the device has none.
    fn default_pressure_sensor(&mut self) -> Option<Self::Sensor>;

    /// Start delivering events from `sensor` into `sink`.
    fn register_listener(
        &mut self,
        sensor: &Self::Sensor,
        rate: SamplingRate,
        sink: ReadingSender<'ch>,
    ) -> Result<(), SensorError>;

    /// Stop delivering events from `sensor`.
    fn unregister_listener(&mut self, sensor: &Self::Sensor);
}

/// Push an event into a sink on behalf of a platform.
///
/// A full channel drops the event; the consumer simply sees the next one.
pub fn publish(
    sink: &ReadingSender<'_>,
    sensor: &'static str,
    event: SensorEvent,
) -> Result<(), SensorError> {
    sink.try_send(event).map_err(|TrySendError::Full(dropped)| {
        warn!(
            "{}: reading channel full, dropping event at {} ns",
            sensor, dropped.timestamp_ns
        );
        SensorError::ChannelFull { sensor }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_reading_from_event() {
        let event = SensorEvent::pressure(1002.5, 42);
        assert_eq!(
            PressureReading::from_event(&event),
            Some(PressureReading {
                pressure_hpa: 1002.5,
                timestamp_ns: 42
            })
        );
    }

    #[test]
    fn test_other_sensor_kinds_are_ignored() {
        let event = SensorEvent::new(SensorKind::Other(13), &[21.0], 7);
        assert_eq!(PressureReading::from_event(&event), None);
    }

    #[test]
    fn test_empty_event_is_ignored() {
        let event = SensorEvent::new(SensorKind::Pressure, &[], 7);
        assert_eq!(PressureReading::from_event(&event), None);
    }

    #[test]
    fn test_event_values_are_truncated() {
        let event = SensorEvent::new(SensorKind::Pressure, &[1.0, 2.0, 3.0, 4.0, 5.0], 0);
        assert_eq!(event.values.len(), MAX_EVENT_VALUES);
        assert_eq!(event.values[0], 1.0);
    }

    #[test]
    fn test_publish_reports_full_channel() {
        let channel = ReadingChannel::new();
        let sink = channel.sender();

        for i in 0..READING_CHANNEL_CAPACITY {
            assert!(publish(&sink, "test", SensorEvent::pressure(1000.0, i as u64)).is_ok());
        }

        assert_eq!(
            publish(&sink, "test", SensorEvent::pressure(1000.0, 99)),
            Err(SensorError::ChannelFull { sensor: "test" })
        );
    }

    #[test]
    fn test_sampling_rate_intervals() {
        assert_eq!(SamplingRate::default(), SamplingRate::Ui);
        assert_eq!(SamplingRate::Normal.interval().as_millis(), 200);
        assert_eq!(SamplingRate::Ui.interval().as_micros(), 66_667);
        assert!(SamplingRate::Game.interval() < SamplingRate::Ui.interval());
        assert_eq!(SamplingRate::Fastest.interval(), Duration::ZERO);
    }
}
