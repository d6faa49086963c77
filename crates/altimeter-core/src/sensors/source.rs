//! Scoped pressure sensor subscription

use log::{debug, info, warn};

use super::{PressureReading, ReadingChannel, ReadingReceiver, SamplingRate, SensorPlatform};

/// Bridges the platform's pressure sensor into the application.
///
/// The source owns the platform handle and a reference to the reading channel.
/// Each call to [`start`](Self::start) opens one [`Subscription`]; the
/// subscription borrows the source, so at most one is alive at a time.
pub struct SensorReadingSource<'ch, P> {
    platform: P,
    channel: &'ch ReadingChannel,
    rate: SamplingRate,
}

impl<'ch, P> SensorReadingSource<'ch, P>
where
    P: SensorPlatform<'ch>,
{
    pub fn new(platform: P, channel: &'ch ReadingChannel, rate: SamplingRate) -> Self {
        Self {
            platform,
            channel,
            rate,
        }
    }

    /// Delivery rate hint used for new subscriptions
    pub fn rate(&self) -> SamplingRate {
        self.rate
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Acquire the default pressure sensor and start receiving readings.
    ///
    /// Never fails: when the device has no pressure sensor, or the platform
    /// rejects the listener, the returned subscription reports
    /// [`Subscription::sensor_available`] as `false` and yields no readings.
    /// A missing sensor is not retried for the lifetime of the subscription.
    pub fn start(&mut self) -> Subscription<'_, 'ch, P> {
        let channel: &'ch ReadingChannel = self.channel;
        let receiver = channel.receiver();

        // Anything left from an earlier session is stale
        let stale = drain(&receiver);
        if stale > 0 {
            debug!("Discarded {} stale sensor events before subscribing", stale);
        }

        let sensor = match self.platform.default_pressure_sensor() {
            Some(sensor) => {
                match self
                    .platform
                    .register_listener(&sensor, self.rate, channel.sender())
                {
                    Ok(()) => {
                        info!(
                            "Pressure sensor listener registered (rate: {})",
                            self.rate.label()
                        );
                        Some(sensor)
                    }
                    Err(e) => {
                        warn!("Pressure sensor unusable: {}", e);
                        None
                    }
                }
            }
            None => {
                warn!("No pressure sensor detected");
                None
            }
        };

        Subscription {
            platform: &mut self.platform,
            receiver,
            sensor,
            active: true,
        }
    }
}

/// A live pressure sensor subscription.
///
/// The subscription is the only consumer of the reading channel. It is torn
/// down exactly once: either by an explicit [`stop`](Self::stop) or when it is
/// dropped, whichever comes first.
pub struct Subscription<'s, 'ch, P>
where
    P: SensorPlatform<'ch>,
{
    platform: &'s mut P,
    receiver: ReadingReceiver<'ch>,
    /// Registered sensor; `None` if the device had none or registration failed
    sensor: Option<P::Sensor>,
    active: bool,
}

impl<'s, 'ch, P> Subscription<'s, 'ch, P>
where
    P: SensorPlatform<'ch>,
{
    /// Whether a pressure sensor was acquired when the subscription started
    pub fn sensor_available(&self) -> bool {
        self.sensor.is_some()
    }

    /// Whether the subscription has not been stopped yet
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn platform(&self) -> &P {
        &*self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut *self.platform
    }

    /// Take the next queued reading without waiting.
    ///
    /// Events from other sensors and events without values are skipped.
    pub fn try_next(&mut self) -> Option<PressureReading> {
        if !self.is_streaming() {
            return None;
        }

        while let Ok(event) = self.receiver.try_receive() {
            if let Some(reading) = PressureReading::from_event(&event) {
                return Some(reading);
            }
        }
        None
    }

    /// Wait for the next reading.
    ///
    /// Resolves to `None` immediately when there is no sensor or the
    /// subscription has been stopped.
    pub async fn next(&mut self) -> Option<PressureReading> {
        if !self.is_streaming() {
            return None;
        }

        loop {
            let event = self.receiver.receive().await;
            if let Some(reading) = PressureReading::from_event(&event) {
                return Some(reading);
            }
        }
    }

    /// Hand every queued reading, oldest first, to `on_reading`.
    ///
    /// Returns the number of readings delivered.
    pub fn for_each_pending<F>(&mut self, mut on_reading: F) -> usize
    where
        F: FnMut(PressureReading),
    {
        let mut delivered = 0;
        while let Some(reading) = self.try_next() {
            debug!("Pressure reading: {} hPa", reading.pressure_hpa);
            on_reading(reading);
            delivered += 1;
        }
        delivered
    }

    /// Release the platform listener.
    ///
    /// Idempotent. Queued readings are discarded so the next subscription
    /// starts from an empty channel.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Some(sensor) = self.sensor.as_ref() {
            self.platform.unregister_listener(sensor);
            info!("Pressure sensor listener unregistered");
        }

        let discarded = drain(&self.receiver);
        if discarded > 0 {
            debug!("Discarded {} unread sensor events on teardown", discarded);
        }
    }

    fn is_streaming(&self) -> bool {
        self.active && self.sensor.is_some()
    }
}

impl<'s, 'ch, P> Drop for Subscription<'s, 'ch, P>
where
    P: SensorPlatform<'ch>,
{
    fn drop(&mut self) {
        self.stop();
    }
}

fn drain(receiver: &ReadingReceiver<'_>) -> usize {
    let mut count = 0;
    while receiver.try_receive().is_ok() {
        count += 1;
    }
    count
}
