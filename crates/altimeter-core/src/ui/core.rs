// src/ui/core.rs
//! Core UI traits and types for the altimeter screen

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::sensors::PressureReading;

/// Page identifier for navigation and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Altimeter,
}

/// Trait for any UI element that can be drawn
pub trait Drawable {
    /// Draw the element to the display within its bounds
    fn draw<D: DrawTarget<Color = embedded_graphics::pixelcolor::Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error>;

    /// Get the bounds of this drawable element
    fn bounds(&self) -> Rectangle;

    /// Check if this element needs to be redrawn
    fn is_dirty(&self) -> bool;

    /// Mark this element as clean (already drawn)
    fn mark_clean(&mut self);

    /// Mark this element as dirty (needs redraw)
    fn mark_dirty(&mut self);
}

/// Events that pages can subscribe to for updates
#[derive(Debug, Clone, Copy)]
pub enum PageEvent {
    /// The subscription started; `false` means the device has no barometer
    SensorAvailability(bool),
    /// A raw barometer reading arrived
    PressureUpdate(PressureReading),
}
