// src/pages/page.rs
//! Core page abstraction for the UI page system.
//!
//! A [`Page`] owns its state, dirty tracking and drawing. Hosts call these
//! methods in a fixed order:
//!
//! 1. **`on_activate`** - once, when the page becomes visible.
//! 2. **`on_event`** - zero or more times per frame for incoming events.
//! 3. **`update`** - once per frame to advance internal state.
//! 4. **`draw_page`** - when `is_dirty()` is true.
//! 5. **`on_deactivate`** - once, when the page is no longer visible.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::core::{PageEvent, PageId};

extern crate alloc;
use alloc::boxed::Box;

/// Trait that all UI pages must implement.
pub trait Page {
    /// Unique identifier used for lookup and logs.
    fn id(&self) -> PageId;

    /// Human-readable title (may appear in headers or debug logs).
    fn title(&self) -> &str;

    /// Called once when this page becomes the active page.
    fn on_activate(&mut self) {}

    /// Called once when this page is no longer the active page.
    fn on_deactivate(&mut self) {}

    /// Advance per-frame state (animations, timers, etc.).
    fn update(&mut self) {}

    /// Handle an incoming [`PageEvent`].
    ///
    /// Returns `true` if the event was consumed and the page needs a redraw.
    fn on_event(&mut self, _event: &PageEvent) -> bool {
        false
    }

    /// Render the entire page to the given display target.
    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error>;

    /// Bounding rectangle of this page (typically the full screen).
    fn bounds(&self) -> Rectangle;

    /// Whether the page needs redrawing.
    fn is_dirty(&self) -> bool;

    /// Clear the dirty flag after a successful draw.
    fn mark_clean(&mut self);

    /// Force the page to be redrawn on the next frame.
    fn mark_dirty(&mut self);
}

/// Allows a `Box<T>` to be used anywhere a `Page` is expected, forwarding
/// every call through to the inner value.
impl<T: Page> Page for Box<T> {
    fn id(&self) -> PageId {
        (**self).id()
    }

    fn title(&self) -> &str {
        (**self).title()
    }

    fn on_activate(&mut self) {
        (**self).on_activate()
    }

    fn on_deactivate(&mut self) {
        (**self).on_deactivate()
    }

    fn update(&mut self) {
        (**self).update()
    }

    fn on_event(&mut self, event: &PageEvent) -> bool {
        (**self).on_event(event)
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        (**self).draw_page(display)
    }

    fn bounds(&self) -> Rectangle {
        (**self).bounds()
    }

    fn is_dirty(&self) -> bool {
        (**self).is_dirty()
    }

    fn mark_clean(&mut self) {
        (**self).mark_clean()
    }

    fn mark_dirty(&mut self) {
        (**self).mark_dirty()
    }
}
