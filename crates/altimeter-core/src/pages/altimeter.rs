//! Altimeter page
//!
//! Shows the latest pressure and estimated altitude over a background that
//! darkens with altitude. When the device has no barometer the page shows a
//! fixed message instead and no numeric fields.

use embedded_graphics::{
    Drawable as EgDrawable,
    geometry::{Point, Size},
    mono_font::{MonoTextStyle, ascii::FONT_10X20},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Text},
};
use log::debug;

use crate::display_state::{DisplayState, NO_SENSOR_MESSAGE};
use crate::pages::Page;
use crate::pages::constants::{
    ALTITUDE_CAPTION_BASELINE_Y, ALTITUDE_VALUE_BASELINE_Y, NO_SENSOR_BASELINE_Y,
    PRESSURE_BASELINE_Y, TITLE_BASELINE_Y,
};
use crate::sensors::{SensorPlatform, Subscription};
use crate::ui::core::{Drawable, PageEvent, PageId};

/// Single-screen altimeter
pub struct AltimeterPage {
    bounds: Rectangle,
    state: DisplayState,
    dirty: bool,
}

impl AltimeterPage {
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            state: DisplayState::new(),
            dirty: true,
        }
    }

    /// Values currently on screen
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Start showing a freshly opened subscription.
    ///
    /// Resets the display state, so nothing carries over from a previous
    /// session, and records whether a sensor was found.
    pub fn attach<'ch, P>(&mut self, subscription: &Subscription<'_, 'ch, P>)
    where
        P: SensorPlatform<'ch>,
    {
        self.on_activate();
        self.on_event(&PageEvent::SensorAvailability(
            subscription.sensor_available(),
        ));
    }

    /// Apply every queued reading from `subscription`.
    ///
    /// Returns `true` if the page needs a redraw.
    pub fn pump<'ch, P>(&mut self, subscription: &mut Subscription<'_, 'ch, P>) -> bool
    where
        P: SensorPlatform<'ch>,
    {
        let mut changed = false;
        subscription.for_each_pending(|reading| {
            changed |= self.on_event(&PageEvent::PressureUpdate(reading));
        });
        changed
    }

    fn draw_label<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        text: &str,
        baseline_y: i32,
        color: Rgb565,
    ) -> Result<(), D::Error> {
        let center_x = self.bounds.top_left.x + (self.bounds.size.width / 2) as i32;
        EgDrawable::draw(
            &Text::with_alignment(
                text,
                Point::new(center_x, self.bounds.top_left.y + baseline_y),
                MonoTextStyle::new(&FONT_10X20, color),
                Alignment::Center,
            ),
            display,
        )?;
        Ok(())
    }
}

impl Page for AltimeterPage {
    fn id(&self) -> PageId {
        PageId::Altimeter
    }

    fn title(&self) -> &str {
        "Altimeter"
    }

    fn on_activate(&mut self) {
        self.state = DisplayState::new();
        self.dirty = true;
    }

    fn on_deactivate(&mut self) {
        self.state = DisplayState::new();
    }

    fn on_event(&mut self, event: &PageEvent) -> bool {
        let changed = match *event {
            PageEvent::SensorAvailability(present) => {
                let changed = self.state.sensor_present() != present;
                self.state.set_sensor_present(present);
                changed
            }
            PageEvent::PressureUpdate(reading) => self.state.apply_reading(reading),
        };

        if changed {
            debug!(
                "Altimeter state: {} hPa, {:?} m",
                self.state.pressure_hpa(),
                self.state.altitude_m()
            );
            self.dirty = true;
        }
        changed
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        Drawable::draw(self, display)
    }

    fn bounds(&self) -> Rectangle {
        Drawable::bounds(self)
    }

    fn is_dirty(&self) -> bool {
        Drawable::is_dirty(self)
    }

    fn mark_clean(&mut self) {
        Drawable::mark_clean(self)
    }

    fn mark_dirty(&mut self) {
        Drawable::mark_dirty(self)
    }
}

impl Drawable for AltimeterPage {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let colors = self.state.colors();
        let text_color = Rgb565::from(colors.text);

        self.bounds
            .into_styled(PrimitiveStyle::with_fill(Rgb565::from(colors.background)))
            .draw(display)?;

        self.draw_label(display, self.title(), TITLE_BASELINE_Y, text_color)?;

        if !self.state.sensor_present() {
            return self.draw_label(display, NO_SENSOR_MESSAGE, NO_SENSOR_BASELINE_Y, Rgb565::RED);
        }

        self.draw_label(
            display,
            &self.state.pressure_label(),
            PRESSURE_BASELINE_Y,
            text_color,
        )?;
        self.draw_label(
            display,
            "Altitude",
            ALTITUDE_CAPTION_BASELINE_Y,
            Rgb565::from(colors.label),
        )?;
        self.draw_label(
            display,
            &self.state.altitude_label(),
            ALTITUDE_VALUE_BASELINE_Y,
            text_color,
        )
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

/// Full-screen page bounds
pub fn screen_bounds() -> Rectangle {
    Rectangle::new(
        Point::zero(),
        Size::new(
            crate::ui::DISPLAY_WIDTH_PX as u32,
            crate::ui::DISPLAY_HEIGHT_PX as u32,
        ),
    )
}
