// src/ui/mod.rs
//! Altimeter UI primitives
//!
//! Shared display geometry plus the core drawable and event types used by the
//! pages.

pub mod core;

pub use self::core::{Drawable, PageEvent, PageId};

/// Display width in pixels
pub const DISPLAY_WIDTH_PX: u16 = 320;

/// Display height in pixels
pub const DISPLAY_HEIGHT_PX: u16 = 240;
