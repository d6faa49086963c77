//! Hardware-independent core library for the altimeter
//!
//! This crate contains all platform-agnostic logic of the altimeter screen:
//! the pressure sensor subscription, the barometric altitude estimate, the
//! altitude color mapping, the display state and the page that renders it.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on embedded and
//! mobile targets as well as desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod altitude;
pub mod color;
pub mod config;
pub mod display_state;
pub mod framebuffer;
pub mod pages;
pub mod sensors;
pub mod ui;
