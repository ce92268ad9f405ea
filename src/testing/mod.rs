//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to script key presses for widgets running on a headless
//! [`Screen`](crate::screen::Screen). Use [`screen_to_string`] and related
//! helpers to capture what is on screen as plain text for snapshot-style
//! assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{compositor_to_string, screen_to_string, surface_to_string};
