//! Input events: keys decoupled from the terminal backend.

pub mod input;

pub use input::{InputEvent, Key};
