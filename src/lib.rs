//! # gilt-layers
//!
//! Layered character-cell windows and modal widgets for the terminal.
//!
//! gilt-layers stacks owned surfaces into plain, boxed and decorated (titled)
//! windows, and builds three keyboard-driven widgets on top of them: a
//! selection list, a data table and a multi-field editor with pluggable edit
//! strategies. Rendering goes through a cell compositor and a crossterm
//! driver; a headless screen with scripted keys makes every widget testable
//! without a terminal.
//!
//! ## Core Systems
//!
//! - **[`screen`]**: `Screen` handle, RAII `Surface`s, terminal configuration
//! - **[`layer`]**: plain, boxed and decorated surface stacks
//! - **[`widgets`]**: Selection, Table, FieldEditor and edit strategies
//! - **[`render`]**: cells and attributes, surface buffers, compositor, crossterm driver
//! - **[`event`]**: keys decoupled from crossterm
//! - **[`geometry`]**: `Geometry` rectangles in character cells
//! - **[`testing`]**: headless `Pilot` and text snapshots
//!
//! ## Example
//!
//! ```ignore
//! use gilt_layers::prelude::*;
//!
//! let screen = Screen::new(ScreenConfig::default())?;
//! let mut pick = Selection::new(
//!     &screen,
//!     "Flavour",
//!     Geometry::new(10, 30, 2, 4),
//!     ["Vanilla", "Chocolate", "Lemon"],
//!     SelectionOptions::default(),
//! )?;
//! let (selected, ok) = pick.run()?;
//! ```

// Foundation
pub mod error;
pub mod geometry;

// Rendering and input
pub mod event;
pub mod render;

// Windows
pub mod layer;
pub mod screen;

// Widget system
pub mod widgets;

// Headless harness
pub mod testing;

pub use error::{Error, Result};

/// Common imports for applications.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::event::Key;
    pub use crate::geometry::Geometry;
    pub use crate::layer::{Layer, LayerKind};
    pub use crate::render::cell::{Attr, Glyph};
    pub use crate::screen::{Screen, ScreenConfig, Surface};
    pub use crate::widgets::{
        bind, EditStrategy, FieldEditor, Selection, SelectionOptions, Table, TableSpec,
    };
}
