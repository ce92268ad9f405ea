//! Rendering pipeline: cells, surface buffers, compositor, terminal driver,
//! and display-width helpers.

pub mod cell;
pub mod compositor;
pub mod driver;
pub mod surface;
pub mod text;

pub use cell::{Attr, Glyph, StyledCell};
pub use compositor::{CellUpdate, Compositor};
pub use driver::Driver;
pub use surface::{SurfaceBuffer, SurfaceId};
