//! Core geometry type: [`Geometry`].
//!
//! A `Geometry` places a surface on the terminal grid: a height and width in
//! cells plus the origin row (`y`) and column (`x`). Every layer and widget is
//! positioned by one, and every nested surface geometry is derived from its
//! owner's with the inset helpers below.

use std::fmt;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A rectangle of terminal cells: size and top-left origin.
///
/// Field order follows the `(height, width, y, x)` convention used by the
/// constructors, so `Geometry::new(10, 40, 2, 4)` is a 10-row, 40-column
/// rectangle whose top-left cell is at row 2, column 4.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub height: u16,
    pub width: u16,
    pub y: u16,
    pub x: u16,
}

impl Geometry {
    /// Create a new geometry.
    #[inline]
    pub const fn new(height: u16, width: u16, y: u16, x: u16) -> Self {
        Self { height, width, y, x }
    }

    /// A geometry of the given size placed at the screen origin.
    #[inline]
    pub const fn sized(height: u16, width: u16) -> Self {
        Self { height, width, y: 0, x: 0 }
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub const fn bottom(self) -> u32 {
        self.y as u32 + self.height as u32
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub const fn right(self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// Whether the rectangle covers no cells.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Whether the surface-relative point `(y, x)` lies inside this rectangle.
    #[inline]
    pub const fn contains_local(self, y: u16, x: u16) -> bool {
        y < self.height && x < self.width
    }

    /// Shrink the rectangle by the given margins, moving the origin down and
    /// right by `top` and `left`.
    ///
    /// Returns `None` when the margins consume the whole rectangle, so callers
    /// never see a zero-sized inner geometry.
    pub fn inset(self, top: u16, left: u16, bottom: u16, right: u16) -> Option<Geometry> {
        let height = self.height.checked_sub(top)?.checked_sub(bottom)?;
        let width = self.width.checked_sub(left)?.checked_sub(right)?;
        if height == 0 || width == 0 {
            return None;
        }
        Some(Geometry {
            height,
            width,
            y: self.y.checked_add(top)?,
            x: self.x.checked_add(left)?,
        })
    }

    /// Same rectangle with a new size and unchanged origin.
    #[inline]
    pub const fn with_size(self, height: u16, width: u16) -> Geometry {
        Geometry { height, width, y: self.y, x: self.x }
    }

    /// Same rectangle with a new origin and unchanged size.
    #[inline]
    pub const fn with_origin(self, y: u16, x: u16) -> Geometry {
        Geometry { height: self.height, width: self.width, y, x }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}@({},{})", self.height, self.width, self.y, self.x)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
