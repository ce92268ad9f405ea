//! Cells: one character plus its on/off display attributes.
//!
//! [`StyledCell`] is the unit every surface buffer and the compositor store.
//! [`Attr`] is a small bitmask of the attributes a cell can toggle, and
//! [`Glyph`] names the box-drawing characters used for borders and tables.

use std::ops::{BitAnd, BitOr, Not};

use super::text::char_width;

// ---------------------------------------------------------------------------
// Attr
// ---------------------------------------------------------------------------

/// Display attribute bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attr(pub u8);

impl Attr {
    pub const NORMAL: Attr = Attr(0);
    pub const REVERSE: Attr = Attr(1);
    pub const BOLD: Attr = Attr(2);
    pub const UNDERLINE: Attr = Attr(4);
    pub const DIM: Attr = Attr(8);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Attr) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no attribute bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Attr {
    type Output = Attr;
    fn bitor(self, rhs: Self) -> Self::Output {
        Attr(self.0 | rhs.0)
    }
}

impl BitAnd for Attr {
    type Output = Attr;
    fn bitand(self, rhs: Self) -> Self::Output {
        Attr(self.0 & rhs.0)
    }
}

impl Not for Attr {
    type Output = Attr;
    fn not(self) -> Self::Output {
        Attr(!self.0)
    }
}

// ---------------------------------------------------------------------------
// StyledCell
// ---------------------------------------------------------------------------

/// A single terminal cell: one character with its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub attr: Attr,
}

impl StyledCell {
    /// Create a new styled cell.
    pub const fn new(ch: char, attr: Attr) -> Self {
        Self { ch, attr }
    }

    /// A blank (space) cell with no attributes.
    pub const fn blank() -> Self {
        Self {
            ch: ' ',
            attr: Attr::NORMAL,
        }
    }

    /// The right half of a wide character stored in the cell before it.
    ///
    /// Never printed: the terminal already covered it when it drew the
    /// wide character.
    pub const fn continuation(attr: Attr) -> Self {
        Self {
            ch: CONTINUATION,
            attr,
        }
    }

    pub const fn is_continuation(&self) -> bool {
        self.ch == CONTINUATION
    }

    /// Whether this cell holds a character two cells wide.
    pub fn is_wide(&self) -> bool {
        !self.is_continuation() && char_width(self.ch) == 2
    }
}

/// Marker stored in continuation cells. Control characters never reach a
/// buffer, so it cannot collide with written text.
const CONTINUATION: char = '\0';

impl Default for StyledCell {
    fn default() -> Self {
        Self::blank()
    }
}

// ---------------------------------------------------------------------------
// Glyph
// ---------------------------------------------------------------------------

/// Line-drawing glyphs for borders and table rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
    Horizontal,
    Vertical,
    TeeDown,
    TeeUp,
    TeeRight,
    TeeLeft,
    Cross,
}

impl Glyph {
    /// The Unicode box-drawing character for this glyph.
    pub const fn as_char(self) -> char {
        match self {
            Glyph::UpperLeft => '┌',
            Glyph::UpperRight => '┐',
            Glyph::LowerLeft => '└',
            Glyph::LowerRight => '┘',
            Glyph::Horizontal => '─',
            Glyph::Vertical => '│',
            Glyph::TeeDown => '┬',
            Glyph::TeeUp => '┴',
            Glyph::TeeRight => '├',
            Glyph::TeeLeft => '┤',
            Glyph::Cross => '┼',
        }
    }
}

impl From<Glyph> for char {
    fn from(glyph: Glyph) -> char {
        glyph.as_char()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
