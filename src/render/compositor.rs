//! Screen buffer assembly and frame diffing.
//!
//! The `Compositor` maintains a 2D grid of `StyledCell`s representing the full
//! terminal screen. Refreshing a surface places its touched cells into the grid
//! on top of whatever was there, which is what gives overlapping surfaces their
//! stacking order. The `diff` method compares two frames and produces only the
//! `CellUpdate`s needed to transition between them.

use super::cell::StyledCell;
use super::surface::SurfaceBuffer;
use crate::geometry::Geometry;

// ---------------------------------------------------------------------------
// CellUpdate
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
///
/// Used by the driver to emit minimal terminal escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub x: u16,
    pub y: u16,
    pub cell: StyledCell,
}

// ---------------------------------------------------------------------------
// Compositor
// ---------------------------------------------------------------------------

/// The composed screen: every surface refresh lands here.
#[derive(Debug, Clone)]
pub struct Compositor {
    /// The 2D screen buffer. `screen[y][x]` is the cell at column x, row y.
    screen: Vec<Vec<StyledCell>>,
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
}

impl Compositor {
    /// Create a new compositor with a blank screen of the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: Self::blank_screen(width, height),
            width,
            height,
        }
    }

    /// Resize the screen buffer. All cells are reset to blank.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.screen = Self::blank_screen(width, height);
    }

    /// Copy the touched cells of a surface buffer onto the screen at its
    /// geometry, clipped to the screen bounds.
    pub fn place(&mut self, surface: &SurfaceBuffer) {
        self.copy(surface, true);
    }

    /// Copy every cell of a surface buffer, touched or not.
    pub fn place_all(&mut self, surface: &SurfaceBuffer) {
        self.copy(surface, false);
    }

    fn copy(&mut self, surface: &SurfaceBuffer, touched_only: bool) {
        let origin = surface.geometry();
        for (dy, row) in surface.rows().iter().enumerate() {
            let y = origin.y as usize + dy;
            if y >= self.screen.len() {
                break;
            }
            for (dx, cell) in row.iter().enumerate() {
                if touched_only && !surface.is_touched(dy as u16, dx as u16) {
                    continue;
                }
                let x = origin.x as usize + dx;
                if x >= self.width as usize {
                    break;
                }
                self.set(x, y, *cell);
            }
        }
    }

    /// Store `cell` at `(x, y)`, blanking any wide character it would split.
    fn set(&mut self, x: usize, y: usize, cell: StyledCell) {
        let Some(row) = self.screen.get_mut(y) else {
            return;
        };
        if x >= row.len() {
            return;
        }
        // A wide character whose right half falls off the screen.
        let cell = if cell.is_wide() && x + 1 >= row.len() {
            StyledCell::blank()
        } else {
            cell
        };
        if row[x].is_continuation() && x > 0 {
            row[x - 1] = StyledCell::blank();
        }
        if row.get(x + 1).is_some_and(StyledCell::is_continuation) {
            row[x + 1] = StyledCell::blank();
        }
        row[x] = cell;
    }

    /// Blank every cell inside `region`, clipped to the screen bounds.
    ///
    /// Wide characters straddling the region's edges are blanked whole.
    pub fn blank(&mut self, region: Geometry) {
        let (left, right) = (region.x as usize, region.right() as usize);
        for row in self
            .screen
            .iter_mut()
            .skip(region.y as usize)
            .take(region.height as usize)
        {
            for cell in row.iter_mut().skip(left).take(region.width as usize) {
                *cell = StyledCell::blank();
            }
            if left > 0 && row.get(left - 1).is_some_and(StyledCell::is_wide) {
                row[left - 1] = StyledCell::blank();
            }
            if row.get(right).is_some_and(StyledCell::is_continuation) {
                row[right] = StyledCell::blank();
            }
        }
    }

    /// Compare this frame against a previous frame and return only the changed cells.
    ///
    /// Cells outside the previous frame's bounds are always reported.
    pub fn diff(&self, previous: &Compositor) -> Vec<CellUpdate> {
        let mut updates = Vec::new();
        for (y, row) in self.screen.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let unchanged = previous
                    .screen
                    .get(y)
                    .and_then(|prev_row| prev_row.get(x))
                    .is_some_and(|prev| prev == cell);
                if !unchanged {
                    updates.push(CellUpdate {
                        x: x as u16,
                        y: y as u16,
                        cell: *cell,
                    });
                }
            }
        }
        updates
    }

    /// Get a reference to the screen buffer cell at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_cell(&self, x: u16, y: u16) -> Option<&StyledCell> {
        self.screen
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
    }

    /// Create a blank screen buffer.
    fn blank_screen(width: u16, height: u16) -> Vec<Vec<StyledCell>> {
        (0..height as usize)
            .map(|_| vec![StyledCell::blank(); width as usize])
            .collect()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
