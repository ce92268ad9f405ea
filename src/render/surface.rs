//! Surface buffers: the cell grid behind every drawable region.
//!
//! A [`SurfaceBuffer`] holds the cells of one surface, its placement on the
//! screen, the current attribute pen and the surface cursor. Writes go through
//! the cursor the way curses windows do: after `write_str` the cursor sits
//! just past the last written cell. Writes outside the buffer are dropped.
//!
//! Like curses windows, a buffer remembers which cells changed since it was
//! last composited ("touched" cells); only those are copied to the screen on
//! refresh, so refreshing a frame never paints its blank interior over the
//! surface nested inside it.

use slotmap::new_key_type;

use super::cell::{Attr, Glyph, StyledCell};
use super::text::char_width;
use crate::geometry::Geometry;

new_key_type! {
    /// Identifier of a surface in the screen's arena. Copy, lightweight (u64).
    pub struct SurfaceId;
}

// ---------------------------------------------------------------------------
// SurfaceBuffer
// ---------------------------------------------------------------------------

/// Cell storage and pen state of one surface.
#[derive(Debug, Clone)]
pub struct SurfaceBuffer {
    geometry: Geometry,
    /// `cells[y][x]`, always `geometry.height` rows of `geometry.width` cells.
    cells: Vec<Vec<StyledCell>>,
    /// Parallel to `cells`: changed since the last composite.
    touched: Vec<Vec<bool>>,
    attr: Attr,
    cursor: (u16, u16),
}

impl SurfaceBuffer {
    /// Create a blank buffer covering `geometry`.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            cells: blank_grid(geometry.height, geometry.width),
            touched: touched_grid(geometry.height, geometry.width),
            attr: Attr::NORMAL,
            cursor: (0, 0),
        }
    }

    /// Placement on the screen.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Current attribute pen.
    pub fn attr(&self) -> Attr {
        self.attr
    }

    /// Cursor position `(y, x)`, surface-relative.
    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    /// Cell at `(y, x)`, or `None` outside the buffer.
    pub fn cell(&self, y: u16, x: u16) -> Option<&StyledCell> {
        self.cells.get(y as usize).and_then(|row| row.get(x as usize))
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> &[Vec<StyledCell>] {
        &self.cells
    }

    /// Whether the cell at `(y, x)` changed since the last composite.
    pub fn is_touched(&self, y: u16, x: u16) -> bool {
        self.touched
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Mark every cell as changed, so the next composite copies all of them.
    pub fn touch_all(&mut self) {
        for row in &mut self.touched {
            row.fill(true);
        }
    }

    /// Forget pending changes after the buffer was composited.
    pub fn untouch(&mut self) {
        for row in &mut self.touched {
            row.fill(false);
        }
    }

    // ── Pen ──────────────────────────────────────────────────────────

    pub fn attr_on(&mut self, attr: Attr) {
        self.attr = self.attr | attr;
    }

    pub fn attr_off(&mut self, attr: Attr) {
        self.attr = self.attr & !attr;
    }

    pub fn attr_set(&mut self, attr: Attr) {
        self.attr = attr;
    }

    pub fn move_cursor(&mut self, y: u16, x: u16) {
        self.cursor = (y, x);
    }

    // ── Writing ──────────────────────────────────────────────────────

    /// Write `text` starting at the cursor with the current pen.
    ///
    /// Text runs along the cursor row and is cut at the right edge; the
    /// cursor ends one cell past the last character written (clamped to the
    /// last column). Control characters are written as blanks, wide
    /// characters take two cells and combining marks are dropped.
    pub fn write_str(&mut self, text: &str) {
        let (y, mut x) = self.cursor;
        for ch in text.chars() {
            x = self.put_text(y, x, ch);
        }
        self.cursor = (y, x.min(self.geometry.width.saturating_sub(1)));
    }

    /// Write one character at the cursor and advance it.
    pub fn put_char(&mut self, ch: char) {
        let (y, x) = self.cursor;
        let x = self.put_text(y, x, ch);
        self.cursor = (y, x.min(self.geometry.width.saturating_sub(1)));
    }

    /// Draw a single-line border around the buffer's edge.
    ///
    /// Uses the current pen; leaves the cursor untouched.
    pub fn draw_border(&mut self) {
        let h = self.geometry.height;
        let w = self.geometry.width;
        if h == 0 || w == 0 {
            return;
        }
        let (bottom, right) = (h - 1, w - 1);
        for x in 1..right {
            self.put(0, x, Glyph::Horizontal.as_char());
            self.put(bottom, x, Glyph::Horizontal.as_char());
        }
        for y in 1..bottom {
            self.put(y, 0, Glyph::Vertical.as_char());
            self.put(y, right, Glyph::Vertical.as_char());
        }
        self.put(0, 0, Glyph::UpperLeft.as_char());
        self.put(0, right, Glyph::UpperRight.as_char());
        self.put(bottom, 0, Glyph::LowerLeft.as_char());
        self.put(bottom, right, Glyph::LowerRight.as_char());
    }

    /// Blank every cell and home the cursor.
    pub fn erase(&mut self) {
        for row in &mut self.cells {
            row.fill(StyledCell::blank());
        }
        self.touch_all();
        self.cursor = (0, 0);
    }

    /// Blank from the cursor to the end of its row.
    pub fn clear_to_eol(&mut self) {
        let (y, x) = self.cursor;
        self.split_wide(y, x);
        if let Some(row) = self.cells.get_mut(y as usize) {
            for cell in row.iter_mut().skip(x as usize) {
                *cell = StyledCell::blank();
            }
        }
        if let Some(row) = self.touched.get_mut(y as usize) {
            for flag in row.iter_mut().skip(x as usize) {
                *flag = true;
            }
        }
    }

    /// Change the size, keeping the overlapping cells.
    pub fn resize(&mut self, height: u16, width: u16) {
        self.cells.resize(height as usize, Vec::new());
        for row in &mut self.cells {
            row.resize(width as usize, StyledCell::blank());
            // A wide character cut in half by the new right edge.
            if let Some(last) = row.last_mut().filter(|cell| cell.is_wide()) {
                *last = StyledCell::blank();
            }
        }
        self.touched = touched_grid(height, width);
        self.geometry = self.geometry.with_size(height, width);
        let (y, x) = self.cursor;
        self.cursor = (
            y.min(height.saturating_sub(1)),
            x.min(width.saturating_sub(1)),
        );
    }

    /// Move the buffer to a new screen origin.
    pub fn move_to(&mut self, y: u16, x: u16) {
        self.geometry = self.geometry.with_origin(y, x);
        self.touch_all();
    }

    /// Store one character of text at `(y, x)` and return the column after it.
    fn put_text(&mut self, y: u16, x: u16, ch: char) -> u16 {
        let ch = if ch.is_control() { ' ' } else { ch };
        match char_width(ch) {
            0 => x,
            2 if self.geometry.contains_local(y, x.saturating_add(1)) => {
                self.put(y, x, ch);
                self.set(y, x + 1, StyledCell::continuation(self.attr));
                x + 2
            }
            // No room for the right half.
            2 => {
                self.put(y, x, ' ');
                x.saturating_add(1)
            }
            _ => {
                self.put(y, x, ch);
                x.saturating_add(1)
            }
        }
    }

    fn put(&mut self, y: u16, x: u16, ch: char) {
        self.set(y, x, StyledCell::new(ch, self.attr));
    }

    fn set(&mut self, y: u16, x: u16, cell: StyledCell) {
        if !self.geometry.contains_local(y, x) {
            return;
        }
        self.split_wide(y, x);
        self.cells[y as usize][x as usize] = cell;
        self.touched[y as usize][x as usize] = true;
    }

    /// Blank the other half of any wide character overlapping `(y, x)`, so
    /// overwriting one half never leaves the other behind.
    fn split_wide(&mut self, y: u16, x: u16) {
        if !self.geometry.contains_local(y, x) {
            return;
        }
        let (row, col) = (y as usize, x as usize);
        if self.cells[row][col].is_continuation() && col > 0 {
            self.blank_cell(row, col - 1);
        }
        if self.cells[row].get(col + 1).is_some_and(StyledCell::is_continuation) {
            self.blank_cell(row, col + 1);
        }
    }

    fn blank_cell(&mut self, row: usize, col: usize) {
        self.cells[row][col] = StyledCell::blank();
        self.touched[row][col] = true;
    }
}

fn blank_grid(height: u16, width: u16) -> Vec<Vec<StyledCell>> {
    (0..height as usize)
        .map(|_| vec![StyledCell::blank(); width as usize])
        .collect()
}

fn touched_grid(height: u16, width: u16) -> Vec<Vec<bool>> {
    vec![vec![true; width as usize]; height as usize]
}

// ===========================================================================
// Tests
// ===========================================================================
