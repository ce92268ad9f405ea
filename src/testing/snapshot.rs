//! Snapshot rendering helpers.
//!
//! Functions for converting the composed screen and individual surfaces into
//! plain-text strings suitable for snapshot testing and assertions.

use crate::render::cell::StyledCell;
use crate::render::compositor::Compositor;
use crate::render::surface::SurfaceBuffer;
use crate::screen::{Screen, Surface};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render everything currently on `screen` to plain text.
///
/// Same layout as [`compositor_to_string`].
///
/// # Examples
///
/// ```ignore
/// use gilt_layers::testing::screen_to_string;
///
/// let screen = Screen::headless(20, 3);
/// let surface = screen.create_surface(Geometry::sized(1, 5))?;
/// surface.write_at(0, 0, "Hello")?;
/// assert_eq!(screen_to_string(&screen), "Hello");
/// ```
pub fn screen_to_string(screen: &Screen) -> String {
    compositor_to_string(&screen.compositor())
}

/// Convert a full compositor screen to a plain text string.
///
/// Each row is right-trimmed of spaces, blank rows at the bottom are dropped
/// and rows are joined with `'\n'`. The final line has no trailing newline.
pub fn compositor_to_string(compositor: &Compositor) -> String {
    let lines = (0..compositor.height).map(|y| {
        (0..compositor.width)
            .filter_map(|x| visible_char(compositor.get_cell(x, y)))
            .collect::<String>()
    });
    join_trimmed(lines)
}

/// Render the cells of one surface, ignoring anything stacked above it.
///
/// Returns an empty string for a surface that no longer exists.
pub fn surface_to_string(surface: &Surface) -> String {
    surface
        .snapshot()
        .map(|buffer| buffer_to_string(&buffer))
        .unwrap_or_default()
}

/// Convert a surface buffer to text, trimmed like [`compositor_to_string`].
pub fn buffer_to_string(buffer: &SurfaceBuffer) -> String {
    join_trimmed(
        buffer
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|cell| visible_char(Some(cell)))
                    .collect::<String>()
            }),
    )
}

/// The character a cell shows; `None` for the right half of a wide character.
/// Cells off the screen read as blanks.
pub(crate) fn visible_char(cell: Option<&StyledCell>) -> Option<char> {
    match cell {
        Some(cell) if cell.is_continuation() => None,
        Some(cell) => Some(cell.ch),
        None => Some(' '),
    }
}

fn join_trimmed(rows: impl Iterator<Item = String>) -> String {
    let mut lines: Vec<String> = rows.map(|row| row.trim_end().to_owned()).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::layer::Layer;
    use pretty_assertions::assert_eq;

    // ── screen_to_string ─────────────────────────────────────────────

    #[test]
    fn blank_screen_is_empty() {
        let screen = Screen::headless(10, 4);
        assert_eq!(screen_to_string(&screen), "");
    }

    #[test]
    fn rows_are_right_trimmed() {
        let screen = Screen::headless(10, 3);
        let surface = screen.create_surface(Geometry::new(2, 4, 0, 2)).unwrap();
        surface.write_at(0, 0, "ab").unwrap();
        surface.write_at(1, 1, "c").unwrap();
        assert_eq!(screen_to_string(&screen), "  ab\n   c");
    }

    #[test]
    fn inner_blank_rows_are_kept() {
        let screen = Screen::headless(5, 4);
        let surface = screen.create_surface(Geometry::sized(3, 5)).unwrap();
        surface.write_at(0, 0, "x").unwrap();
        surface.write_at(2, 0, "y").unwrap();
        assert_eq!(screen_to_string(&screen), "x\n\ny");
    }

    #[test]
    fn wide_chars_read_once() {
        let screen = Screen::headless(8, 1);
        let surface = screen.create_surface(Geometry::sized(1, 8)).unwrap();
        surface.write_at(0, 0, "漢字ok").unwrap();
        assert_eq!(screen_to_string(&screen), "漢字ok");
        assert_eq!(surface_to_string(&surface), "漢字ok");
    }

    #[test]
    fn zero_sized_compositor() {
        assert_eq!(compositor_to_string(&Compositor::new(0, 0)), "");
    }

    // ── surface_to_string ────────────────────────────────────────────

    #[test]
    fn surface_ignores_layers_above() {
        let screen = Screen::headless(10, 4);
        let below = screen.create_surface(Geometry::sized(1, 6)).unwrap();
        below.write_at(0, 0, "under").unwrap();
        let above = Layer::plain(&screen, Geometry::sized(1, 2)).unwrap();
        above.write_at(0, 0, "ov").unwrap();
        assert_eq!(screen_to_string(&screen), "ovder");
        assert_eq!(surface_to_string(&below), "under");
        assert_eq!(surface_to_string(above.content()), "ov");
    }
}
