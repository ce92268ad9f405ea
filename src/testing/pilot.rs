//! Pilot: programmatic interaction with a headless screen.
//!
//! The `Pilot` owns a [`Screen`] in headless mode and provides methods to
//! queue user input (key presses, typed text, resize) ahead of a widget's
//! modal loop and to read back what ended up on screen.

use crate::error::Result;
use crate::event::input::Key;
use crate::render::cell::Attr;
use crate::screen::Screen;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless screen driver for testing.
///
/// Keys are queued before the widget runs; the widget's loop consumes them in
/// order and fails with [`Error::InputExhausted`](crate::error::Error) if it
/// wants more than were queued.
///
/// # Examples
///
/// ```ignore
/// use gilt_layers::testing::Pilot;
/// use gilt_layers::event::Key;
///
/// let pilot = Pilot::new(40, 12);
/// let mut selection = Selection::new(pilot.screen(), "Pick", geometry, ["A", "B"], options)?;
/// pilot.press_keys([Key::Down, Key::Enter]);
/// let (selected, ok) = selection.run()?;
/// assert!(pilot.is_idle());
/// ```
pub struct Pilot {
    screen: Screen,
}

impl Pilot {
    /// Create a headless screen with the given terminal size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: Screen::headless(width, height),
        }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Queue one key press.
    pub fn press_key(&self, key: Key) -> &Self {
        self.screen.push_key(key);
        self
    }

    /// Queue several key presses in order.
    pub fn press_keys(&self, keys: impl IntoIterator<Item = Key>) -> &Self {
        self.screen.push_keys(keys);
        self
    }

    /// Queue each character of `text` as an individual key press.
    pub fn type_text(&self, text: &str) -> &Self {
        self.screen.push_keys(text.chars().map(Key::Char));
        self
    }

    /// Simulate a terminal resize; live surfaces are repainted.
    pub fn resize(&self, width: u16, height: u16) -> Result<()> {
        self.screen.resize(width, height)
    }

    // ── Query ────────────────────────────────────────────────────────

    /// The headless screen widgets should be built on.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Queued keys not consumed yet.
    pub fn pending_keys(&self) -> usize {
        self.screen.pending_keys()
    }

    /// Whether every queued key has been consumed.
    pub fn is_idle(&self) -> bool {
        self.pending_keys() == 0
    }

    /// Everything on screen as plain text.
    pub fn text(&self) -> String {
        super::snapshot::screen_to_string(&self.screen)
    }

    /// Row `y` of the screen, right-trimmed.
    pub fn line(&self, y: u16) -> String {
        let compositor = self.screen.compositor();
        (0..compositor.width)
            .filter_map(|x| super::snapshot::visible_char(compositor.get_cell(x, y)))
            .collect::<String>()
            .trim_end()
            .to_owned()
    }

    /// Attribute of the screen cell at column `x`, row `y`.
    pub fn attr_at(&self, x: u16, y: u16) -> Option<Attr> {
        self.screen.compositor().get_cell(x, y).map(|cell| cell.attr)
    }

    /// Absolute `(y, x)` of the visible cursor.
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.screen.cursor()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
