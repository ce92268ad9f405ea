//! Field editor: a titled form of labeled one-line fields.
//!
//! Each field is backed by an [`EditStrategy`] supplied to
//! [`FieldEditor::run`]. Up and Down move between fields, Tab cycles through
//! them and the `[ OK ]` control, Enter on `[ OK ]` commits and Escape
//! cancels. Every other key goes to the focused field's strategy.
//!
//! Content wider than the field scrolls in place: only its tail is shown, so
//! the end being typed stays visible.

use crate::error::{Error, Result};
use crate::event::input::Key;
use crate::geometry::Geometry;
use crate::layer::Layer;
use crate::render::cell::Attr;
use crate::render::text::{pad_to_width, tail, text_width};
use crate::screen::Screen;

use super::edit::EditStrategy;
use super::{ok_position, OK_LABEL};

/// Spaces between a padded label and its content.
const LABEL_GAP: usize = 2;

// ---------------------------------------------------------------------------
// EditorState
// ---------------------------------------------------------------------------

/// What holds the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(usize),
    Ok,
}

/// Result of one key in an [`EditorState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Navigation key, handled by the editor.
    Moved,
    /// The key belongs to field `index`.
    Edit(usize),
    /// Enter on `[ OK ]`.
    Commit,
    /// Escape.
    Cancel,
    /// Nothing to do.
    Ignored,
}

/// Focus and termination state of a field editor, independent of any surface.
///
/// Focus ranges over `0..=fields`; `fields` is the `[ OK ]` control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    focus: usize,
    fields: usize,
    quit: bool,
    escape: bool,
}

impl EditorState {
    pub fn new(fields: usize) -> Self {
        Self {
            focus: 0,
            fields,
            quit: false,
            escape: false,
        }
    }

    pub fn focus(&self) -> Focus {
        if self.focus == self.fields {
            Focus::Ok
        } else {
            Focus::Field(self.focus)
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.quit
    }

    /// Whether the editor ended with a commit rather than Escape.
    pub fn committed(&self) -> bool {
        self.quit && !self.escape
    }

    /// Apply one key.
    pub fn handle_key(&mut self, key: Key) -> Action {
        match key {
            Key::Up => {
                self.focus = self.focus.saturating_sub(1);
                Action::Moved
            }
            Key::Down => {
                self.focus = (self.focus + 1).min(self.fields);
                Action::Moved
            }
            Key::Tab => {
                self.focus = if self.focus == self.fields {
                    0
                } else {
                    self.focus + 1
                };
                Action::Moved
            }
            Key::Escape => {
                self.escape = true;
                self.quit = true;
                Action::Cancel
            }
            Key::Enter if self.focus == self.fields => {
                self.quit = true;
                Action::Commit
            }
            Key::Enter => Action::Moved,
            _ => match self.focus() {
                Focus::Field(index) => Action::Edit(index),
                Focus::Ok => Action::Ignored,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// FieldEditor
// ---------------------------------------------------------------------------

/// A decorated window of labeled input fields.
pub struct FieldEditor {
    layer: Layer,
    /// Labels padded to the longest label plus two spaces.
    labels: Vec<String>,
    /// Cells available for field content.
    capacity: usize,
    state: EditorState,
}

impl FieldEditor {
    /// Build the form and draw the labels and the `[ OK ]` control.
    pub fn new<S: Into<String>>(
        screen: &Screen,
        title: impl Into<String>,
        fields: impl IntoIterator<Item = S>,
        geometry: Geometry,
    ) -> Result<Self> {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let layer = Layer::decorated(screen, title, geometry)?;
        let content = layer.content_geometry()?;

        let rows = fields.len() + 1;
        if rows > content.height as usize {
            return Err(Error::TooManyRows {
                rows,
                available: content.height as usize,
            });
        }
        let label_width = fields.iter().map(|f| text_width(f)).max().unwrap_or(0) + 2;
        // One column stays free for the cursor after the content.
        let capacity = (content.width as usize).saturating_sub(label_width + LABEL_GAP + 1);
        if capacity == 0 || content.width < ok_position(content).1 + OK_LABEL.len() as u16 {
            return Err(Error::GeometryTooSmall {
                geometry,
                reason: "no room left for field content",
            });
        }

        let labels: Vec<String> = fields
            .iter()
            .map(|field| pad_to_width(field, label_width))
            .collect();
        for (y, label) in labels.iter().enumerate() {
            layer.write_at(y as u16, 0, label)?;
        }

        let editor = Self {
            state: EditorState::new(labels.len()),
            layer,
            labels,
            capacity,
        };
        editor.draw_ok(false)?;
        Ok(editor)
    }

    /// Padded labels, top to bottom.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Cells of content shown per field before it scrolls.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Run the modal loop with one strategy per field.
    ///
    /// Returns `true` when the form was committed with `[ OK ]` and `false`
    /// when it was cancelled with Escape. Each run starts on the first field.
    pub fn run(&mut self, strategies: &mut [Box<dyn EditStrategy + '_>]) -> Result<bool> {
        if strategies.len() != self.labels.len() {
            return Err(Error::StrategyCountMismatch {
                expected: self.labels.len(),
                actual: strategies.len(),
            });
        }
        self.state = EditorState::new(self.labels.len());
        for (index, strategy) in strategies.iter().enumerate() {
            self.draw_field(index, strategy.as_ref())?;
        }
        self.show_focus(strategies)?;

        while !self.state.is_terminated() {
            let key = self.layer.read_key()?;
            let action = self.state.handle_key(key);
            tracing::trace!(?key, ?action, "field editor key");
            if let Action::Edit(index) = action {
                let strategy = &mut strategies[index];
                if strategy.process(key).is_change() {
                    self.draw_field(index, strategy.as_ref())?;
                }
            }
            if !self.state.is_terminated() {
                self.show_focus(strategies)?;
            }
        }

        self.layer.set_cursor_visible(false)?;
        let committed = self.state.committed();
        tracing::debug!(committed, "field editor finished");
        Ok(committed)
    }

    /// The part of `content` that fits in a field: its tail when too long.
    pub fn visible_content(&self, content: &str) -> String {
        tail(content, self.capacity).to_owned()
    }

    fn content_column(&self, index: usize) -> usize {
        text_width(&self.labels[index]) + LABEL_GAP
    }

    fn draw_field(&self, index: usize, strategy: &dyn EditStrategy) -> Result<()> {
        let y = index as u16;
        let shown = self.visible_content(&strategy.content());
        self.layer.move_cursor(y, 0)?;
        self.layer.clear_to_eol()?;
        self.layer
            .write_at(y, 0, &format!("{}{}{shown}", self.labels[index], " ".repeat(LABEL_GAP)))
    }

    fn draw_ok(&self, highlight: bool) -> Result<()> {
        let (y, x) = ok_position(self.layer.content_geometry()?);
        self.layer.attr_set(if highlight { Attr::REVERSE } else { Attr::NORMAL })?;
        self.layer.write_at(y, x, OK_LABEL)?;
        self.layer.attr_set(Attr::NORMAL)
    }

    /// Highlight `[ OK ]` or park the cursor after the focused content.
    fn show_focus(&self, strategies: &[Box<dyn EditStrategy + '_>]) -> Result<()> {
        match self.state.focus() {
            Focus::Ok => {
                self.layer.set_cursor_visible(false)?;
                self.draw_ok(true)
            }
            Focus::Field(index) => {
                self.draw_ok(false)?;
                let shown = self.visible_content(&strategies[index].content());
                let x = self.content_column(index) + text_width(&shown);
                self.layer.move_cursor(index as u16, x as u16)?;
                self.layer.set_cursor_visible(true)
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot::screen_to_string;
    use crate::widgets::edit::{bind, Change, TextEdit};
    use pretty_assertions::assert_eq;

    fn editor(screen: &Screen, geometry: Geometry) -> FieldEditor {
        FieldEditor::new(screen, "Edit", ["Name", "Email"], geometry).unwrap()
    }

    // ── State machine ────────────────────────────────────────────────

    #[test]
    fn up_and_down_do_not_wrap() {
        let mut state = EditorState::new(2);
        state.handle_key(Key::Up);
        assert_eq!(state.focus(), Focus::Field(0));
        for _ in 0..5 {
            state.handle_key(Key::Down);
        }
        assert_eq!(state.focus(), Focus::Ok);
    }

    #[test]
    fn tab_wraps_from_ok_to_first_field() {
        let mut state = EditorState::new(2);
        assert_eq!(state.handle_key(Key::Tab), Action::Moved);
        assert_eq!(state.focus(), Focus::Field(1));
        state.handle_key(Key::Tab);
        assert_eq!(state.focus(), Focus::Ok);
        state.handle_key(Key::Tab);
        assert_eq!(state.focus(), Focus::Field(0));
    }

    #[test]
    fn enter_commits_only_on_ok() {
        let mut state = EditorState::new(1);
        assert_eq!(state.handle_key(Key::Enter), Action::Moved);
        assert!(!state.is_terminated());
        state.handle_key(Key::Down);
        assert_eq!(state.handle_key(Key::Enter), Action::Commit);
        assert!(state.committed());
    }

    #[test]
    fn escape_cancels_from_anywhere() {
        for downs in 0..3 {
            let mut state = EditorState::new(2);
            for _ in 0..downs {
                state.handle_key(Key::Down);
            }
            assert_eq!(state.handle_key(Key::Escape), Action::Cancel);
            assert!(state.is_terminated());
            assert!(!state.committed());
        }
    }

    #[test]
    fn other_keys_go_to_focused_field() {
        let mut state = EditorState::new(2);
        state.handle_key(Key::Down);
        assert_eq!(state.handle_key(Key::Char('x')), Action::Edit(1));
        state.handle_key(Key::Down);
        assert_eq!(state.handle_key(Key::Char('x')), Action::Ignored);
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn labels_are_padded() {
        let screen = Screen::headless(30, 12);
        let editor = editor(&screen, Geometry::sized(10, 30));
        assert_eq!(editor.labels(), ["Name   ", "Email  "]);
        // 28 content cells - 7 label - 2 gap - 1 cursor.
        assert_eq!(editor.capacity(), 18);
    }

    #[test]
    fn rejects_too_many_fields() {
        let screen = Screen::headless(30, 12);
        let err = FieldEditor::new(&screen, "Edit", ["a", "b", "c"], Geometry::sized(8, 30)).err();
        assert!(matches!(err, Some(Error::TooManyRows { rows: 4, available: 3 })));
    }

    #[test]
    fn rejects_narrow_geometry() {
        let screen = Screen::headless(30, 12);
        let err = FieldEditor::new(&screen, "E", ["A long label"], Geometry::sized(8, 16)).err();
        assert!(matches!(err, Some(Error::GeometryTooSmall { .. })));
    }

    #[test]
    fn draws_labels_and_ok() {
        let screen = Screen::headless(20, 9);
        let _editor = editor(&screen, Geometry::sized(9, 20));
        assert_eq!(
            screen_to_string(&screen),
            [
                "┌──────────────────┐",
                "│┌────────────────┐│",
                "││      Edit      ││",
                "│└────────────────┘│",
                "│Name              │",
                "│Email             │",
                "│                  │",
                "│      [ OK ]      │",
                "└──────────────────┘",
            ]
            .join("\n")
        );
    }

    // ── Scrolling ────────────────────────────────────────────────────

    #[test]
    fn visible_content_keeps_the_tail() {
        let screen = Screen::headless(20, 9);
        let editor = editor(&screen, Geometry::sized(9, 20));
        // 18 content cells - 7 label - 2 gap - 1 cursor.
        assert_eq!(editor.capacity(), 8);
        assert_eq!(editor.visible_content("short"), "short");
        assert_eq!(editor.visible_content("abcdefghijkl"), "efghijkl");
    }

    // ── Run ──────────────────────────────────────────────────────────

    #[test]
    fn backspace_on_empty_field_changes_nothing() {
        let mut name = String::new();
        let mut edit = TextEdit::new(&mut name);
        assert_eq!(edit.process(Key::Backspace), Change::NoChange);
        assert_eq!(edit.content(), "");
    }

    #[test]
    fn run_commits_typed_values() {
        let screen = Screen::headless(20, 9);
        let mut editor = editor(&screen, Geometry::sized(9, 20));
        let (mut name, mut email) = (String::new(), String::from("x@"));
        screen.push_keys([
            Key::Char('A'),
            Key::Char('l'),
            Key::Tab,
            Key::Char('y'),
            Key::Backspace,
            Key::Char('z'),
            Key::Down,
            Key::Enter,
        ]);
        let committed = {
            let mut fields = vec![bind(&mut name), bind(&mut email)];
            editor.run(&mut fields).unwrap()
        };
        assert!(committed);
        assert_eq!(name, "Al");
        assert_eq!(email, "x@z");
        assert!(screen_to_string(&screen).contains("│Email    x@z"));
        assert_eq!(screen.cursor(), None);
    }

    #[test]
    fn run_escape_is_not_committed() {
        let screen = Screen::headless(20, 9);
        let mut editor = editor(&screen, Geometry::sized(9, 20));
        let (mut name, mut email) = (String::new(), String::new());
        screen.push_keys([Key::Char('q'), Key::Escape]);
        let mut fields = vec![bind(&mut name), bind(&mut email)];
        assert!(!editor.run(&mut fields).unwrap());
        drop(fields);
        assert_eq!(name, "q");
    }

    #[test]
    fn run_rejects_wrong_strategy_count() {
        let screen = Screen::headless(20, 9);
        let mut editor = editor(&screen, Geometry::sized(9, 20));
        let mut name = String::new();
        let mut fields = vec![bind(&mut name)];
        assert!(matches!(
            editor.run(&mut fields),
            Err(Error::StrategyCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn cursor_follows_scrolled_content() {
        let screen = Screen::headless(20, 9);
        let mut editor = editor(&screen, Geometry::sized(9, 20));
        let (mut name, mut email) = (String::from("abcdefghijkl"), String::new());
        // Running out of keys leaves the editor mid-loop, cursor in place.
        screen.push_key(Key::Char('m'));
        let mut fields = vec![bind(&mut name), bind(&mut email)];
        assert!(matches!(editor.run(&mut fields), Err(Error::InputExhausted)));
        drop(fields);

        assert_eq!(name, "abcdefghijklm");
        let text = screen_to_string(&screen);
        assert!(text.contains("│Name     fghijklm"), "{text}");
        // Content starts at column 9 of the content surface (screen x 10,
        // row 4); the cursor sits just past the 8 visible cells.
        assert_eq!(screen.cursor(), Some((4, 1 + 9 + 8)));
    }

    #[test]
    fn wide_content_scrolls_by_cells() {
        let screen = Screen::headless(20, 9);
        let mut editor = editor(&screen, Geometry::sized(9, 20));
        assert_eq!(editor.visible_content("漢字漢字漢"), "字漢字漢");

        let (mut name, mut email) = (String::from("漢字漢字漢"), String::new());
        screen.push_key(Key::Char('x'));
        let mut fields = vec![bind(&mut name), bind(&mut email)];
        assert!(matches!(editor.run(&mut fields), Err(Error::InputExhausted)));
        drop(fields);

        assert!(screen_to_string(&screen).contains("│Name     漢字漢x"));
        // Seven visible cells: three wide characters and the `x`.
        assert_eq!(screen.cursor(), Some((4, 1 + 9 + 7)));
    }

    #[test]
    fn ok_is_inverse_when_focused() {
        let screen = Screen::headless(20, 9);
        let mut editor = editor(&screen, Geometry::sized(9, 20));
        let (mut name, mut email) = (String::new(), String::new());
        screen.push_keys([Key::Down, Key::Down]);
        let mut fields = vec![bind(&mut name), bind(&mut email)];
        assert!(editor.run(&mut fields).is_err());
        let c = screen.compositor();
        // "[ OK ]" at content (3, 6) -> screen (x 7, y 7).
        assert_eq!(c.get_cell(7, 7).map(|cell| cell.ch), Some('['));
        assert_eq!(c.get_cell(7, 7).map(|cell| cell.attr), Some(Attr::REVERSE));
        assert_eq!(screen.cursor(), None);
    }
}
