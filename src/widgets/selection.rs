//! Selection widget: a titled list of options with a movable highlight.
//!
//! In single mode Enter picks the highlighted option and ends the loop. In
//! multi mode Enter toggles the highlighted option and an extra `[ OK ]` stop
//! below the list ends it. Escape ends the loop in both modes and keeps
//! whatever was toggled so far.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::event::input::Key;
use crate::geometry::Geometry;
use crate::layer::Layer;
use crate::render::cell::Attr;
use crate::render::text::text_width;
use crate::screen::Screen;

use super::{ok_position, OK_LABEL};

// ---------------------------------------------------------------------------
// SelectionOptions
// ---------------------------------------------------------------------------

/// Behaviour flags, fixed for the lifetime of a [`Selection`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Center every option in the list width.
    pub centered: bool,
    /// Allow several options, confirmed with the `[ OK ]` control.
    pub multi: bool,
}

impl SelectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Center options (builder).
    pub fn with_centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    /// Enable multi-selection (builder).
    pub fn with_multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }
}

// ---------------------------------------------------------------------------
// SelectionState
// ---------------------------------------------------------------------------

/// Key-driven state of a selection list, independent of any surface.
///
/// The highlight ranges over `0..=upper`: the last option in single mode,
/// the `[ OK ]` stop (one past the last option) in multi mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    highlight: usize,
    upper: usize,
    multi: bool,
    selected: BTreeSet<usize>,
    terminated: bool,
}

impl SelectionState {
    /// State for `count` options. `count` must be non-zero.
    pub fn new(count: usize, multi: bool) -> Self {
        let upper = if multi { count } else { count.saturating_sub(1) };
        Self {
            highlight: 0,
            upper,
            multi,
            selected: BTreeSet::new(),
            terminated: false,
        }
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Whether the highlight rests on the `[ OK ]` stop.
    pub fn on_ok(&self) -> bool {
        self.multi && self.highlight == self.upper
    }

    /// Whether option `index` is drawn in inverse video.
    pub fn is_emphasized(&self, index: usize) -> bool {
        index == self.highlight || self.selected.contains(&index)
    }

    /// Apply one key.
    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Up => self.highlight = self.highlight.saturating_sub(1),
            Key::Down => self.highlight = (self.highlight + 1).min(self.upper),
            Key::Escape => self.terminated = true,
            Key::Enter if !self.multi => {
                self.selected.insert(self.highlight);
                self.terminated = true;
            }
            Key::Enter if self.on_ok() => self.terminated = true,
            Key::Enter => {
                if !self.selected.remove(&self.highlight) {
                    self.selected.insert(self.highlight);
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A decorated window listing options to pick from.
pub struct Selection {
    layer: Layer,
    options: Vec<String>,
    config: SelectionOptions,
    state: SelectionState,
}

impl Selection {
    /// Build the window and validate that every option fits.
    ///
    /// Options are drawn from column 1 of their row; centered options are
    /// padded to the window width minus 4. Multi mode needs one extra row for
    /// the `[ OK ]` control.
    pub fn new<S: Into<String>>(
        screen: &Screen,
        title: impl Into<String>,
        geometry: Geometry,
        options: impl IntoIterator<Item = S>,
        config: SelectionOptions,
    ) -> Result<Self> {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(Error::EmptyOptions);
        }
        let layer = Layer::decorated(screen, title, geometry)?;
        let content = layer.content_geometry()?;

        let rows = options.len() + usize::from(config.multi);
        if rows > content.height as usize {
            return Err(Error::TooManyRows {
                rows,
                available: content.height as usize,
            });
        }
        let width = content.width.saturating_sub(if config.centered { 2 } else { 1 }) as usize;
        if let Some((index, option)) = options
            .iter()
            .enumerate()
            .find(|(_, option)| text_width(option) > width)
        {
            return Err(Error::OptionTooWide {
                index,
                len: text_width(option),
                available: width,
            });
        }
        if config.multi && content.width < ok_position(content).1 + OK_LABEL.len() as u16 {
            return Err(Error::GeometryTooSmall {
                geometry,
                reason: "the [ OK ] control does not fit",
            });
        }

        let options = if config.centered {
            options.iter().map(|option| center(option, width)).collect()
        } else {
            options
        };
        let state = SelectionState::new(options.len(), config.multi);
        Ok(Self {
            layer,
            options,
            config,
            state,
        })
    }

    /// Options as drawn (padded when centered).
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn config(&self) -> SelectionOptions {
        self.config
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Run the modal loop until the list is confirmed or dismissed.
    ///
    /// Returns the selected indices and whether any were selected. Once the
    /// loop has ended, later calls return the same result without reading
    /// keys.
    pub fn run(&mut self) -> Result<(BTreeSet<usize>, bool)> {
        self.layer.set_cursor_visible(false)?;
        while !self.state.is_terminated() {
            self.draw()?;
            let key = self.layer.read_key()?;
            self.state.handle_key(key);
            tracing::trace!(?key, highlight = self.state.highlight(), "selection key");
        }
        self.layer.refresh()?;

        let selected = self.state.selected().clone();
        let success = !selected.is_empty();
        tracing::debug!(?selected, success, "selection finished");
        Ok((selected, success))
    }

    /// Paint every option, and the `[ OK ]` control in multi mode.
    pub fn draw(&self) -> Result<()> {
        for (index, option) in self.options.iter().enumerate() {
            let attr = if self.state.is_emphasized(index) {
                Attr::REVERSE
            } else {
                Attr::NORMAL
            };
            self.layer.attr_set(attr)?;
            self.layer.write_at(index as u16, 1, option)?;
        }
        self.layer.attr_set(Attr::NORMAL)?;

        if self.config.multi {
            let (y, x) = ok_position(self.layer.content_geometry()?);
            if self.state.on_ok() {
                self.layer.attr_set(Attr::REVERSE)?;
            }
            self.layer.write_at(y, x, OK_LABEL)?;
            self.layer.attr_set(Attr::NORMAL)?;
        }
        Ok(())
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text_width(text);
    let left = width.saturating_sub(len) / 2;
    let right = width.saturating_sub(len + left);
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

// ===========================================================================
// Tests
// ===========================================================================
