//! Screen and surfaces: the character-cell primitive layer.
//!
//! [`Screen`] is a cheap, cloneable handle to the terminal state: an arena of
//! surface buffers, the composed screen, the optional crossterm [`Driver`] and,
//! in headless mode, a queue of scripted keys. [`Surface`] is an owned handle
//! to one drawable region. Every write refreshes its surface immediately, and
//! dropping a `Surface` erases its region and frees it.
//!
//! Everything runs on one thread; the shared state lives in an
//! `Rc<RefCell<_>>` and no borrow is held across calls.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::event::input::{InputEvent, Key};
use crate::geometry::Geometry;
use crate::render::cell::Attr;
use crate::render::compositor::Compositor;
use crate::render::driver::Driver;
use crate::render::surface::{SurfaceBuffer, SurfaceId};

// ---------------------------------------------------------------------------
// ScreenConfig
// ---------------------------------------------------------------------------

/// Terminal setup applied by [`Screen::new`].
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Switch to the alternate screen while the `Screen` lives.
    pub alternate_screen: bool,
    /// Start with the hardware cursor hidden.
    pub hide_cursor: bool,
    /// Optional terminal window title.
    pub title: Option<String>,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            hide_cursor: true,
            title: None,
        }
    }
}

impl ScreenConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the alternate screen (builder).
    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    /// Start with the cursor hidden or shown (builder).
    pub fn with_hidden_cursor(mut self, hidden: bool) -> Self {
        self.hide_cursor = hidden;
        self
    }

    /// Set the terminal window title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

// ---------------------------------------------------------------------------
// ScreenState
// ---------------------------------------------------------------------------

struct ScreenState {
    surfaces: SlotMap<SurfaceId, SurfaceBuffer>,
    /// Creation order, used to repaint after a terminal resize.
    order: Vec<SurfaceId>,
    compositor: Compositor,
    /// Last frame sent to the terminal.
    flushed: Compositor,
    driver: Option<Driver>,
    scripted: VecDeque<Key>,
    cursor_visible: bool,
    /// Absolute `(y, x)` of the terminal cursor: the cursor of the surface
    /// refreshed last.
    cursor: (u16, u16),
}

impl ScreenState {
    fn new(width: u16, height: u16, driver: Option<Driver>, cursor_visible: bool) -> Self {
        let compositor = Compositor::new(width, height);
        Self {
            surfaces: SlotMap::with_key(),
            order: Vec::new(),
            flushed: compositor.clone(),
            compositor,
            driver,
            scripted: VecDeque::new(),
            cursor_visible,
            cursor: (0, 0),
        }
    }

    fn buffer(&self, id: SurfaceId) -> Result<&SurfaceBuffer> {
        self.surfaces.get(id).ok_or(Error::StaleSurface)
    }

    fn buffer_mut(&mut self, id: SurfaceId) -> Result<&mut SurfaceBuffer> {
        self.surfaces.get_mut(id).ok_or(Error::StaleSurface)
    }

    /// Composite one surface on top of the screen and flush.
    fn refresh(&mut self, id: SurfaceId) -> Result<()> {
        let buffer = self.surfaces.get_mut(id).ok_or(Error::StaleSurface)?;
        self.compositor.place(buffer);
        buffer.untouch();
        let origin = buffer.geometry();
        let (cy, cx) = buffer.cursor();
        self.cursor = (origin.y.saturating_add(cy), origin.x.saturating_add(cx));
        self.flush()
    }

    /// Send the changed cells and the cursor state to the terminal.
    fn flush(&mut self) -> Result<()> {
        let Some(driver) = self.driver.as_mut() else {
            return Ok(());
        };
        let updates = self.compositor.diff(&self.flushed);
        driver.apply_updates(&updates)?;
        let (y, x) = self.cursor;
        driver.place_cursor(self.cursor_visible.then_some((x, y)))?;
        driver.flush()?;
        self.flushed.clone_from(&self.compositor);
        Ok(())
    }

    fn handle_resize(&mut self, width: u16, height: u16) -> Result<()> {
        tracing::debug!(width, height, "terminal resized");
        self.compositor.resize(width, height);
        // Force a full repaint on the next flush.
        self.flushed.resize(0, 0);
        for id in &self.order {
            if let Some(buffer) = self.surfaces.get(*id) {
                self.compositor.place_all(buffer);
            }
        }
        self.flush()
    }

    fn next_key(&mut self) -> Result<Key> {
        loop {
            let event = match self.driver.as_mut() {
                Some(driver) => driver.read_event()?,
                None => return self.scripted.pop_front().ok_or(Error::InputExhausted),
            };
            match event {
                InputEvent::Key(key) => return Ok(key),
                InputEvent::Resize { width, height } => self.handle_resize(width, height)?,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// Shared handle to the terminal and all surfaces on it.
#[derive(Clone)]
pub struct Screen {
    state: Rc<RefCell<ScreenState>>,
}

impl Screen {
    /// Take over the real terminal: raw mode, optional alternate screen and
    /// title. The terminal is restored when the last handle is dropped.
    pub fn new(config: ScreenConfig) -> Result<Self> {
        let (width, height) = Driver::terminal_size()?;
        let mut driver = Driver::new()?;
        driver.enter(config.alternate_screen)?;
        if let Some(title) = &config.title {
            driver.set_title(title)?;
        }
        tracing::debug!(width, height, "screen opened");
        let mut state = ScreenState::new(width, height, Some(driver), !config.hide_cursor);
        // Paint the initial (blank) cursor state.
        state.flush()?;
        Ok(Self::from_state(state))
    }

    /// A screen with no terminal behind it. Keys come from
    /// [`push_key`](Self::push_key); reading past the last one fails with
    /// [`Error::InputExhausted`].
    pub fn headless(width: u16, height: u16) -> Self {
        Self::from_state(ScreenState::new(width, height, None, false))
    }

    fn from_state(state: ScreenState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Maximum `(height, width)` available for surfaces.
    pub fn limits(&self) -> (u16, u16) {
        let state = self.state.borrow();
        (state.compositor.height, state.compositor.width)
    }

    /// Whether the screen drives a real terminal.
    pub fn has_driver(&self) -> bool {
        self.state.borrow().driver.is_some()
    }

    /// Allocate a blank surface covering `geometry`.
    pub fn create_surface(&self, geometry: Geometry) -> Result<Surface> {
        if geometry.is_empty() {
            return Err(Error::GeometryTooSmall {
                geometry,
                reason: "surfaces need at least one cell",
            });
        }
        let mut state = self.state.borrow_mut();
        let (width, height) = (state.compositor.width, state.compositor.height);
        if geometry.bottom() > height as u32 || geometry.right() > width as u32 {
            return Err(Error::OffScreen {
                geometry,
                width,
                height,
            });
        }
        let id = state.surfaces.insert(SurfaceBuffer::new(geometry));
        state.order.push(id);
        tracing::debug!(%geometry, "surface created");
        Ok(Surface {
            id,
            screen: self.clone(),
        })
    }

    /// Show or hide the hardware cursor.
    pub fn set_cursor_visible(&self, visible: bool) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.cursor_visible = visible;
        state.flush()
    }

    /// Absolute `(y, x)` of the cursor, or `None` while it is hidden.
    pub fn cursor(&self) -> Option<(u16, u16)> {
        let state = self.state.borrow();
        state.cursor_visible.then_some(state.cursor)
    }

    /// Queue a key for a headless screen.
    pub fn push_key(&self, key: Key) {
        self.state.borrow_mut().scripted.push_back(key);
    }

    /// Queue several keys for a headless screen.
    pub fn push_keys(&self, keys: impl IntoIterator<Item = Key>) {
        self.state.borrow_mut().scripted.extend(keys);
    }

    /// Scripted keys not consumed yet.
    pub fn pending_keys(&self) -> usize {
        self.state.borrow().scripted.len()
    }

    /// Number of live surfaces.
    pub fn surface_count(&self) -> usize {
        self.state.borrow().surfaces.len()
    }

    /// A copy of the composed screen.
    pub fn compositor(&self) -> Compositor {
        self.state.borrow().compositor.clone()
    }

    /// Simulate a terminal resize.
    pub fn resize(&self, width: u16, height: u16) -> Result<()> {
        self.state.borrow_mut().handle_resize(width, height)
    }

    fn with_buffer<R>(&self, id: SurfaceId, f: impl FnOnce(&mut SurfaceBuffer) -> R) -> Result<R> {
        let mut state = self.state.borrow_mut();
        let out = f(state.buffer_mut(id)?);
        Ok(out)
    }

    /// Mutate a surface buffer, then refresh it.
    fn draw<R>(&self, id: SurfaceId, f: impl FnOnce(&mut SurfaceBuffer) -> R) -> Result<R> {
        let mut state = self.state.borrow_mut();
        let out = f(state.buffer_mut(id)?);
        state.refresh(id)?;
        Ok(out)
    }

    fn destroy(&self, id: SurfaceId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let buffer = state.surfaces.remove(id).ok_or(Error::StaleSurface)?;
        state.order.retain(|other| *other != id);
        state.compositor.blank(buffer.geometry());
        tracing::debug!(geometry = %buffer.geometry(), "surface destroyed");
        state.flush()
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// An owned drawable region of the screen.
///
/// Coordinates passed to the drawing methods are surface-relative `(y, x)`.
/// Text that runs past the right edge is cut off.
pub struct Surface {
    id: SurfaceId,
    screen: Screen,
}

impl Surface {
    /// Arena id of this surface.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// The screen this surface lives on.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Current placement.
    pub fn geometry(&self) -> Result<Geometry> {
        let state = self.screen.state.borrow();
        Ok(state.buffer(self.id)?.geometry())
    }

    /// Surface-relative cursor `(y, x)`.
    pub fn cursor(&self) -> Result<(u16, u16)> {
        let state = self.screen.state.borrow();
        Ok(state.buffer(self.id)?.cursor())
    }

    /// A copy of the surface's cells.
    pub fn snapshot(&self) -> Result<SurfaceBuffer> {
        let state = self.screen.state.borrow();
        Ok(state.buffer(self.id)?.clone())
    }

    // ── Writing ──────────────────────────────────────────────────────

    /// Write `text` at `(y, x)`.
    pub fn write_at(&self, y: u16, x: u16, text: &str) -> Result<()> {
        self.screen.draw(self.id, |buf| {
            buf.move_cursor(y, x);
            buf.write_str(text);
        })
    }

    /// Write `text` at the cursor.
    pub fn write(&self, text: &str) -> Result<()> {
        self.screen.draw(self.id, |buf| buf.write_str(text))
    }

    /// Write one character (or glyph) at `(y, x)`.
    pub fn write_char(&self, y: u16, x: u16, ch: impl Into<char>) -> Result<()> {
        let ch = ch.into();
        self.screen.draw(self.id, |buf| {
            buf.move_cursor(y, x);
            buf.put_char(ch);
        })
    }

    /// Write one character (or glyph) at the cursor.
    pub fn put_char(&self, ch: impl Into<char>) -> Result<()> {
        let ch = ch.into();
        self.screen.draw(self.id, |buf| buf.put_char(ch))
    }

    /// Draw a single-line border around the surface edge.
    pub fn draw_border(&self) -> Result<()> {
        self.screen.draw(self.id, SurfaceBuffer::draw_border)
    }

    /// Blank from the cursor to the end of its row.
    pub fn clear_to_eol(&self) -> Result<()> {
        self.screen.draw(self.id, SurfaceBuffer::clear_to_eol)
    }

    // ── Whole-surface operations ─────────────────────────────────────

    /// Blank the surface without refreshing it.
    pub fn erase(&self) -> Result<()> {
        self.screen.with_buffer(self.id, SurfaceBuffer::erase)
    }

    /// Blank the surface and repaint the whole terminal on the next flush.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.screen.state.borrow_mut();
        state.buffer_mut(self.id)?.erase();
        state.flushed.resize(0, 0);
        Ok(())
    }

    /// Composite the surface onto the screen and flush.
    pub fn refresh(&self) -> Result<()> {
        self.screen.state.borrow_mut().refresh(self.id)
    }

    /// Change the surface size; the origin stays put.
    pub fn resize(&self, height: u16, width: u16) -> Result<()> {
        if height == 0 || width == 0 {
            return Err(Error::GeometryTooSmall {
                geometry: self.geometry()?.with_size(height, width),
                reason: "surfaces need at least one cell",
            });
        }
        let mut state = self.screen.state.borrow_mut();
        let old = state.buffer(self.id)?.geometry();
        state.buffer_mut(self.id)?.resize(height, width);
        // Uncover whatever the old extent painted.
        state.compositor.blank(old);
        tracing::debug!(from = %old, height, width, "surface resized");
        Ok(())
    }

    /// Move the surface to a new screen origin.
    pub fn move_to(&self, y: u16, x: u16) -> Result<()> {
        let mut state = self.screen.state.borrow_mut();
        let old = state.buffer(self.id)?.geometry();
        state.buffer_mut(self.id)?.move_to(y, x);
        state.compositor.blank(old);
        Ok(())
    }

    /// Move the surface cursor to `(y, x)`.
    pub fn move_cursor(&self, y: u16, x: u16) -> Result<()> {
        self.screen.with_buffer(self.id, |buf| buf.move_cursor(y, x))
    }

    // ── Attributes ───────────────────────────────────────────────────

    pub fn attr_on(&self, attr: Attr) -> Result<()> {
        self.screen.with_buffer(self.id, |buf| buf.attr_on(attr))
    }

    pub fn attr_off(&self, attr: Attr) -> Result<()> {
        self.screen.with_buffer(self.id, |buf| buf.attr_off(attr))
    }

    pub fn attr_set(&self, attr: Attr) -> Result<()> {
        self.screen.with_buffer(self.id, |buf| buf.attr_set(attr))
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Refresh this surface, then block for the next key.
    pub fn read_key(&self) -> Result<Key> {
        let mut state = self.screen.state.borrow_mut();
        state.refresh(self.id)?;
        let key = state.next_key()?;
        tracing::trace!(?key, "key read");
        Ok(key)
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        if let Err(err) = self.screen.destroy(self.id) {
            tracing::warn!("failed to destroy surface: {err}");
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::cell::Glyph;

    fn row(screen: &Screen, y: u16) -> String {
        let c = screen.compositor();
        (0..c.width)
            .filter_map(|x| c.get_cell(x, y))
            .map(|cell| cell.ch)
            .collect::<String>()
            .trim_end()
            .to_owned()
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn headless_has_no_driver() {
        let screen = Screen::headless(80, 24);
        assert!(!screen.has_driver());
        assert_eq!(screen.limits(), (24, 80));
        assert_eq!(screen.surface_count(), 0);
    }

    #[test]
    fn config_builder() {
        let config = ScreenConfig::new()
            .with_alternate_screen(false)
            .with_hidden_cursor(false)
            .with_title("demo");
        assert!(!config.alternate_screen);
        assert!(!config.hide_cursor);
        assert_eq!(config.title.as_deref(), Some("demo"));
    }

    #[test]
    fn config_defaults() {
        let config = ScreenConfig::default();
        assert!(config.alternate_screen);
        assert!(config.hide_cursor);
        assert!(config.title.is_none());
    }

    // ── Surfaces ─────────────────────────────────────────────────────

    #[test]
    fn create_rejects_empty_geometry() {
        let screen = Screen::headless(10, 5);
        let err = screen.create_surface(Geometry::new(0, 3, 0, 0)).err();
        assert!(matches!(err, Some(Error::GeometryTooSmall { .. })));
    }

    #[test]
    fn create_rejects_off_screen_geometry() {
        let screen = Screen::headless(10, 5);
        let err = screen.create_surface(Geometry::new(3, 3, 4, 0)).err();
        assert!(matches!(err, Some(Error::OffScreen { .. })));
    }

    #[test]
    fn writes_are_visible_immediately() {
        let screen = Screen::headless(10, 3);
        let surface = screen.create_surface(Geometry::new(2, 6, 1, 2)).unwrap();
        surface.write_at(1, 1, "hi").unwrap();
        assert_eq!(row(&screen, 2), "   hi");
    }

    #[test]
    fn write_continues_at_cursor() {
        let screen = Screen::headless(10, 1);
        let surface = screen.create_surface(Geometry::sized(1, 10)).unwrap();
        surface.write_at(0, 0, "ab").unwrap();
        surface.write("cd").unwrap();
        surface.put_char('e').unwrap();
        assert_eq!(row(&screen, 0), "abcde");
    }

    #[test]
    fn write_char_accepts_glyphs() {
        let screen = Screen::headless(3, 1);
        let surface = screen.create_surface(Geometry::sized(1, 3)).unwrap();
        surface.write_char(0, 1, Glyph::Cross).unwrap();
        assert_eq!(row(&screen, 0), " ┼");
    }

    #[test]
    fn drop_erases_and_frees() {
        let screen = Screen::headless(10, 3);
        {
            let surface = screen.create_surface(Geometry::sized(3, 5)).unwrap();
            surface.draw_border().unwrap();
            assert_eq!(screen.surface_count(), 1);
            assert_eq!(row(&screen, 0), "┌───┐");
        }
        assert_eq!(screen.surface_count(), 0);
        assert_eq!(row(&screen, 0), "");
    }

    #[test]
    fn erase_needs_refresh_to_show() {
        let screen = Screen::headless(10, 1);
        let surface = screen.create_surface(Geometry::sized(1, 10)).unwrap();
        surface.write_at(0, 0, "text").unwrap();
        surface.erase().unwrap();
        assert_eq!(row(&screen, 0), "text");
        surface.refresh().unwrap();
        assert_eq!(row(&screen, 0), "");
    }

    #[test]
    fn resize_uncovers_old_extent() {
        let screen = Screen::headless(10, 2);
        let surface = screen.create_surface(Geometry::sized(2, 10)).unwrap();
        surface.write_at(1, 0, "bottom").unwrap();
        surface.resize(1, 4).unwrap();
        surface.refresh().unwrap();
        assert_eq!(row(&screen, 1), "");
        assert_eq!(surface.geometry().unwrap(), Geometry::sized(1, 4));
    }

    #[test]
    fn resize_to_zero_is_rejected() {
        let screen = Screen::headless(10, 2);
        let surface = screen.create_surface(Geometry::sized(2, 10)).unwrap();
        assert!(surface.resize(0, 4).is_err());
    }

    #[test]
    fn move_to_relocates() {
        let screen = Screen::headless(10, 2);
        let surface = screen.create_surface(Geometry::sized(1, 2)).unwrap();
        surface.write_at(0, 0, "ab").unwrap();
        surface.move_to(1, 3).unwrap();
        surface.refresh().unwrap();
        assert_eq!(row(&screen, 0), "");
        assert_eq!(row(&screen, 1), "   ab");
    }

    #[test]
    fn attributes_apply_to_later_writes() {
        let screen = Screen::headless(4, 1);
        let surface = screen.create_surface(Geometry::sized(1, 4)).unwrap();
        surface.attr_on(Attr::REVERSE).unwrap();
        surface.write_at(0, 0, "a").unwrap();
        surface.attr_off(Attr::REVERSE).unwrap();
        surface.write("b").unwrap();
        let c = screen.compositor();
        assert_eq!(c.get_cell(0, 0).map(|cell| cell.attr), Some(Attr::REVERSE));
        assert_eq!(c.get_cell(1, 0).map(|cell| cell.attr), Some(Attr::NORMAL));
    }

    // ── Cursor ───────────────────────────────────────────────────────

    #[test]
    fn cursor_follows_last_refreshed_surface() {
        let screen = Screen::headless(20, 5);
        let surface = screen.create_surface(Geometry::new(2, 10, 2, 3)).unwrap();
        assert_eq!(screen.cursor(), None);
        screen.set_cursor_visible(true).unwrap();
        surface.move_cursor(1, 4).unwrap();
        surface.refresh().unwrap();
        assert_eq!(screen.cursor(), Some((3, 7)));
    }

    // ── Input ────────────────────────────────────────────────────────

    #[test]
    fn scripted_keys_in_order() {
        let screen = Screen::headless(10, 2);
        let surface = screen.create_surface(Geometry::sized(1, 1)).unwrap();
        screen.push_keys([Key::Up, Key::Enter]);
        assert_eq!(screen.pending_keys(), 2);
        assert_eq!(surface.read_key().unwrap(), Key::Up);
        assert_eq!(surface.read_key().unwrap(), Key::Enter);
        assert!(matches!(surface.read_key(), Err(Error::InputExhausted)));
    }

    #[test]
    fn resize_repaints_live_surfaces() {
        let screen = Screen::headless(10, 2);
        let surface = screen.create_surface(Geometry::sized(1, 3)).unwrap();
        surface.write_at(0, 0, "abc").unwrap();
        screen.resize(20, 4).unwrap();
        assert_eq!(screen.limits(), (4, 20));
        assert_eq!(row(&screen, 0), "abc");
    }
}
