//! Layered windows: plain, boxed and decorated surface stacks.
//!
//! A [`Layer`] composes one to three surfaces:
//!
//! - **Plain**: a single content surface.
//! - **Boxed**: a bordered frame surface plus a content surface inset by one
//!   cell on every side.
//! - **Decorated**: a boxed layer whose content is pushed down to make room for
//!   a bordered title band (3 rows) just below the frame's top edge, holding a
//!   centered, immutable title.
//!
//! The content geometry is always derived from the layer geometry by
//! [`LayerKind::content_geometry`], so resizing re-applies the same inset.
//! Surfaces are released title first, then frame, then content.

use crate::error::{Error, Result};
use crate::event::input::Key;
use crate::geometry::Geometry;
use crate::render::cell::Attr;
use crate::render::text::text_width;
use crate::screen::{Screen, Surface};

/// Rows of the title band, including its border.
pub const TITLE_HEIGHT: u16 = 3;

/// Rows a decorated layer reserves around its content: the frame's top and
/// bottom edges plus the title band.
pub const DECORATION_HEIGHT: u16 = 5;

// ---------------------------------------------------------------------------
// LayerKind
// ---------------------------------------------------------------------------

/// Nesting style of a [`Layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Plain,
    Boxed,
    Decorated,
}

impl LayerKind {
    /// Geometry of the content surface for a layer placed at `outer`.
    ///
    /// Returns `None` when `outer` leaves no room for content.
    pub fn content_geometry(self, outer: Geometry) -> Option<Geometry> {
        match self {
            LayerKind::Plain => (!outer.is_empty()).then_some(outer),
            LayerKind::Boxed => outer.inset(1, 1, 1, 1),
            LayerKind::Decorated => outer.inset(DECORATION_HEIGHT - 1, 1, 1, 1),
        }
    }

    /// Geometry of the title band, for decorated layers.
    pub fn title_geometry(self, outer: Geometry) -> Option<Geometry> {
        match self {
            LayerKind::Decorated => {
                let band = outer.inset(1, 1, 0, 1)?;
                (band.height >= TITLE_HEIGHT).then_some(band.with_size(TITLE_HEIGHT, band.width))
            }
            _ => None,
        }
    }

    fn too_small(self, geometry: Geometry) -> Error {
        let reason = match self {
            LayerKind::Plain => "plain layers need at least one cell",
            LayerKind::Boxed => "boxed layers need 3x3 cells for border and content",
            LayerKind::Decorated => "decorated layers need 6 rows and 3 columns",
        };
        Error::GeometryTooSmall { geometry, reason }
    }
}

/// Column at which `title` starts when centered in a band `width` cells wide.
fn title_column(width: u16, title: &str) -> u16 {
    let len = u16::try_from(text_width(title)).unwrap_or(u16::MAX);
    width.saturating_sub(len) / 2
}

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// A stack of owned surfaces drawn as one window.
///
/// Drawing methods act on the content surface; coordinates are relative to
/// it.
pub struct Layer {
    kind: LayerKind,
    geometry: Geometry,
    title: Option<String>,
    content: Surface,
    frame: Option<Surface>,
    title_band: Option<Surface>,
}

impl Layer {
    /// A single surface covering `geometry`.
    pub fn plain(screen: &Screen, geometry: Geometry) -> Result<Self> {
        let content_geometry = LayerKind::Plain
            .content_geometry(geometry)
            .ok_or_else(|| LayerKind::Plain.too_small(geometry))?;
        Ok(Self {
            kind: LayerKind::Plain,
            geometry,
            title: None,
            content: screen.create_surface(content_geometry)?,
            frame: None,
            title_band: None,
        })
    }

    /// A bordered frame with a content surface inset by one cell.
    pub fn boxed(screen: &Screen, geometry: Geometry) -> Result<Self> {
        let content_geometry = LayerKind::Boxed
            .content_geometry(geometry)
            .ok_or_else(|| LayerKind::Boxed.too_small(geometry))?;
        let frame = screen.create_surface(geometry)?;
        frame.draw_border()?;
        let content = screen.create_surface(content_geometry)?;
        Ok(Self {
            kind: LayerKind::Boxed,
            geometry,
            title: None,
            content,
            frame: Some(frame),
            title_band: None,
        })
    }

    /// A bordered frame with a title band above the content.
    ///
    /// The title must fit inside the band's border.
    pub fn decorated(screen: &Screen, title: impl Into<String>, geometry: Geometry) -> Result<Self> {
        let title = title.into();
        let kind = LayerKind::Decorated;
        let (Some(content_geometry), Some(title_geometry)) =
            (kind.content_geometry(geometry), kind.title_geometry(geometry))
        else {
            return Err(kind.too_small(geometry));
        };
        let available = title_geometry.width.saturating_sub(2) as usize;
        if text_width(&title) > available {
            return Err(Error::TitleTooWide { title, available });
        }

        let frame = screen.create_surface(geometry)?;
        frame.draw_border()?;
        let content = screen.create_surface(content_geometry)?;
        let title_band = screen.create_surface(title_geometry)?;
        title_band.draw_border()?;
        title_band.write_at(1, title_column(title_geometry.width, &title), &title)?;
        title_band.refresh()?;

        Ok(Self {
            kind,
            geometry,
            title: Some(title),
            content,
            frame: Some(frame),
            title_band: Some(title_band),
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Outer geometry of the whole stack.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Geometry of the content surface.
    pub fn content_geometry(&self) -> Result<Geometry> {
        self.content.geometry()
    }

    /// The immutable title of a decorated layer.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The content surface.
    pub fn content(&self) -> &Surface {
        &self.content
    }

    /// Screen `(height, width)`.
    pub fn limits(&self) -> (u16, u16) {
        self.content.screen().limits()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Refresh content, frame and title band, in that order.
    pub fn refresh(&self) -> Result<()> {
        self.content.refresh()?;
        if let Some(frame) = &self.frame {
            frame.refresh()?;
        }
        if let Some(band) = &self.title_band {
            band.refresh()?;
        }
        Ok(())
    }

    /// Redraw the title with `attr` applied.
    ///
    /// The attribute is switched on, the stored title rewritten and the
    /// attribute switched off again, so calls never accumulate. No-op for
    /// layers without a title.
    pub fn set_title_attribute(&self, attr: Attr) -> Result<()> {
        let (Some(band), Some(title)) = (&self.title_band, &self.title) else {
            return Ok(());
        };
        let width = band.geometry()?.width;
        band.attr_on(attr)?;
        band.write_at(1, title_column(width, title), title)?;
        band.attr_off(attr)?;
        band.refresh()
    }

    /// Resize the whole stack, keeping its origin.
    ///
    /// Frame and title band are redrawn; the content surface keeps whatever
    /// of its cells still fit and is left for the owner to repaint.
    pub fn resize(&mut self, height: u16, width: u16) -> Result<()> {
        let geometry = self.geometry.with_size(height, width);
        let content_geometry = self
            .kind
            .content_geometry(geometry)
            .ok_or_else(|| self.kind.too_small(geometry))?;
        let title_geometry = match self.kind {
            LayerKind::Decorated => Some(
                self.kind
                    .title_geometry(geometry)
                    .ok_or_else(|| self.kind.too_small(geometry))?,
            ),
            _ => None,
        };
        if let (Some(band), Some(title)) = (&title_geometry, &self.title) {
            let available = band.width.saturating_sub(2) as usize;
            if text_width(title) > available {
                return Err(Error::TitleTooWide {
                    title: title.clone(),
                    available,
                });
            }
        }

        if let Some(frame) = &self.frame {
            frame.resize(height, width)?;
            frame.erase()?;
            frame.draw_border()?;
        }
        self.content
            .resize(content_geometry.height, content_geometry.width)?;
        if let (Some(band), Some(band_geometry), Some(title)) =
            (&self.title_band, title_geometry, &self.title)
        {
            band.resize(band_geometry.height, band_geometry.width)?;
            band.erase()?;
            band.draw_border()?;
            band.write_at(1, title_column(band_geometry.width, title), title)?;
        }
        self.geometry = geometry;
        self.content.refresh()
    }

    // ── Content drawing ──────────────────────────────────────────────

    pub fn write_at(&self, y: u16, x: u16, text: &str) -> Result<()> {
        self.content.write_at(y, x, text)
    }

    pub fn write(&self, text: &str) -> Result<()> {
        self.content.write(text)
    }

    pub fn write_char(&self, y: u16, x: u16, ch: impl Into<char>) -> Result<()> {
        self.content.write_char(y, x, ch)
    }

    pub fn put_char(&self, ch: impl Into<char>) -> Result<()> {
        self.content.put_char(ch)
    }

    pub fn clear(&self) -> Result<()> {
        self.content.clear()
    }

    pub fn erase(&self) -> Result<()> {
        self.content.erase()
    }

    pub fn clear_to_eol(&self) -> Result<()> {
        self.content.clear_to_eol()
    }

    pub fn move_cursor(&self, y: u16, x: u16) -> Result<()> {
        self.content.move_cursor(y, x)
    }

    pub fn attr_on(&self, attr: Attr) -> Result<()> {
        self.content.attr_on(attr)
    }

    pub fn attr_off(&self, attr: Attr) -> Result<()> {
        self.content.attr_off(attr)
    }

    pub fn attr_set(&self, attr: Attr) -> Result<()> {
        self.content.attr_set(attr)
    }

    /// Block for the next key, with the content surface refreshed.
    pub fn read_key(&self) -> Result<Key> {
        self.content.read_key()
    }

    /// Show or hide the hardware cursor.
    pub fn set_cursor_visible(&self, visible: bool) -> Result<()> {
        self.content.screen().set_cursor_visible(visible)
    }
}

impl Drop for Layer {
    fn drop(&mut self) {
        // Title band, then frame; `content` is dropped after this body.
        drop(self.title_band.take());
        drop(self.frame.take());
    }
}

// ===========================================================================
// Tests
// ===========================================================================
