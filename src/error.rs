//! Crate error type.
//!
//! Construction misuse (undersized geometry, mismatched column widths, empty
//! option lists) is reported here at construction time. Terminal failures
//! arrive as [`Error::Io`] and are fatal to the caller.

use std::io;

use crate::geometry::Geometry;

/// Errors produced by layers, widgets and the screen.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("geometry {geometry} is too small: {reason}")]
    GeometryTooSmall {
        geometry: Geometry,
        reason: &'static str,
    },

    #[error("geometry {geometry} does not fit on a {width}x{height} screen")]
    OffScreen {
        geometry: Geometry,
        width: u16,
        height: u16,
    },

    #[error("title {title:?} does not fit in {available} cells")]
    TitleTooWide { title: String, available: usize },

    #[error("selection needs at least one option")]
    EmptyOptions,

    #[error("option {index} is {len} cells wide, only {available} fit")]
    OptionTooWide {
        index: usize,
        len: usize,
        available: usize,
    },

    #[error("{rows} rows do not fit in a surface {available} rows high")]
    TooManyRows { rows: usize, available: usize },

    #[error("table needs at least one column")]
    NoColumns,

    #[error("expected {expected} column widths, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("expected one edit strategy per field ({expected}), got {actual}")]
    StrategyCountMismatch { expected: usize, actual: usize },

    #[error("no more scripted input")]
    InputExhausted,

    #[error("surface no longer exists")]
    StaleSurface,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
