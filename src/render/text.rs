//! Display width of text in terminal cells.
//!
//! Wide characters (most CJK ideographs, many emoji) take two cells, combining
//! marks take none. Control characters are drawn as a blank, so they count as
//! one cell. Every width calculation in the widgets goes through here so that
//! borders line up with what the terminal actually prints.

use unicode_width::UnicodeWidthChar;

/// Cells taken by `ch` on screen.
pub fn char_width(ch: char) -> usize {
    if ch.is_control() {
        return 1;
    }
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Cells taken by `text` on screen.
pub fn text_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Longest prefix of `text` that fits in `max` cells.
pub fn truncate(text: &str, max: usize) -> &str {
    let mut used = 0;
    for (index, ch) in text.char_indices() {
        used += char_width(ch);
        if used > max {
            return &text[..index];
        }
    }
    text
}

/// Longest suffix of `text` that fits in `max` cells.
pub fn tail(text: &str, max: usize) -> &str {
    let mut used = 0;
    for (index, ch) in text.char_indices().rev() {
        used += char_width(ch);
        if used > max {
            return &text[index + ch.len_utf8()..];
        }
    }
    text
}

/// `text` cut to `width` cells and padded with spaces on the right.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let mut padded = cut.to_owned();
    padded.extend(std::iter::repeat(' ').take(width - text_width(cut)));
    padded
}
