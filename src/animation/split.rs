//! Text splitting into per-character animation units.
//!
//! Splits on grapheme clusters so that combined glyphs animate as one unit,
//! and records each unit's column so the painter can place them back on the
//! line. Whitespace is kept for spacing but is not an animated character.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// One grapheme of split text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharUnit {
    pub text: String,
    /// Column offset from the start of the line.
    pub column: u16,
    /// Display width in cells.
    pub width: u16,
    pub is_space: bool,
}

/// Result of splitting a line of text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitText {
    units: Vec<CharUnit>,
    width: u16,
}

impl SplitText {
    /// Every unit including whitespace.
    pub fn units(&self) -> &[CharUnit] {
        &self.units
    }

    /// The animated character units, in source order.
    pub fn chars(&self) -> impl Iterator<Item = &CharUnit> {
        self.units.iter().filter(|u| !u.is_space)
    }

    pub fn char_count(&self) -> usize {
        self.chars().count()
    }

    /// Total display width in cells.
    pub fn width(&self) -> u16 {
        self.width
    }
}

/// Split `text` into grapheme units.
pub fn split_chars(text: &str) -> SplitText {
    let mut units = Vec::new();
    let mut column: u16 = 0;

    for grapheme in text.graphemes(true) {
        let width = UnicodeWidthStr::width(grapheme) as u16;
        let is_space = grapheme.chars().all(char::is_whitespace);
        units.push(CharUnit {
            text: grapheme.to_string(),
            column,
            width,
            is_space,
        });
        column = column.saturating_add(width);
    }

    SplitText {
        units,
        width: column,
    }
}
