//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of Cells holding what should be on screen.
//! The page paints into it in layers (rays, tiles, content) and the diff
//! renderer writes it out.
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Clipping**: drawing functions accept an optional `ClipRect`.
//! - **Alpha blending**: translucent backgrounds blend with the cell below.
//! - **Wide characters**: the cell after a wide glyph is a continuation (char 0).

use unicode_width::UnicodeWidthChar;

use crate::types::{Attr, Cell, ClipRect, Rgba};

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    /// Create a new buffer with a specific background color.
    pub fn with_background(width: u16, height: u16, bg: Rgba) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.clear_with_bg(bg);
        buffer
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer bounds as a ClipRect.
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Clear with a specific background color.
    pub fn clear_with_bg(&mut self, bg: Rgba) {
        for cell in &mut self.cells {
            *cell = Cell {
                char: b' ' as u32,
                fg: Rgba::TERMINAL_DEFAULT,
                bg,
                attrs: Attr::NONE,
            };
        }
    }

    /// Resize the buffer (clears content).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width as usize * height as usize, Cell::default());
    }

    /// Text of row `y` with continuation cells dropped.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter_map(|cell| char::from_u32(cell.char).filter(|_| cell.char != 0))
            .collect()
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Blend `bg` over the existing background of one cell, keeping its glyph.
    pub fn tint(&mut self, x: u16, y: u16, bg: Rgba, clip: Option<&ClipRect>) -> bool {
        if clip.is_some_and(|c| !c.contains(x, y)) {
            return false;
        }
        let Some(cell) = self.get_mut(x, y) else {
            return false;
        };
        cell.bg = Rgba::blend(bg, cell.bg);
        true
    }

    /// Set a single cell with optional clipping.
    ///
    /// Returns true if the cell was set.
    pub fn set_cell(&mut self, x: u16, y: u16, char: u32, fg: Rgba, bg: Rgba, attrs: Attr, clip: Option<&ClipRect>) -> bool {
        if !self.in_bounds(x, y) || clip.is_some_and(|c| !c.contains(x, y)) {
            return false;
        }

        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        cell.bg = Rgba::blend(bg, cell.bg);
        cell.char = char;
        cell.fg = fg;
        cell.attrs = attrs;
        true
    }

    /// Fill a rectangle with a background color, blending translucent fills.
    pub fn fill_rect(&mut self, rect: ClipRect, bg: Rgba, clip: Option<&ClipRect>) {
        let Some(rect) = rect.intersect(&self.bounds()) else {
            return;
        };
        let rect = match clip {
            Some(clip) => match rect.intersect(clip) {
                Some(r) => r,
                None => return,
            },
            None => rect,
        };

        for y in rect.y..rect.y + rect.height {
            let start = self.index(rect.x, y);
            let end = start + rect.width as usize;
            for cell in &mut self.cells[start..end] {
                cell.bg = Rgba::blend(bg, cell.bg);
            }
        }
    }

    /// Draw a single character over the existing background.
    pub fn draw_char(&mut self, x: u16, y: u16, ch: char, fg: Rgba, attrs: Attr, clip: Option<&ClipRect>) -> bool {
        self.set_cell(x, y, ch as u32, fg, Rgba::TRANSPARENT, attrs, clip)
    }

    /// Draw text at a position over the existing background.
    ///
    /// Returns the number of columns advanced (wide characters count twice).
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgba, attrs: Attr, clip: Option<&ClipRect>) -> u16 {
        let mut col = x;

        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let width = ch.width().unwrap_or(0) as u16;
            if width == 0 {
                continue;
            }

            if self.draw_char(col, y, ch, fg, attrs, clip) && width == 2 {
                let covered = clip.is_none_or(|c| c.contains(col + 1, y));
                if let Some(next) = self.get_mut(col + 1, y).filter(|_| covered) {
                    next.char = 0;
                    next.fg = fg;
                    next.attrs = attrs;
                }
            }
            col = col.saturating_add(width);
        }

        col.saturating_sub(x)
    }
}

// =============================================================================
// Tests
// =============================================================================
