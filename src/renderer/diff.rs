//! Differential renderer.
//!
//! Compares the current frame to the previous one and only outputs cells
//! that changed. Most frames of the page only touch the few cells under a
//! fading tile or a moving ray, so the diff keeps terminal I/O small.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized block
//! 2. For each cell: skip if unchanged from the previous frame, otherwise
//!    render it with the [`StatefulCellRenderer`]
//! 3. Flush once
//! 4. Keep the frame for the next comparison

use std::io::{self, Write};

use super::ansi;
use super::buffer::FrameBuffer;
use super::output::{OutputBuffer, StatefulCellRenderer};

/// Differential renderer for the fullscreen page.
pub struct DiffRenderer {
    output: OutputBuffer,
    cell_renderer: StatefulCellRenderer,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            cell_renderer: StatefulCellRenderer::new(),
            previous: None,
        }
    }

    /// Render a frame to stdout. Returns the number of cells written.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<usize> {
        self.render_to(buffer, &mut io::stdout().lock())
    }

    /// Render a frame to `writer`. Returns the number of cells written.
    pub fn render_to<W: Write>(&mut self, buffer: &FrameBuffer, writer: &mut W) -> io::Result<usize> {
        let mut changed = 0;

        ansi::begin_sync(&mut self.output)?;
        self.cell_renderer.reset();

        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == buffer.width() && prev.height() == buffer.height());

        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                if previous.and_then(|prev| prev.get(x, y)) == Some(cell) {
                    continue;
                }
                changed += 1;
                self.cell_renderer.render_cell(&mut self.output, x, y, cell);
            }
        }

        ansi::end_sync(&mut self.output)?;
        self.output.flush_to(writer)?;
        writer.flush()?;

        match &mut self.previous {
            Some(prev) if prev.width() == buffer.width() && prev.height() == buffer.height() => {
                prev.clone_from(buffer);
            }
            _ => self.previous = Some(buffer.clone()),
        }

        Ok(changed)
    }

    /// Invalidate the previous frame; the next render is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Enter the alternate screen, hide the cursor, start mouse reporting.
    pub fn enter_fullscreen(&mut self, title: &str) -> io::Result<()> {
        ansi::enter_alt_screen(&mut self.output)?;
        ansi::cursor_hide(&mut self.output)?;
        ansi::clear_screen(&mut self.output)?;
        ansi::enable_mouse(&mut self.output)?;
        ansi::set_title(&mut self.output, title)?;
        self.output.flush_stdout()?;
        self.invalidate();
        Ok(())
    }

    /// Undo everything [`enter_fullscreen`](Self::enter_fullscreen) did.
    pub fn exit_fullscreen(&mut self) -> io::Result<()> {
        ansi::disable_mouse(&mut self.output)?;
        ansi::reset(&mut self.output)?;
        ansi::cursor_show(&mut self.output)?;
        ansi::exit_alt_screen(&mut self.output)?;
        self.output.flush_stdout()
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attr, Rgba};

    #[test]
    fn test_first_frame_is_full() {
        let mut renderer = DiffRenderer::new();
        let buffer = FrameBuffer::with_background(4, 2, Rgba::BLACK);
        let mut sink = Vec::new();

        assert_eq!(renderer.render_to(&buffer, &mut sink).unwrap(), 8);
        assert!(renderer.has_previous());
    }

    #[test]
    fn test_only_changed_cells_are_written() {
        let mut renderer = DiffRenderer::new();
        let mut buffer = FrameBuffer::with_background(4, 2, Rgba::BLACK);
        let mut sink = Vec::new();
        renderer.render_to(&buffer, &mut sink).unwrap();

        buffer.draw_char(2, 1, 'x', Rgba::WHITE, Attr::NONE, None);
        sink.clear();
        assert_eq!(renderer.render_to(&buffer, &mut sink).unwrap(), 1);
        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("\x1b[2;3H"));
        assert!(text.ends_with("x\x1b[?2026l"));

        sink = Vec::new();
        assert_eq!(renderer.render_to(&buffer, &mut sink).unwrap(), 0);
    }

    #[test]
    fn test_resize_and_invalidate_force_full_redraw() {
        let mut renderer = DiffRenderer::new();
        let mut sink = Vec::new();
        renderer.render_to(&FrameBuffer::new(4, 2), &mut sink).unwrap();

        assert_eq!(renderer.render_to(&FrameBuffer::new(3, 3), &mut sink).unwrap(), 9);

        renderer.invalidate();
        assert!(!renderer.has_previous());
        assert_eq!(renderer.render_to(&FrameBuffer::new(3, 3), &mut sink).unwrap(), 9);
    }
}
