//! Terminal size signal.
//!
//! The terminal size is the root of the reactive pipeline: the page layout
//! derives from it and a resize invalidates everything downstream. Width and
//! height live in one signal so a resize is a single change.

use std::cell::RefCell;

use spark_signals::{signal, Signal};
use tracing::debug;

/// Size of the terminal in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

impl TerminalSize {
    /// Used until the real terminal has been queried.
    pub const FALLBACK: TerminalSize = TerminalSize { width: 80, height: 24 };

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Whether anything can be drawn. Some terminals report 0x0 while still
    /// attaching.
    pub fn is_usable(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

thread_local! {
    static TERMINAL_SIZE: RefCell<Signal<TerminalSize>> = RefCell::new(signal(TerminalSize::FALLBACK));
}

pub fn terminal_size() -> TerminalSize {
    TERMINAL_SIZE.with(|s| s.borrow().get())
}

pub fn terminal_width() -> u16 {
    terminal_size().width
}

pub fn terminal_height() -> u16 {
    terminal_size().height
}

/// Store a new size (on resize events). Unusable sizes are ignored and the
/// last good size stays.
pub fn set_terminal_size(width: u16, height: u16) {
    let size = TerminalSize::new(width, height);
    if !size.is_usable() {
        debug!(width, height, "ignoring empty terminal size");
        return;
    }
    TERMINAL_SIZE.with(|s| {
        let s = s.borrow();
        if s.get() != size {
            s.set(size);
        }
    });
}

/// The size signal for reactive tracking.
pub fn terminal_size_signal() -> Signal<TerminalSize> {
    TERMINAL_SIZE.with(|s| s.borrow().clone())
}

/// Ask crossterm for the real size. `None` when there is no terminal or it
/// reports an empty size.
pub fn query_terminal_size() -> Option<TerminalSize> {
    let (width, height) = crossterm::terminal::size().ok()?;
    let size = TerminalSize::new(width, height);
    size.is_usable().then_some(size)
}

/// Query the real terminal and store its size. Keeps the current size when
/// the query fails.
pub fn detect_terminal_size() -> TerminalSize {
    if let Some(size) = query_terminal_size() {
        set_terminal_size(size.width, size.height);
    }
    terminal_size()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_terminal_size() {
        set_terminal_size(120, 40);
        assert_eq!(terminal_size(), TerminalSize::new(120, 40));
        assert_eq!((terminal_width(), terminal_height()), (120, 40));
        assert_eq!(terminal_size_signal().get(), TerminalSize::new(120, 40));
    }

    #[test]
    fn test_empty_size_keeps_last_good_size() {
        set_terminal_size(100, 30);
        set_terminal_size(0, 0);
        set_terminal_size(100, 0);
        assert_eq!(terminal_size(), TerminalSize::new(100, 30));
    }

    #[test]
    fn test_usable() {
        assert!(TerminalSize::FALLBACK.is_usable());
        assert!(!TerminalSize::new(0, 24).is_usable());
    }
}
