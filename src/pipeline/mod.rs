//! Reactive Pipeline
//!
//! Connects the page to the terminal.
//!
//! ```text
//! terminal size signal → layoutDerived → paint → hit grid → diff renderer
//! ```
//!
//! 1. **terminal** - The size signal, the root of the pipeline
//! 2. **layoutDerived** - Taffy layout of the page tree, recomputed on resize
//! 3. **mount** - Per-frame paint and render, input routing, lifecycle
//!
//! Painting is pure. Only the frame step mutates shared state (hit grid,
//! terminal I/O).

pub mod layout_derived;
pub mod mount;
pub mod terminal;

pub use layout_derived::create_layout_derived;
pub use mount::{run, App, TerminalSession};
pub use terminal::{
    detect_terminal_size, query_terminal_size, set_terminal_size, terminal_height, terminal_size, terminal_width, TerminalSize,
};
