//! Terminal renderer - the "blind" output layer.
//!
//! The renderer knows only about cells. It doesn't understand the page,
//! layout, or animation. It takes a painted [`FrameBuffer`] and writes
//! optimized ANSI escape sequences to the terminal.

pub mod ansi;
pub mod buffer;
pub mod diff;
pub mod output;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
pub use output::{OutputBuffer, StatefulCellRenderer};
