//! # spark-folio
//!
//! Animated personal portfolio page for the terminal.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! reactivity and [taffy](https://github.com/DioxusLabs/taffy) for layout.
//!
//! ## Architecture
//!
//! ```text
//! ContentModel → PageTree → layoutDerived → paint_page → DiffRenderer
//!                   ↑                          ↑
//!             TargetStore ← Entrance      TileGrid, LightRays
//! ```
//!
//! The entrance sequence and the tile grid only ever touch
//! [`VisualState`](animation::VisualState) values and tile levels; the
//! painter reads both when it draws a frame.
//!
//! ## Modules
//!
//! - [`content`] - Static page content (apps, projects, contact)
//! - [`animation`] - Tweens, easing, text splitting, timelines
//! - [`orchestrator`] - The one-shot entrance sequence
//! - [`tiles`] - The 2000-cell hover grid
//! - [`rays`] - Light rays background
//! - [`page`] - Page tree, layout and painting
//! - [`pipeline`] - Terminal signals, frame loop, mount
//! - [`renderer`] - Terminal renderer (ANSI output, diff rendering)
//! - [`state`] - Mouse, keyboard and input routing

pub mod animation;
pub mod clock;
pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod navigate;
pub mod orchestrator;
pub mod page;
pub mod pipeline;
pub mod rays;
pub mod renderer;
pub mod state;
pub mod tiles;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FolioConfig;
pub use content::{ContentModel, LinkedEntry, APPS, PROJECTS};
pub use error::{FolioError, Result};
pub use navigate::{Navigator, RecordingNavigator, SystemNavigator};
pub use orchestrator::{page_visible, Entrance, EntrancePhase, FontReadiness, ManualFonts, TerminalFonts};
pub use page::{compute_page_layout, paint_page, PageLayout, PageTree};
pub use pipeline::{run, App};
pub use rays::{GodRaysConfig, LightRays};
pub use renderer::{DiffRenderer, FrameBuffer};
pub use tiles::{TileGrid, TileLayout, TileSize};
