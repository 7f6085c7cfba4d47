//! Tile hover effect.
//!
//! A fixed grid of [`TILE_COUNT`] cells laid out like CSS
//! `repeat(auto-fill, <size>px)` columns, centered horizontally. Each cell
//! runs its own small state machine:
//!
//! ```text
//!          pointer_over                 pointer_leave
//!   Idle ───────────────> Highlighted ───────────────> Idle  (timer cancelled)
//!                              │
//!                              └─── timer fires ─────> Idle  (hover may continue)
//! ```
//!
//! A timer firing while the pointer is still over the cell does not re-arm
//! it. Only a fresh pointer-over does. Cells never affect each other.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::animation::Ease;
use crate::clock::{TimerId, TimerQueue};
use crate::types::{ClipRect, Rgba};

/// Number of cells in the grid.
pub const TILE_COUNT: usize = 2000;

/// How long a highlight lasts while the pointer stays over a cell.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(2000);

/// Background color transition length, both directions.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(2000);

/// Curve of the background color transition.
pub const TRANSITION_EASE: Ease = Ease::STANDARD;

/// Pixels per terminal column.
pub const PX_PER_COLUMN: u16 = 8;
/// Pixels per terminal row.
pub const PX_PER_ROW: u16 = 16;

/// Fill color of a fully highlighted cell.
pub const HIGHLIGHT_COLOR: Rgba = Rgba::NEUTRAL_800;
/// Cell border color.
pub const BORDER_COLOR: Rgba = Rgba::NEUTRAL_900;

// =============================================================================
// Tile Size
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl TileSize {
    /// Edge length in pixels.
    pub const fn px(self) -> u16 {
        match self {
            TileSize::Sm => 32,
            TileSize::Md => 48,
            TileSize::Lg => 64,
        }
    }

    /// Cell footprint in terminal columns and rows.
    pub const fn cells(self) -> (u16, u16) {
        (self.px() / PX_PER_COLUMN, self.px() / PX_PER_ROW)
    }
}

impl FromStr for TileSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sm" => Ok(TileSize::Sm),
            "md" => Ok(TileSize::Md),
            "lg" => Ok(TileSize::Lg),
            other => Err(format!("unknown tile size `{other}` (expected sm, md or lg)")),
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Placement of the grid inside its container, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    pub area: ClipRect,
    pub columns: u16,
    pub rows: u16,
    pub tile_width: u16,
    pub tile_height: u16,
    /// Left padding that centers the tracks.
    pub offset_x: u16,
}

impl TileLayout {
    pub fn compute(area: ClipRect, size: TileSize) -> Self {
        let (tile_width, tile_height) = size.cells();
        let area_px = area.width as u32 * PX_PER_COLUMN as u32;
        let columns = (area_px / size.px() as u32).max(1) as u16;
        let rows = TILE_COUNT.div_ceil(columns as usize) as u16;
        let grid_width = columns.saturating_mul(tile_width);
        let offset_x = area.width.saturating_sub(grid_width) / 2;

        Self {
            area,
            columns,
            rows,
            tile_width,
            tile_height,
            offset_x,
        }
    }

    /// Cell under an absolute terminal position, if any.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<usize> {
        if !self.area.contains(x, y) {
            return None;
        }
        let local_x = (x - self.area.x).checked_sub(self.offset_x)?;
        let local_y = y - self.area.y;
        let col = local_x / self.tile_width;
        let row = local_y / self.tile_height;
        if col >= self.columns {
            return None;
        }
        let index = row as usize * self.columns as usize + col as usize;
        (index < TILE_COUNT).then_some(index)
    }

    /// Rectangle of a cell, clipped to the container. `None` when off-screen.
    pub fn tile_rect(&self, index: usize) -> Option<ClipRect> {
        if index >= TILE_COUNT {
            return None;
        }
        let col = (index % self.columns as usize) as u32;
        let row = (index / self.columns as usize) as u32;
        let x = self.area.x as u32 + self.offset_x as u32 + col * self.tile_width as u32;
        let y = self.area.y as u32 + row * self.tile_height as u32;
        if x > u16::MAX as u32 || y > u16::MAX as u32 {
            return None;
        }
        ClipRect::new(x as u16, y as u16, self.tile_width, self.tile_height).intersect(&self.area)
    }

    /// Indices of cells at least partly inside the container.
    pub fn visible(&self) -> impl Iterator<Item = usize> + '_ {
        let visible_rows = self.area.height.div_ceil(self.tile_height.max(1)) as usize;
        let end = (visible_rows * self.columns as usize).min(TILE_COUNT);
        0..end
    }
}

// =============================================================================
// Cell State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Idle,
    Highlighted { timer: TimerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCause {
    Leave,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Highlighted,
    Reset(ResetCause),
}

/// A state change of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileTransition {
    pub index: usize,
    pub kind: TransitionKind,
    pub at: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Tile {
    state: TileState,
    changed_at: Duration,
    /// Highlight level (0 idle, 1 highlighted) when the state last changed.
    level_at_change: f32,
}

impl Tile {
    const IDLE: Tile = Tile {
        state: TileState::Idle,
        changed_at: Duration::ZERO,
        level_at_change: 0.0,
    };

    fn target_level(&self) -> f32 {
        match self.state {
            TileState::Idle => 0.0,
            TileState::Highlighted { .. } => 1.0,
        }
    }

    fn level(&self, now: Duration, transition: Duration) -> f32 {
        let target = self.target_level();
        let elapsed = now.saturating_sub(self.changed_at);
        if elapsed >= transition {
            return target;
        }
        let t = TRANSITION_EASE.apply(elapsed.as_secs_f64() / transition.as_secs_f64()) as f32;
        self.level_at_change + (target - self.level_at_change) * t
    }
}

// =============================================================================
// Tile Grid
// =============================================================================

/// The 2000 cells and their pending reset timers.
#[derive(Debug)]
pub struct TileGrid {
    size: TileSize,
    highlight: Duration,
    transition: Duration,
    tiles: Vec<Tile>,
    timers: TimerQueue<usize>,
    hovered: Option<usize>,
}

impl TileGrid {
    pub fn new(size: TileSize) -> Self {
        Self::with_timing(size, HIGHLIGHT_DURATION, TRANSITION_DURATION)
    }

    pub fn with_timing(size: TileSize, highlight: Duration, transition: Duration) -> Self {
        Self {
            size,
            highlight,
            transition,
            tiles: vec![Tile::IDLE; TILE_COUNT],
            timers: TimerQueue::new(),
            hovered: None,
        }
    }

    pub fn size(&self) -> TileSize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn state(&self, index: usize) -> Option<TileState> {
        self.tiles.get(index).map(|t| t.state)
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        matches!(self.state(index), Some(TileState::Highlighted { .. }))
    }

    /// Indices of every highlighted cell.
    pub fn highlighted(&self) -> Vec<usize> {
        (0..self.tiles.len()).filter(|&i| self.is_highlighted(i)).collect()
    }

    /// The cell the pointer is currently over.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Pointer entered `index`: highlight it and arm its reset timer.
    ///
    /// Re-entering a highlighted cell cancels the old timer first.
    pub fn pointer_over(&mut self, index: usize, now: Duration) -> Option<TileTransition> {
        if index >= self.tiles.len() {
            return None;
        }
        self.hovered = Some(index);

        if let TileState::Highlighted { timer } = self.tiles[index].state {
            self.timers.cancel(timer);
        }
        let timer = self.timers.schedule(now + self.highlight, index);
        self.set_state(index, TileState::Highlighted { timer }, now);

        trace!(index, "tile highlighted");
        Some(TileTransition {
            index,
            kind: TransitionKind::Highlighted,
            at: now,
        })
    }

    /// Pointer left `index`: reset immediately and cancel its timer.
    ///
    /// Leaving a cell whose timer already fired changes nothing.
    pub fn pointer_leave(&mut self, index: usize, now: Duration) -> Option<TileTransition> {
        if self.hovered == Some(index) {
            self.hovered = None;
        }
        let TileState::Highlighted { timer } = self.tiles.get(index)?.state else {
            return None;
        };
        self.timers.cancel(timer);
        self.set_state(index, TileState::Idle, now);

        trace!(index, "tile reset on leave");
        Some(TileTransition {
            index,
            kind: TransitionKind::Reset(ResetCause::Leave),
            at: now,
        })
    }

    /// Route a pointer position (already hit-tested) to leave/over events.
    ///
    /// Moving within the same cell is not a fresh pointer-over.
    pub fn pointer_at(&mut self, hit: Option<usize>, now: Duration) -> Vec<TileTransition> {
        if hit == self.hovered {
            return Vec::new();
        }
        let mut transitions = Vec::new();
        if let Some(prev) = self.hovered {
            transitions.extend(self.pointer_leave(prev, now));
        }
        match hit {
            Some(index) => transitions.extend(self.pointer_over(index, now)),
            None => self.hovered = None,
        }
        transitions
    }

    /// Fire every timer due at `now`.
    pub fn advance(&mut self, now: Duration) -> Vec<TileTransition> {
        let mut transitions = Vec::new();
        for (_, index) in self.timers.pop_due(now) {
            let Some(tile) = self.tiles.get(index) else {
                continue;
            };
            if matches!(tile.state, TileState::Highlighted { .. }) {
                self.set_state(index, TileState::Idle, now);
                trace!(index, "tile reset on expiry");
                transitions.push(TileTransition {
                    index,
                    kind: TransitionKind::Reset(ResetCause::Expired),
                    at: now,
                });
            }
        }
        transitions
    }

    /// Earliest pending reset.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Highlight level in `0..=1` including the color transition.
    pub fn level(&self, index: usize, now: Duration) -> f32 {
        self.tiles
            .get(index)
            .map_or(0.0, |tile| tile.level(now, self.transition))
    }

    /// Whether any cell is still fading.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.tiles.iter().any(|tile| {
            let level = tile.level(now, self.transition);
            (level - tile.target_level()).abs() > f32::EPSILON
        })
    }

    /// Fill color over `base` at `now`. `None` leaves the background alone.
    pub fn fill(&self, index: usize, base: Rgba, now: Duration) -> Option<Rgba> {
        let level = self.level(index, now);
        (level > 0.0).then(|| Rgba::lerp(base, HIGHLIGHT_COLOR, level))
    }

    /// Drop all highlights and timers.
    pub fn clear(&mut self) {
        self.tiles.fill(Tile::IDLE);
        self.timers.clear();
        self.hovered = None;
    }

    fn set_state(&mut self, index: usize, state: TileState, now: Duration) {
        let level = self.tiles[index].level(now, self.transition);
        self.tiles[index] = Tile {
            state,
            changed_at: now,
            level_at_change: level,
        };
    }
}

// =============================================================================
// Tests
// =============================================================================
