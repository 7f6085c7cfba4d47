//! Mouse Module - Pointer state, hit grid and link clicks
//!
//! The painter fills the hit grid with the rectangles of visible page
//! regions every frame. Dispatch resolves the region under the pointer,
//! tracks hover, and fires a region's click handler on press+release over
//! the same region.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::state::mouse;
//!
//! let cleanup = mouse::on_region_click(node_index, move |_| open_logged(&navigator, href));
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::types::ClipRect;

// =============================================================================
// TYPES
// =============================================================================

/// Mouse action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Move,
    Drag,
    Scroll,
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Mouse event
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub action: MouseAction,
    pub button: MouseButton,
    /// X coordinate (0-indexed)
    pub x: u16,
    /// Y coordinate (0-indexed)
    pub y: u16,
    /// Region at this position (filled by dispatch)
    pub region: Option<usize>,
}

impl MouseEvent {
    pub fn new(action: MouseAction, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            action,
            button,
            x,
            y,
            region: None,
        }
    }

    pub fn down(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Down, button, x, y)
    }

    pub fn up(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Up, button, x, y)
    }

    pub fn move_to(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Move, MouseButton::None, x, y)
    }

    /// Motion with or without a held button.
    pub fn is_motion(&self) -> bool {
        matches!(self.action, MouseAction::Move | MouseAction::Drag)
    }
}

// =============================================================================
// HIT GRID
// =============================================================================

/// Grid mapping screen coordinates to region indices.
///
/// Empty cells hold `usize::MAX`.
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<usize>,
}

impl HitGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![usize::MAX; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize the grid, clearing all contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.resize(width as usize * height as usize, usize::MAX);
        self.clear();
    }

    pub fn clear(&mut self) {
        self.cells.fill(usize::MAX);
    }

    pub fn set(&mut self, x: u16, y: u16, index: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.cells[idx] = index;
    }

    /// Fill a rectangle with a region index. Later fills win.
    pub fn fill_rect(&mut self, rect: ClipRect, index: usize) {
        let bounds = ClipRect::new(0, 0, self.width, self.height);
        let Some(rect) = rect.intersect(&bounds) else {
            return;
        };
        for y in rect.y..rect.y + rect.height {
            let start = y as usize * self.width as usize + rect.x as usize;
            self.cells[start..start + rect.width as usize].fill(index);
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let value = self.cells[y as usize * self.width as usize + x as usize];
        (value != usize::MAX).then_some(value)
    }
}

// =============================================================================
// GLOBAL HIT GRID
// =============================================================================

thread_local! {
    static HIT_GRID: RefCell<HitGrid> = RefCell::new(HitGrid::new(80, 24));
}

pub fn resize_hit_grid(width: u16, height: u16) {
    HIT_GRID.with(|g| g.borrow_mut().resize(width, height));
}

pub fn clear_hit_grid() {
    HIT_GRID.with(|g| g.borrow_mut().clear());
}

pub fn fill_hit_rect(rect: ClipRect, index: usize) {
    HIT_GRID.with(|g| g.borrow_mut().fill_rect(rect, index));
}

/// Region at a position in the global hit grid.
pub fn hit_test(x: u16, y: u16) -> Option<usize> {
    HIT_GRID.with(|g| g.borrow().get(x, y))
}

pub fn hit_grid_size() -> (u16, u16) {
    HIT_GRID.with(|g| {
        let grid = g.borrow();
        (grid.width(), grid.height())
    })
}

// =============================================================================
// POINTER STATE
// =============================================================================

thread_local! {
    static POINTER: Signal<Option<(u16, u16)>> = signal(None);
    static HOVERED_REGION: Signal<Option<usize>> = signal(None);
    static PRESSED: Cell<Option<(Option<usize>, MouseButton)>> = const { Cell::new(None) };
}

/// Last pointer position; `None` until the first event.
pub fn pointer() -> Option<(u16, u16)> {
    POINTER.with(|s| s.get())
}

pub fn hovered_region() -> Option<usize> {
    HOVERED_REGION.with(|s| s.get())
}

// =============================================================================
// CLICK HANDLERS
// =============================================================================

type ClickHandler = Rc<dyn Fn(&MouseEvent)>;

thread_local! {
    static CLICK_HANDLERS: RefCell<HashMap<usize, ClickHandler>> = RefCell::new(HashMap::new());
}

/// Run `handler` when a region is clicked. Returns cleanup function.
///
/// One handler per region; registering again replaces it.
pub fn on_region_click<F>(index: usize, handler: F) -> impl FnOnce()
where
    F: Fn(&MouseEvent) + 'static,
{
    CLICK_HANDLERS.with(|h| h.borrow_mut().insert(index, Rc::new(handler)));

    move || {
        CLICK_HANDLERS.with(|h| h.borrow_mut().remove(&index));
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Resolve the region under the event and update pointer state.
/// Returns true if a click handler ran.
pub fn dispatch(mut event: MouseEvent) -> bool {
    event.region = hit_test(event.x, event.y);
    POINTER.with(|s| s.set(Some((event.x, event.y))));
    HOVERED_REGION.with(|s| {
        if s.get() != event.region {
            s.set(event.region);
        }
    });

    match event.action {
        MouseAction::Down => {
            PRESSED.with(|p| p.set(Some((event.region, event.button))));
            false
        }
        MouseAction::Up => dispatch_up(&event),
        MouseAction::Move | MouseAction::Drag | MouseAction::Scroll => false,
    }
}

/// Re-resolve hover against the current hit grid without a new event.
///
/// Regions move while the page animates in; the pointer may end up over a
/// different region without moving.
pub fn refresh_hover() {
    if let Some((x, y)) = pointer() {
        let region = hit_test(x, y);
        HOVERED_REGION.with(|s| {
            if s.get() != region {
                s.set(region);
            }
        });
    }
}

fn dispatch_up(event: &MouseEvent) -> bool {
    let pressed = PRESSED.with(|p| p.take());

    // Click: press and release over the same region with the same button
    let Some((Some(index), button)) = pressed else {
        return false;
    };
    if event.region != Some(index) || event.button != button {
        return false;
    }

    // Clone out so the handler runs without the map borrowed
    let handler = CLICK_HANDLERS.with(|h| h.borrow().get(&index).cloned());
    match handler {
        Some(handler) => {
            handler(event);
            true
        }
        None => false,
    }
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Clear pointer state, handlers and the hit grid (for tests and remounts).
pub fn reset_mouse_state() {
    CLICK_HANDLERS.with(|h| h.borrow_mut().clear());
    POINTER.with(|s| s.set(None));
    HOVERED_REGION.with(|s| s.set(None));
    PRESSED.with(|p| p.set(None));
    resize_hit_grid(80, 24);
}

// =============================================================================
// TESTS
// =============================================================================
