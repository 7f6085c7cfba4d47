//! Mount API - Page lifecycle and frame loop.
//!
//! [`App::mount`] builds the page tree, starts the entrance sequence and
//! registers the link and quit handlers. Each frame then runs:
//!
//! ```text
//! tile timers → entrance tick → layout derived → paint → hit grid → renderer
//! ```
//!
//! The app never reads the clock itself: every entry point takes `now`, so
//! tests drive it with a [`ManualClock`](crate::clock::ManualClock) and
//! [`run`] drives it with a [`SystemClock`].
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::{config::FolioConfig, pipeline::mount};
//!
//! mount::run(FolioConfig::default())?;
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::layout_derived::create_layout_derived;
use super::terminal::{detect_terminal_size, terminal_height, terminal_width};
use crate::animation::TargetStore;
use crate::clock::{Clock, SystemClock};
use crate::config::FolioConfig;
use crate::content::{ContentModel, HEADING};
use crate::error::{FolioError, Result};
use crate::navigate::{open_logged, Navigator, SystemNavigator};
use crate::orchestrator::{page_visible, Entrance, FontReadiness, SharedTargets, TerminalFonts};
use crate::page::{paint_page, FrameContext, PageLayout, PageTree};
use crate::rays::LightRays;
use crate::renderer::{DiffRenderer, FrameBuffer};
use crate::state::global_keys::{self, GlobalKeysHandle};
use crate::state::input::{self, InputEvent};
use crate::state::mouse;
use crate::tiles::{TileGrid, TileLayout};
use crate::types::ClipRect;

// =============================================================================
// App
// =============================================================================

/// A mounted page.
pub struct App {
    config: FolioConfig,
    fonts: Box<dyn FontReadiness>,
    store: SharedTargets,
    page: Rc<PageTree>,
    layout: Box<dyn Fn() -> PageLayout>,
    entrance: Entrance,
    tiles: TileGrid,
    tile_layout: TileLayout,
    rays: Option<LightRays>,
    size: (u16, u16),
    running: Arc<AtomicBool>,
    cleanups: Vec<Box<dyn FnOnce()>>,
    global_keys: Option<GlobalKeysHandle>,
}

impl App {
    /// Mount the page at time `now`.
    ///
    /// Reads the terminal size signals, so call
    /// [`detect_terminal_size`] (or `set_terminal_size` in tests) first.
    pub fn mount(
        config: FolioConfig,
        content: &ContentModel,
        navigator: Rc<dyn Navigator>,
        fonts: Box<dyn FontReadiness>,
        now: Duration,
    ) -> Self {
        let store: SharedTargets = Rc::new(RefCell::new(TargetStore::new()));
        let page = Rc::new(PageTree::build(content, &mut store.borrow_mut()));

        let layout_derived = create_layout_derived(page.clone());
        let layout: Box<dyn Fn() -> PageLayout> = Box::new(move || layout_derived.get());

        let entrance = Entrance::mount(page.reveal_targets(), store.clone(), config.entrance.font_timeout(), now);

        let size = (terminal_width(), terminal_height());
        let tiles = TileGrid::with_timing(config.tiles.size, config.tiles.highlight(), config.tiles.transition());
        let tile_layout = tile_layout_for(size, &tiles);
        let rays = config
            .rays
            .enabled
            .then(|| LightRays::new(config.rays.params.clone(), size.0, size.1));

        // Link regions open their URL on click
        let mut cleanups: Vec<Box<dyn FnOnce()>> = Vec::new();
        for (index, href) in page.links() {
            let navigator = navigator.clone();
            let cleanup = mouse::on_region_click(index, move |_| open_logged(navigator.as_ref(), href));
            cleanups.push(Box::new(cleanup));
        }

        let running = Arc::new(AtomicBool::new(true));
        let global_keys = global_keys::setup_global_keys(running.clone());

        info!(
            nodes = page.len(),
            links = cleanups.len(),
            tile_size = ?config.tiles.size,
            rays = rays.is_some(),
            "page mounted"
        );

        Self {
            config,
            fonts,
            store,
            page,
            layout,
            entrance,
            tiles,
            tile_layout,
            rays,
            size,
            running,
            cleanups,
            global_keys: Some(global_keys),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the frame loop.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn page(&self) -> &PageTree {
        &self.page
    }

    pub fn targets(&self) -> SharedTargets {
        self.store.clone()
    }

    pub fn entrance(&self) -> &Entrance {
        &self.entrance
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn tile_layout(&self) -> &TileLayout {
        &self.tile_layout
    }

    /// The page layout for the current terminal size.
    pub fn layout(&self) -> PageLayout {
        (self.layout)()
    }

    /// Route one input event.
    ///
    /// Pointer motion also drives the tile grid. Content regions sit above
    /// the tiles, so a pointer over a hit region leaves every tile.
    pub fn handle_event(&mut self, event: InputEvent, now: Duration) -> bool {
        let motion = match &event {
            InputEvent::Mouse(m) if m.is_motion() => Some((m.x, m.y)),
            _ => None,
        };

        let consumed = input::route_event(event);

        if let Some((x, y)) = motion {
            let hit = match mouse::hovered_region() {
                Some(_) => None,
                None => self.tile_layout.hit_test(x, y),
            };
            self.tiles.pointer_at(hit, now);
        }
        consumed
    }

    /// Advance timers and animation to `now` and paint the frame.
    ///
    /// The frame's hit regions replace the global hit grid.
    pub fn frame(&mut self, now: Duration) -> FrameBuffer {
        self.tiles.advance(now);
        self.entrance.tick(now, self.fonts.as_mut());

        let layout = (self.layout)();
        let size = (layout.width, layout.height);
        if size != self.size {
            debug!(width = size.0, height = size.1, "terminal resized");
            self.size = size;
            self.tile_layout = tile_layout_for(size, &self.tiles);
            if let Some(rays) = &mut self.rays {
                rays.resize(size.0, size.1);
            }
        }

        if mouse::hit_grid_size() != size {
            mouse::resize_hit_grid(size.0, size.1);
        } else {
            mouse::clear_hit_grid();
        }

        let result = {
            let targets = self.store.borrow();
            paint_page(&FrameContext {
                page: &self.page,
                layout: &layout,
                targets: &targets,
                heading_chars: self.entrance.heading_chars(),
                page_visible: page_visible(),
                hovered: mouse::hovered_region(),
                tiles: &self.tiles,
                tile_layout: &self.tile_layout,
                rays: self.rays.as_ref(),
                now,
            })
        };

        for region in &result.hit_regions {
            mouse::fill_hit_rect(region.rect, region.index);
        }
        mouse::refresh_hover();

        // Content revealed under a resting pointer covers the tile below it
        if mouse::hovered_region().is_some() && self.tiles.hovered().is_some() {
            self.tiles.pointer_at(None, now);
        }

        result.buffer
    }

    /// Remove every handler this page registered.
    pub fn unmount(mut self) {
        self.stop();
        if let Some(handle) = self.global_keys.take() {
            handle.cleanup();
        }
        for cleanup in self.cleanups.drain(..) {
            cleanup();
        }
        self.tiles.clear();
        debug!("page unmounted");
    }
}

fn tile_layout_for(size: (u16, u16), tiles: &TileGrid) -> TileLayout {
    TileLayout::compute(ClipRect::new(0, 0, size.0, size.1), tiles.size())
}

// =============================================================================
// Terminal
// =============================================================================

/// Raw mode plus the alternate screen. Dropping it restores the terminal.
pub struct TerminalSession {
    renderer: DiffRenderer,
}

impl TerminalSession {
    pub fn enter(title: &str) -> Result<Self> {
        crossterm::terminal::enable_raw_mode().map_err(|e| FolioError::Terminal(format!("enable raw mode: {e}")))?;

        let mut renderer = DiffRenderer::new();
        if let Err(e) = renderer.enter_fullscreen(title) {
            let _ = crossterm::terminal::disable_raw_mode();
            return Err(FolioError::Terminal(format!("enter fullscreen: {e}")));
        }
        Ok(Self { renderer })
    }

    pub fn render(&mut self, buffer: &FrameBuffer) -> Result<()> {
        self.renderer.render(buffer)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.renderer.exit_fullscreen();
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

// =============================================================================
// Event Loop
// =============================================================================

/// Mount the page on the real terminal and run until a quit key.
pub fn run(config: FolioConfig) -> Result<()> {
    let size = detect_terminal_size();
    debug!(width = size.width, height = size.height, "terminal size");
    let clock = SystemClock::new();

    let mut app = App::mount(
        config,
        &ContentModel::default(),
        Rc::new(SystemNavigator),
        Box::new(TerminalFonts),
        clock.now(),
    );

    let result = TerminalSession::enter(HEADING).and_then(|mut session| run_loop(&mut app, &clock, &mut session));
    app.unmount();
    result
}

/// Drain input until the next frame is due, then paint and render it.
pub fn run_loop(app: &mut App, clock: &dyn Clock, session: &mut TerminalSession) -> Result<()> {
    let interval = app.config().render.frame_interval();

    while app.is_running() {
        let deadline = clock.now() + interval;

        loop {
            let now = clock.now();
            if now >= deadline {
                break;
            }
            match input::poll_event(deadline - now)? {
                Some(event) => {
                    app.handle_event(event, clock.now());
                }
                None => break,
            }
        }

        if !app.is_running() {
            break;
        }
        let buffer = app.frame(clock.now());
        session.render(&buffer)?;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::navigate::RecordingNavigator;
    use crate::orchestrator::{reset_page_visibility, ManualFonts};
    use crate::page::Role;
    use crate::pipeline::terminal::set_terminal_size;
    use crate::state::keyboard::{self, KeyboardEvent, Modifiers};
    use crate::state::mouse::{MouseButton, MouseEvent};

    fn setup() -> (App, RecordingNavigator, ManualClock) {
        mouse::reset_mouse_state();
        keyboard::reset_keyboard_state();
        reset_page_visibility();
        set_terminal_size(120, 40);

        let clock = ManualClock::new();
        let navigator = RecordingNavigator::new();
        let mut config = FolioConfig::default();
        config.rays.enabled = false;
        let app = App::mount(
            config,
            &ContentModel::default(),
            Rc::new(navigator.clone()),
            Box::new(ManualFonts::ready()),
            clock.now(),
        );
        (app, navigator, clock)
    }

    fn settle(app: &mut App, clock: &ManualClock) {
        for _ in 0..40 {
            clock.advance(Duration::from_millis(100));
            app.frame(clock.now());
        }
    }

    #[test]
    fn test_first_frame_hides_content() {
        let (mut app, _, clock) = setup();
        let buffer = app.frame(clock.now());
        assert!(!(0..buffer.height()).any(|y| buffer.row_text(y).contains("Yernar")));
        app.unmount();
    }

    #[test]
    fn test_content_after_entrance() {
        let (mut app, _, clock) = setup();
        settle(&mut app, &clock);
        assert!(app.entrance().is_complete());

        let buffer = app.frame(clock.now());
        assert!((0..buffer.height()).any(|y| buffer.row_text(y).contains("Yernar")));
        app.unmount();
    }

    #[test]
    fn test_click_link_opens_url() {
        let (mut app, navigator, clock) = setup();
        settle(&mut app, &clock);

        let (index, href) = app
            .page()
            .links()
            .find(|(i, _)| matches!(app.page().node(*i).map(|n| n.role), Some(Role::EntryName)))
            .unwrap();
        let rect = app.layout().rect(index).unwrap();

        let now = clock.now();
        app.handle_event(InputEvent::Mouse(MouseEvent::move_to(rect.x, rect.y)), now);
        app.handle_event(InputEvent::Mouse(MouseEvent::down(MouseButton::Left, rect.x, rect.y)), now);
        app.handle_event(InputEvent::Mouse(MouseEvent::up(MouseButton::Left, rect.x, rect.y)), now);

        assert_eq!(navigator.opened(), vec![href.to_string()]);
        app.unmount();
    }

    #[test]
    fn test_pointer_over_tile_highlights() {
        let (mut app, _, clock) = setup();
        app.frame(clock.now());

        // Bottom-left corner sits below the page content
        let (x, y) = (app.tile_layout().offset_x, 39);
        let expected = app.tile_layout().hit_test(x, y);
        assert!(expected.is_some());

        app.handle_event(InputEvent::Mouse(MouseEvent::move_to(x, y)), clock.now());
        assert_eq!(app.tiles().highlighted(), expected.into_iter().collect::<Vec<_>>());
        app.unmount();
    }

    #[test]
    fn test_revealed_content_under_resting_pointer_leaves_tile() {
        let (mut app, _, clock) = setup();
        app.frame(clock.now());

        let heading = app.page().heading;
        let rect = app.layout().rect(heading).unwrap();
        let (x, y) = (rect.x + rect.width / 2, rect.y);
        let tile = app.tile_layout().hit_test(x, y);
        assert!(tile.is_some());

        app.handle_event(InputEvent::Mouse(MouseEvent::move_to(x, y)), clock.now());
        assert_eq!(app.tiles().hovered(), tile);

        // Heading chars start at 0.4 s; the tile timer would only fire at 2 s
        for _ in 0..10 {
            clock.advance(Duration::from_millis(100));
            app.frame(clock.now());
        }
        assert_eq!(mouse::hovered_region(), Some(heading));
        assert_eq!(app.tiles().hovered(), None);
        assert!(app.tiles().highlighted().is_empty());
        app.unmount();
    }

    #[test]
    fn test_quit_key_stops() {
        let (app, _, _) = setup();
        assert!(app.is_running());
        keyboard::dispatch(KeyboardEvent::with_modifiers("c", Modifiers::ctrl()));
        assert!(!app.is_running());
        app.unmount();
    }

    #[test]
    fn test_unmount_removes_link_handlers() {
        let (mut app, navigator, clock) = setup();
        settle(&mut app, &clock);
        let (index, _) = app.page().links().next().unwrap();
        app.unmount();

        mouse::fill_hit_rect(ClipRect::new(0, 0, 1, 1), index);
        mouse::dispatch(MouseEvent::down(MouseButton::Left, 0, 0));
        mouse::dispatch(MouseEvent::up(MouseButton::Left, 0, 0));
        assert!(navigator.opened().is_empty());
    }
}
