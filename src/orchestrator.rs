//! Entrance sequence.
//!
//! Drives the one-shot reveal of the page: wait for glyph measurement to be
//! usable, split the heading into characters, hide every target, unhide the
//! page container, then play a fixed five-stage timeline.
//!
//! ```text
//! AwaitingFonts ──(ready | timeout)──> Playing ──(timeline done)──> Complete
//! ```
//!
//! The orchestrator only holds [`TargetId`]s; the page tree owns the
//! elements and reads their [`VisualState`](crate::animation::VisualState)
//! from the shared [`TargetStore`] when it paints.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use spark_signals::signal;
use tracing::{debug, info, warn};

use crate::animation::{split_chars, Ease, SplitText, TargetId, TargetStore, Timeline, Timing, TweenVars};

/// Target store shared between the orchestrator and the page painter.
pub type SharedTargets = Rc<RefCell<TargetStore>>;

/// Default wait for readiness before the sequence is forced to start.
pub const DEFAULT_FONT_TIMEOUT: Duration = Duration::from_millis(3000);

// =============================================================================
// Page Visibility
// =============================================================================

thread_local! {
    static PAGE_VISIBLE: RefCell<spark_signals::Signal<bool>> = RefCell::new(signal(false));
}

/// Whether the page container may render.
///
/// Starts `false` so nothing flashes before the initial hidden states land.
pub fn page_visible() -> bool {
    PAGE_VISIBLE.with(|v| v.borrow().get())
}

/// The page visibility signal for reactive tracking.
pub fn page_visible_signal() -> spark_signals::Signal<bool> {
    PAGE_VISIBLE.with(|v| v.borrow().clone())
}

fn set_page_visible(visible: bool) {
    PAGE_VISIBLE.with(|v| v.borrow().set(visible));
}

/// Hide the page container again (for tests and remounts).
pub fn reset_page_visibility() {
    set_page_visible(false);
}

// =============================================================================
// Font Readiness
// =============================================================================

/// Source of "glyph measurement is usable" readiness, polled once per tick.
pub trait FontReadiness {
    fn poll_ready(&mut self) -> bool;
}

/// Ready once the terminal reports a non-zero size.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalFonts;

impl FontReadiness for TerminalFonts {
    fn poll_ready(&mut self) -> bool {
        crate::pipeline::query_terminal_size().is_some()
    }
}

/// Readiness flipped by hand. Clones share the flag.
#[derive(Debug, Default, Clone)]
pub struct ManualFonts {
    ready: Rc<Cell<bool>>,
}

impl ManualFonts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready() -> Self {
        let fonts = Self::default();
        fonts.set_ready(true);
        fonts
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.set(ready);
    }
}

impl FontReadiness for ManualFonts {
    fn poll_ready(&mut self) -> bool {
        self.ready.get()
    }
}

// =============================================================================
// Targets and Stages
// =============================================================================

/// The heading element and the text it will be split from.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingHandle {
    pub target: TargetId,
    pub text: String,
}

/// Handles captured from the mounted page. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevealTargets {
    pub heading: Option<HeadingHandle>,
    pub subtitle: Option<TargetId>,
    pub apps_label: Option<TargetId>,
    pub projects_label: Option<TargetId>,
    /// Entries followed by the trailing indicator.
    pub apps_list: Option<Vec<TargetId>>,
    pub projects_list: Option<Vec<TargetId>>,
    pub contact: Option<TargetId>,
}

impl RevealTargets {
    fn labels(&self) -> Vec<TargetId> {
        [self.apps_label, self.projects_label].into_iter().flatten().collect()
    }

    /// Stage-4 targets: apps then projects, each in document order.
    fn list_items(&self) -> Vec<TargetId> {
        [&self.apps_list, &self.projects_list]
            .into_iter()
            .flatten()
            .flat_map(|items| items.iter().copied())
            .collect()
    }

    /// Everything that starts offset by 12px and invisible.
    fn offset_targets(&self) -> Vec<TargetId> {
        let mut targets: Vec<TargetId> = self.subtitle.into_iter().collect();
        targets.extend(self.labels());
        targets.extend(self.list_items());
        targets.extend(self.contact);
        targets
    }
}

/// Placement of one timeline stage, in seconds from sequence start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub position: f64,
    pub duration: f64,
    pub stagger: f64,
}

/// Heading chars, subtitle, labels, list items, contact.
pub const STAGES: [Stage; 5] = [
    Stage { position: 0.4, duration: 0.7, stagger: 0.02 },
    Stage { position: 0.9, duration: 0.5, stagger: 0.0 },
    Stage { position: 1.4, duration: 0.5, stagger: 0.0 },
    Stage { position: 1.6, duration: 0.5, stagger: 0.08 },
    Stage { position: 2.0, duration: 0.6, stagger: 0.0 },
];

/// Vertical offset of non-heading targets before reveal, in pixels.
pub const OFFSET_Y: f64 = 12.0;
/// Heading character blur before reveal, in pixels.
pub const CHAR_BLUR: f64 = 8.0;
/// Heading character offset before reveal, as a percent of line height.
pub const CHAR_Y_PERCENT: f64 = 40.0;

/// Heading characters after the split, parallel to `split.chars()`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingChars {
    pub split: SplitText,
    pub ids: Vec<TargetId>,
}

// =============================================================================
// Orchestrator
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntrancePhase {
    AwaitingFonts { since: Duration },
    Playing { started_at: Duration },
    Complete,
}

/// One run of the entrance sequence.
///
/// A remount builds a new `Entrance`; a finished one never replays.
pub struct Entrance {
    targets: RevealTargets,
    store: SharedTargets,
    font_timeout: Duration,
    phase: EntrancePhase,
    heading_chars: Option<HeadingChars>,
    timeline: Option<Timeline>,
}

impl Entrance {
    /// Start waiting for readiness at `now`.
    pub fn mount(targets: RevealTargets, store: SharedTargets, font_timeout: Duration, now: Duration) -> Self {
        set_page_visible(false);
        debug!(?font_timeout, "entrance mounted, awaiting fonts");
        Self {
            targets,
            store,
            font_timeout,
            phase: EntrancePhase::AwaitingFonts { since: now },
            heading_chars: None,
            timeline: None,
        }
    }

    pub fn phase(&self) -> EntrancePhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == EntrancePhase::Complete
    }

    /// The split heading, once setup has run.
    pub fn heading_chars(&self) -> Option<&HeadingChars> {
        self.heading_chars.as_ref()
    }

    /// The built timeline, once setup has run.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Advance the sequence to `now`.
    pub fn tick(&mut self, now: Duration, fonts: &mut dyn FontReadiness) {
        match self.phase {
            EntrancePhase::AwaitingFonts { since } => {
                let ready = fonts.poll_ready();
                let waited = now.saturating_sub(since);
                if !ready && waited < self.font_timeout {
                    return;
                }
                if !ready {
                    warn!(?waited, "font readiness never arrived, starting entrance anyway");
                }
                self.setup();
                self.phase = EntrancePhase::Playing { started_at: now };
                info!(duration = self.timeline.as_ref().map_or(0.0, Timeline::duration), "entrance started");
                self.play(now, now);
            }
            EntrancePhase::Playing { started_at } => self.play(now, started_at),
            EntrancePhase::Complete => {}
        }
    }

    fn play(&mut self, now: Duration, started_at: Duration) {
        let Some(timeline) = self.timeline.as_mut() else {
            return;
        };
        let elapsed = now.saturating_sub(started_at).as_secs_f64();
        timeline.seek(elapsed, &mut self.store.borrow_mut());

        if timeline.is_complete() {
            self.phase = EntrancePhase::Complete;
            info!("entrance complete");
        }
    }

    /// Split, hide, unhide the container, build the timeline.
    fn setup(&mut self) {
        {
            let mut store = self.store.borrow_mut();

            if let Some(heading) = &self.targets.heading {
                let split = split_chars(&heading.text);
                let ids: Vec<TargetId> = split.chars().map(|_| store.alloc()).collect();
                debug!(chars = ids.len(), "heading split");
                self.heading_chars = Some(HeadingChars { split, ids });
            }

            if let Some(chars) = &self.heading_chars {
                let hidden = TweenVars::new().blur(CHAR_BLUR).y_percent(CHAR_Y_PERCENT).auto_alpha(0.0);
                store.set(&chars.ids, &hidden);
            }
            let offset = TweenVars::new().auto_alpha(0.0).y(OFFSET_Y);
            store.set(&self.targets.offset_targets(), &offset);
        }

        set_page_visible(true);
        self.timeline = Some(self.build_timeline());
    }

    fn build_timeline(&self) -> Timeline {
        let reveal = TweenVars::new().y(0.0).auto_alpha(1.0);
        let chars: &[TargetId] = self.heading_chars.as_ref().map_or(&[], |c| &c.ids);
        let subtitle: Vec<TargetId> = self.targets.subtitle.into_iter().collect();
        let labels = self.targets.labels();
        let items = self.targets.list_items();
        let contact: Vec<TargetId> = self.targets.contact.into_iter().collect();

        let stages: [(&[TargetId], TweenVars); 5] = [
            (chars, TweenVars::new().blur(0.0).y_percent(0.0).auto_alpha(1.0)),
            (subtitle.as_slice(), reveal),
            (labels.as_slice(), reveal),
            (items.as_slice(), reveal),
            (contact.as_slice(), reveal),
        ];

        let mut timeline = Timeline::new(Ease::POWER3_OUT);
        for ((targets, vars), stage) in stages.into_iter().zip(STAGES) {
            timeline.to(
                targets,
                vars,
                Timing::new(stage.duration).stagger(stage.stagger),
                stage.position,
            );
        }
        timeline
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> SharedTargets {
        reset_page_visibility();
        Rc::new(RefCell::new(TargetStore::new()))
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn full_targets(store: &SharedTargets) -> RevealTargets {
        let mut s = store.borrow_mut();
        RevealTargets {
            heading: Some(HeadingHandle {
                target: s.alloc(),
                text: "Hi, I'm Yernar".into(),
            }),
            subtitle: Some(s.alloc()),
            apps_label: Some(s.alloc()),
            projects_label: Some(s.alloc()),
            apps_list: Some(vec![s.alloc(), s.alloc()]),
            projects_list: Some(vec![s.alloc(), s.alloc()]),
            contact: Some(s.alloc()),
        }
    }

    #[test]
    fn test_waits_for_fonts() {
        let store = setup();
        let targets = full_targets(&store);
        let mut fonts = ManualFonts::new();
        let mut entrance = Entrance::mount(targets, store, DEFAULT_FONT_TIMEOUT, Duration::ZERO);

        entrance.tick(secs(1.0), &mut fonts);
        assert!(matches!(entrance.phase(), EntrancePhase::AwaitingFonts { .. }));
        assert!(entrance.heading_chars().is_none());
        assert!(!page_visible());

        fonts.set_ready(true);
        entrance.tick(secs(1.5), &mut fonts);
        assert_eq!(entrance.phase(), EntrancePhase::Playing { started_at: secs(1.5) });
        assert_eq!(entrance.heading_chars().map(|c| c.ids.len()), Some(12));
        assert!(page_visible());
    }

    #[test]
    fn test_timeout_forces_start() {
        let store = setup();
        let targets = full_targets(&store);
        let mut fonts = ManualFonts::new();
        let mut entrance = Entrance::mount(targets, store, Duration::from_millis(500), Duration::ZERO);

        entrance.tick(secs(0.49), &mut fonts);
        assert!(!page_visible());

        entrance.tick(secs(0.5), &mut fonts);
        assert!(matches!(entrance.phase(), EntrancePhase::Playing { .. }));
        assert!(page_visible());
    }

    #[test]
    fn test_stage_positions() {
        let store = setup();
        let targets = full_targets(&store);
        let mut entrance = Entrance::mount(targets, store, DEFAULT_FONT_TIMEOUT, Duration::ZERO);
        entrance.tick(Duration::ZERO, &mut ManualFonts::ready());

        let tweens = entrance.timeline().unwrap().tweens();
        assert_eq!(tweens.len(), 5);
        for (tween, stage) in tweens.iter().zip(STAGES) {
            assert_eq!(tween.position, stage.position);
            assert_eq!(tween.duration, stage.duration);
            assert_eq!(tween.stagger, stage.stagger);
        }
        assert_eq!(tweens[0].targets.len(), 12);
        assert_eq!(tweens[2].targets.len(), 2);
        assert_eq!(tweens[3].targets.len(), 4);
    }

    #[test]
    fn test_absent_handles_are_skipped() {
        let store = setup();
        let contact = store.borrow_mut().alloc();
        let targets = RevealTargets {
            contact: Some(contact),
            ..Default::default()
        };
        let mut entrance = Entrance::mount(targets, store.clone(), DEFAULT_FONT_TIMEOUT, Duration::ZERO);
        let mut fonts = ManualFonts::ready();

        entrance.tick(Duration::ZERO, &mut fonts);
        assert!(entrance.heading_chars().is_none());
        assert!(store.borrow().get(contact).unwrap().is_hidden());

        entrance.tick(secs(2.6), &mut fonts);
        assert!(entrance.is_complete());
        assert!(store.borrow().get(contact).unwrap().is_revealed());
    }

    #[test]
    fn test_complete_never_replays() {
        let store = setup();
        let targets = full_targets(&store);
        let subtitle = targets.subtitle.unwrap();
        let mut entrance = Entrance::mount(targets, store.clone(), DEFAULT_FONT_TIMEOUT, Duration::ZERO);
        let mut fonts = ManualFonts::ready();

        entrance.tick(Duration::ZERO, &mut fonts);
        entrance.tick(secs(3.0), &mut fonts);
        assert!(entrance.is_complete());

        store.borrow_mut().set(&[subtitle], &TweenVars::new().auto_alpha(0.5));
        entrance.tick(secs(10.0), &mut fonts);
        assert_eq!(store.borrow().get(subtitle).unwrap().opacity, 0.5);
    }
}
