//! Timeline - positioned, staggered tweens played against a target store.
//!
//! # Model
//!
//! A timeline is a list of tweens, each placed at an absolute position (in
//! seconds from the timeline start). A tween over N targets with stagger `s`
//! expands into N tracks, track `i` starting at `position + i * s`.
//!
//! Tweens are "to" tweens: each track captures its target's current state
//! the first time playback reaches its start, then interpolates toward the
//! tween's values. Before its start a track does nothing.
//!
//! ```text
//! 0.0       0.4                 1.1
//!  |---------|=====================|        char 0
//!            .02|====================|     char 1
//! ```

use super::ease::Ease;
use super::props::{TargetId, TargetStore, TweenVars, VisualState};

/// Duration and stagger of a tween, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub duration: f64,
    pub stagger: f64,
}

impl Timing {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            stagger: 0.0,
        }
    }

    pub fn stagger(mut self, stagger: f64) -> Self {
        self.stagger = stagger;
        self
    }
}

/// Summary of one tween as added to the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenInfo {
    pub position: f64,
    pub duration: f64,
    pub stagger: f64,
    pub targets: Vec<TargetId>,
}

impl TweenInfo {
    /// When the last target of this tween finishes.
    pub fn end(&self) -> f64 {
        let last_offset = self.targets.len().saturating_sub(1) as f64 * self.stagger;
        self.position + last_offset + self.duration
    }
}

#[derive(Debug, Clone)]
struct Track {
    target: TargetId,
    start: f64,
    duration: f64,
    vars: TweenVars,
    ease: Ease,
    from: Option<VisualState>,
}

impl Track {
    fn end(&self) -> f64 {
        self.start + self.duration
    }

    fn progress(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((time - self.start) / self.duration).clamp(0.0, 1.0)
    }
}

/// A sequence of positioned tweens.
#[derive(Debug, Clone)]
pub struct Timeline {
    ease: Ease,
    tracks: Vec<Track>,
    tweens: Vec<TweenInfo>,
    time: f64,
}

impl Timeline {
    /// Create an empty timeline whose tweens default to `ease`.
    pub fn new(ease: Ease) -> Self {
        Self {
            ease,
            tracks: Vec::new(),
            tweens: Vec::new(),
            time: 0.0,
        }
    }

    /// Add a "to" tween at an absolute position.
    ///
    /// An empty target list is allowed and adds nothing playable.
    pub fn to(&mut self, targets: &[TargetId], vars: TweenVars, timing: Timing, position: f64) -> &mut Self {
        let position = position.max(0.0);
        let duration = timing.duration.max(0.0);
        let stagger = timing.stagger.max(0.0);

        for (i, &target) in targets.iter().enumerate() {
            self.tracks.push(Track {
                target,
                start: position + i as f64 * stagger,
                duration,
                vars,
                ease: self.ease,
                from: None,
            });
        }

        self.tweens.push(TweenInfo {
            position,
            duration,
            stagger,
            targets: targets.to_vec(),
        });
        self
    }

    /// Tweens in insertion order.
    pub fn tweens(&self) -> &[TweenInfo] {
        &self.tweens
    }

    /// Start time of the first track animating `target`.
    pub fn start_of(&self, target: TargetId) -> Option<f64> {
        self.tracks.iter().find(|t| t.target == target).map(|t| t.start)
    }

    /// End of the last track.
    pub fn duration(&self) -> f64 {
        self.tracks.iter().map(Track::end).fold(0.0, f64::max)
    }

    /// Current playhead.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_complete(&self) -> bool {
        self.time >= self.duration()
    }

    /// Move the playhead to `time` and render every started track.
    ///
    /// Seeking backwards past a track's start restores the captured state.
    pub fn seek(&mut self, time: f64, store: &mut TargetStore) {
        let time = time.max(0.0);
        self.time = time;

        for track in &mut self.tracks {
            let Some(state) = store.get_mut(track.target) else {
                continue;
            };

            if time < track.start {
                if let Some(from) = track.from.take() {
                    *state = from;
                }
                continue;
            }

            let from = *track.from.get_or_insert(*state);
            let p = track.ease.apply(track.progress(time));
            track.vars.interpolate(&from, p, state);
        }
    }

    /// Advance the playhead by `delta` seconds.
    pub fn advance(&mut self, delta: f64, store: &mut TargetStore) {
        let next = self.time + delta.max(0.0);
        self.seek(next, store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn hidden_store(n: usize) -> (TargetStore, Vec<TargetId>) {
        let mut store = TargetStore::new();
        let ids: Vec<_> = (0..n).map(|_| store.alloc()).collect();
        store.set(&ids, &TweenVars::new().auto_alpha(0.0).y(12.0));
        (store, ids)
    }

    fn reveal() -> TweenVars {
        TweenVars::new().auto_alpha(1.0).y(0.0)
    }

    #[test]
    fn test_stagger_expands_start_times() {
        let (_, ids) = hidden_store(4);
        let mut tl = Timeline::new(Ease::POWER3_OUT);
        tl.to(&ids, reveal(), Timing::new(0.5).stagger(0.08), 1.6);

        for (i, &id) in ids.iter().enumerate() {
            let start = tl.start_of(id).unwrap();
            assert!((start - (1.6 + i as f64 * 0.08)).abs() < EPS);
        }
        assert!((tl.duration() - (1.6 + 3.0 * 0.08 + 0.5)).abs() < EPS);
        assert!((tl.tweens()[0].end() - tl.duration()).abs() < EPS);
    }

    #[test]
    fn test_nothing_moves_before_start() {
        let (mut store, ids) = hidden_store(1);
        let mut tl = Timeline::new(Ease::Linear);
        tl.to(&ids, reveal(), Timing::new(1.0), 0.5);

        tl.seek(0.49, &mut store);
        assert!(store.get(ids[0]).unwrap().is_hidden());
    }

    #[test]
    fn test_linear_midpoint_and_end() {
        let (mut store, ids) = hidden_store(1);
        let mut tl = Timeline::new(Ease::Linear);
        tl.to(&ids, reveal(), Timing::new(1.0), 0.0);

        tl.seek(0.5, &mut store);
        let mid = *store.get(ids[0]).unwrap();
        assert!((mid.opacity - 0.5).abs() < EPS);
        assert!((mid.y - 6.0).abs() < EPS);

        tl.seek(1.0, &mut store);
        assert!(store.get(ids[0]).unwrap().is_revealed());
        assert!(tl.is_complete());
    }

    #[test]
    fn test_seek_back_restores_capture() {
        let (mut store, ids) = hidden_store(1);
        let mut tl = Timeline::new(Ease::Linear);
        tl.to(&ids, reveal(), Timing::new(1.0), 1.0);

        tl.seek(2.0, &mut store);
        assert!(store.get(ids[0]).unwrap().is_revealed());

        tl.seek(0.0, &mut store);
        let state = store.get(ids[0]).unwrap();
        assert!(state.is_hidden());
        assert_eq!(state.y, 12.0);
    }

    #[test]
    fn test_empty_targets_are_harmless() {
        let (mut store, _) = hidden_store(0);
        let mut tl = Timeline::new(Ease::POWER3_OUT);
        tl.to(&[], reveal(), Timing::new(0.5).stagger(0.08), 1.6);

        assert_eq!(tl.tweens().len(), 1);
        assert_eq!(tl.duration(), 0.0);
        tl.seek(10.0, &mut store);
        assert!(tl.is_complete());
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let (mut store, ids) = hidden_store(1);
        let mut tl = Timeline::new(Ease::POWER3_OUT);
        tl.to(&ids, reveal(), Timing::new(0.0), 0.2);

        tl.seek(0.2, &mut store);
        assert!(store.get(ids[0]).unwrap().is_revealed());
    }

    #[test]
    fn test_advance_accumulates() {
        let (mut store, ids) = hidden_store(1);
        let mut tl = Timeline::new(Ease::Linear);
        tl.to(&ids, reveal(), Timing::new(1.0), 0.0);

        tl.advance(0.25, &mut store);
        tl.advance(0.25, &mut store);
        assert!((tl.time() - 0.5).abs() < EPS);
        assert!((store.get(ids[0]).unwrap().opacity - 0.5).abs() < EPS);
    }
}
