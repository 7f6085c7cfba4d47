//! Animatable visual properties and the target store.
//!
//! Every animation target is an index into a [`TargetStore`], the same
//! parallel-array idea the page uses for components: the orchestrator and
//! timeline only ever hold [`TargetId`]s, never the elements themselves.

/// Opaque handle to an animatable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(usize);

impl TargetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The animatable state of one element.
///
/// `opacity` and `visible` move together (autoAlpha): an element at zero
/// opacity is also invisible, so it is skipped by paint and hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub opacity: f64,
    pub visible: bool,
    /// Vertical offset in pixels.
    pub y: f64,
    /// Vertical offset as a percentage of the element's own height.
    pub y_percent: f64,
    /// Blur radius in pixels.
    pub blur: f64,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            visible: true,
            y: 0.0,
            y_percent: 0.0,
            blur: 0.0,
        }
    }
}

impl VisualState {
    /// Set opacity and visibility together.
    pub fn set_auto_alpha(&mut self, value: f64) {
        self.opacity = value.clamp(0.0, 1.0);
        self.visible = self.opacity > 0.0;
    }

    /// Fully shown at rest position.
    pub fn is_revealed(&self) -> bool {
        self.visible
            && (self.opacity - 1.0).abs() < 1e-6
            && self.y.abs() < 1e-6
            && self.y_percent.abs() < 1e-6
            && self.blur.abs() < 1e-6
    }

    /// Invisible, whatever the other properties are.
    pub fn is_hidden(&self) -> bool {
        !self.visible || self.opacity <= 0.0
    }
}

/// A partial set of property values, as passed to `set` / `to`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TweenVars {
    pub auto_alpha: Option<f64>,
    pub y: Option<f64>,
    pub y_percent: Option<f64>,
    pub blur: Option<f64>,
}

impl TweenVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_alpha(mut self, value: f64) -> Self {
        self.auto_alpha = Some(value);
        self
    }

    pub fn y(mut self, value: f64) -> Self {
        self.y = Some(value);
        self
    }

    pub fn y_percent(mut self, value: f64) -> Self {
        self.y_percent = Some(value);
        self
    }

    pub fn blur(mut self, value: f64) -> Self {
        self.blur = Some(value);
        self
    }

    /// Apply immediately.
    pub fn apply(&self, state: &mut VisualState) {
        if let Some(alpha) = self.auto_alpha {
            state.set_auto_alpha(alpha);
        }
        if let Some(y) = self.y {
            state.y = y;
        }
        if let Some(y_percent) = self.y_percent {
            state.y_percent = y_percent;
        }
        if let Some(blur) = self.blur {
            state.blur = blur.max(0.0);
        }
    }

    /// Interpolate from `from` toward these values at eased progress `p`.
    pub fn interpolate(&self, from: &VisualState, p: f64, state: &mut VisualState) {
        let lerp = |a: f64, b: f64| a + (b - a) * p;
        if let Some(alpha) = self.auto_alpha {
            state.set_auto_alpha(lerp(from.opacity, alpha));
        }
        if let Some(y) = self.y {
            state.y = lerp(from.y, y);
        }
        if let Some(y_percent) = self.y_percent {
            state.y_percent = lerp(from.y_percent, y_percent);
        }
        if let Some(blur) = self.blur {
            state.blur = lerp(from.blur, blur).max(0.0);
        }
    }
}

/// Visual state storage indexed by [`TargetId`].
#[derive(Debug, Default)]
pub struct TargetStore {
    states: Vec<VisualState>,
}

impl TargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a target in its natural (fully shown) state.
    pub fn alloc(&mut self) -> TargetId {
        self.states.push(VisualState::default());
        TargetId(self.states.len() - 1)
    }

    pub fn get(&self, id: TargetId) -> Option<&VisualState> {
        self.states.get(id.0)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut VisualState> {
        self.states.get_mut(id.0)
    }

    /// Apply `vars` to each target. Unknown ids are skipped.
    pub fn set(&mut self, targets: &[TargetId], vars: &TweenVars) {
        for &id in targets {
            if let Some(state) = self.states.get_mut(id.0) {
                vars.apply(state);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}
