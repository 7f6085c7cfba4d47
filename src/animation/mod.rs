//! Animation primitives: easing, animatable properties, text splitting and
//! the timeline that plays tweens against a [`TargetStore`].

pub mod ease;
pub mod props;
pub mod split;
pub mod timeline;

pub use ease::{Ease, EaseDir};
pub use props::{TargetId, TargetStore, TweenVars, VisualState};
pub use split::{split_chars, CharUnit, SplitText};
pub use timeline::{Timeline, Timing, TweenInfo};
