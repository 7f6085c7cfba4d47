//! Interaction state: pointer, keyboard and terminal input routing.

pub mod global_keys;
pub mod input;
pub mod keyboard;
pub mod mouse;
