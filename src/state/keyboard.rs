//! Keyboard events and their subscribers.
//!
//! The page has no keyboard-driven content; the only subscriber in the app
//! is the quit handler in [`global_keys`](super::global_keys).

use std::cell::RefCell;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A key by name ("q", "Escape", "Enter") plus modifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_modifiers(key, Modifiers::none())
    }

    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self { key: key.into(), modifiers, state: KeyState::Press }
    }

    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }
}

/// Return true to consume the event.
type KeyHandler = Box<dyn Fn(&KeyboardEvent) -> bool>;

#[derive(Default)]
struct Subscribers {
    handlers: Vec<(usize, KeyHandler)>,
    next_id: usize,
}

thread_local! {
    static SUBSCRIBERS: RefCell<Subscribers> = RefCell::new(Subscribers::default());
}

/// Hand a key press to every subscriber until one consumes it.
/// Repeats and releases are dropped.
pub fn dispatch(event: KeyboardEvent) -> bool {
    if !event.is_press() {
        return false;
    }
    SUBSCRIBERS.with(|subs| subs.borrow().handlers.iter().any(|(_, handler)| handler(&event)))
}

/// Subscribe to key presses. Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = SUBSCRIBERS.with(|subs| {
        let mut subs = subs.borrow_mut();
        let id = subs.next_id;
        subs.next_id += 1;
        subs.handlers.push((id, Box::new(handler)));
        id
    });

    move || {
        SUBSCRIBERS.with(|subs| subs.borrow_mut().handlers.retain(|(handler_id, _)| *handler_id != id));
    }
}

/// Drop every subscriber (for tests and remounts).
pub fn reset_keyboard_state() {
    SUBSCRIBERS.with(|subs| *subs.borrow_mut() = Subscribers::default());
}
