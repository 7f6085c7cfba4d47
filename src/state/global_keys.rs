//! Global Keys Module - Quit shortcuts
//!
//! - Ctrl+C: graceful shutdown
//! - q / Escape: close the page
//!
//! Registered on mount, cleaned up on unmount.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::keyboard::{self, KeyboardEvent};

/// Cleanup handle for global key handlers
pub struct GlobalKeysHandle {
    cleanups: Vec<Box<dyn FnOnce()>>,
}

impl GlobalKeysHandle {
    /// Clean up all global key handlers
    pub fn cleanup(self) {
        for cleanup in self.cleanups {
            cleanup();
        }
    }
}

/// Whether a key press asks the page to close.
pub fn is_quit(event: &KeyboardEvent) -> bool {
    match event.key.as_str() {
        "c" => event.modifiers.ctrl,
        "q" | "Escape" => !event.modifiers.ctrl && !event.modifiers.alt,
        _ => false,
    }
}

/// Set up global key handlers. `running` goes false on a quit key.
pub fn setup_global_keys(running: Arc<AtomicBool>) -> GlobalKeysHandle {
    let quit = keyboard::on(move |event| {
        if !is_quit(event) {
            return false;
        }
        debug!(key = %event.key, "quit requested");
        running.store(false, Ordering::SeqCst);
        true
    });

    GlobalKeysHandle {
        cleanups: vec![Box::new(quit)],
    }
}

// =============================================================================
// TESTS
// =============================================================================
