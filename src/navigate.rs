//! Opening links.
//!
//! Clicking a link region hands its URL to a [`Navigator`]. The page never
//! waits on the result: failures are logged and the opener owns whatever
//! happens next.

use std::cell::RefCell;
use std::process::{Command, Stdio};
use std::rc::Rc;

use tracing::{info, warn};

use crate::error::{FolioError, Result};

/// Schemes the page is willing to hand to the host.
pub const ALLOWED_SCHEMES: [&str; 3] = ["https://", "http://", "mailto:"];

pub trait Navigator {
    fn open(&self, url: &str) -> Result<()>;
}

/// Reject anything that is not a web or mail link.
pub fn check_url(url: &str) -> Result<()> {
    if ALLOWED_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        Ok(())
    } else {
        Err(FolioError::navigation(url, "unsupported scheme"))
    }
}

/// Open `url`, logging the outcome.
pub fn open_logged(navigator: &dyn Navigator, url: &str) {
    match navigator.open(url) {
        Ok(()) => info!(url, "opened link"),
        Err(err) => warn!(%err, "navigation failed"),
    }
}

// =============================================================================
// System opener
// =============================================================================

/// Opens links with the platform's default handler, detached.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNavigator;

/// The platform opener command for `url`.
pub fn opener_command(url: &str) -> Command {
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

impl Navigator for SystemNavigator {
    fn open(&self, url: &str) -> Result<()> {
        check_url(url)?;

        let mut child = opener_command(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| FolioError::navigation(url, e.to_string()))?;

        // Reap the opener without blocking the UI
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

// =============================================================================
// Recording navigator
// =============================================================================

/// Remembers every URL instead of opening it. Clones share the record.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    opened: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open(&self, url: &str) -> Result<()> {
        check_url(url)?;
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_url() {
        assert!(check_url("https://gymguru.io/").is_ok());
        assert!(check_url("mailto:yernar34@gmail.com").is_ok());
        assert!(matches!(
            check_url("file:///etc/passwd"),
            Err(FolioError::Navigation { .. })
        ));
    }

    #[test]
    fn test_recording_navigator_shares_record() {
        let nav = RecordingNavigator::new();
        let clone = nav.clone();
        clone.open("https://x.com/yernar1121").unwrap();
        assert!(nav.open("javascript:alert(1)").is_err());
        assert_eq!(nav.opened(), vec!["https://x.com/yernar1121"]);
    }

    #[test]
    fn test_opener_command_carries_url() {
        let cmd = opener_command("https://gymguru.io/");
        assert!(cmd.get_args().any(|a| a == "https://gymguru.io/"));
    }
}
