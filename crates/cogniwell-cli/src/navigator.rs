use std::sync::atomic::{AtomicBool, Ordering};

use cogniwell_core::auth::{NavigationTarget, Navigator};
use tracing::debug;

/// Terminal stand-in for a full-page redirect: tells the user the session is
/// gone and how to start a new one.
///
/// The notice is printed at most once per process, and never when the
/// current command is already the login surface.
#[derive(Default)]
pub struct TerminalNavigator {
    shown: AtomicBool,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigator for commands that are themselves the login surface.
    pub fn at_login() -> Self {
        Self {
            shown: AtomicBool::new(true),
        }
    }
}

impl Navigator for TerminalNavigator {
    fn force_navigate(&self, target: NavigationTarget) {
        if self.shown.swap(true, Ordering::SeqCst) {
            debug!(target = target.path(), "Navigation already shown");
            return;
        }
        match target {
            NavigationTarget::Login => {
                eprintln!("Your session has ended. Run `cogniwell login <email>` to sign in again.");
            }
        }
    }
}
