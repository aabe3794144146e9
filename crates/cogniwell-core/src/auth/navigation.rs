use std::sync::Mutex;

/// Where a forced navigation sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Entry surface for re-establishing a session.
    Login,
}

impl NavigationTarget {
    pub fn path(&self) -> &'static str {
        match self {
            NavigationTarget::Login => "/login",
        }
    }
}

/// Full-context redirect capability.
///
/// Implementations must tolerate repeated calls: several requests failing
/// together each issue their own navigation.
pub trait Navigator: Send + Sync {
    fn force_navigate(&self, target: NavigationTarget);
}

/// Records every navigation instead of performing it.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<NavigationTarget>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<NavigationTarget> {
        self.visits
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn force_navigate(&self, target: NavigationTarget) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(target);
        }
    }
}
