use std::sync::Mutex;

/// Client-side navigation seam used by the guard to leave a protected view.
pub trait Navigator: Send + Sync {
    fn redirect(&self, target: &str);
}

/// Navigator that records every redirect in an in-memory history stack.
/// Suitable for headless hosts and tests.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    pub fn current(&self) -> Option<String> {
        self.history
            .lock()
            .ok()
            .and_then(|history| history.last().cloned())
    }
}

impl Navigator for HistoryNavigator {
    fn redirect(&self, target: &str) {
        if let Ok(mut history) = self.history.lock() {
            history.push(target.to_string());
        }
    }
}
