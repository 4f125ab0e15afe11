use std::sync::Mutex;

use crate::domain::model::Destination;
use crate::domain::ports::Navigator;

/// Navigator for headless runs: logs the route and remembers the last one.
#[derive(Debug, Default)]
pub struct LogNavigator {
    last: Mutex<Option<Destination>>,
}

impl LogNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_destination(&self) -> Option<Destination> {
        self.last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Navigator for LogNavigator {
    fn navigate(&self, destination: &Destination) {
        tracing::info!("➡️  navigate to {}", destination);
        *self
            .last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(destination.clone());
    }
}
