use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;

use crate::domain::model::Notification;
use crate::domain::ports::Notifier;

pub const DEFAULT_AUTO_DISMISS: Duration = Duration::from_millis(4000);

/// Owner of the single process-wide notification.
///
/// A new notification replaces the current one. Each notification is cleared
/// after `auto_dismiss` unless something newer replaced it first. Display
/// layers follow changes through [`NotificationCenter::subscribe`].
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

struct Inner {
    sender: watch::Sender<Notification>,
    // Bumped on every change; a timer only clears its own generation.
    generation: Mutex<u64>,
    auto_dismiss: Duration,
}

impl NotificationCenter {
    pub fn new(auto_dismiss: Duration) -> Self {
        let (sender, _) = watch::channel(Notification::hidden());
        Self {
            inner: Arc::new(Inner {
                sender,
                generation: Mutex::new(0),
                auto_dismiss,
            }),
        }
    }

    pub fn auto_dismiss(&self) -> Duration {
        self.inner.auto_dismiss
    }

    pub fn current(&self) -> Notification {
        self.inner.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Notification> {
        self.inner.sender.subscribe()
    }

    pub fn dismiss(&self) {
        let mut generation = self.lock_generation();
        *generation += 1;
        self.inner.sender.send_replace(Notification::hidden());
    }

    fn lock_generation(&self) -> std::sync::MutexGuard<'_, u64> {
        self.inner
            .generation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_if_current(&self, expected: u64) {
        let generation = self.lock_generation();
        if *generation == expected {
            self.inner.sender.send_replace(Notification::hidden());
            tracing::debug!(generation = expected, "notification auto-dismissed");
        }
    }

    fn schedule_clear(&self, generation: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no tokio runtime, notification stays until replaced");
            return;
        };
        let center = self.clone();
        let delay = self.inner.auto_dismiss;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            center.clear_if_current(generation);
        });
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_DISMISS)
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        let generation = {
            let mut generation = self.lock_generation();
            *generation += 1;
            let shown = Notification {
                visible: true,
                ..notification
            };
            tracing::debug!(severity = ?shown.severity, message = %shown.message, "notification");
            self.inner.sender.send_replace(shown);
            *generation
        };
        self.schedule_clear(generation);
    }
}
