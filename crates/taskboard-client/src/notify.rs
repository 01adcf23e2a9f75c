use std::sync::Mutex;

use crate::traits::{Notification, NotificationKind, NotificationSink};

/// Sends notifications to the log. Used when nothing renders toasts.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => tracing::info!("{}", message),
            NotificationKind::Warning => tracing::warn!("{}", message),
            NotificationKind::Error => tracing::error!("{}", message),
        }
    }
}

/// Keeps every notification in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.entries().iter().filter(|n| n.kind == kind).count()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        tracing::debug!("Notification ({:?}): {}", kind, message);
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Notification::new(kind, message));
    }
}
