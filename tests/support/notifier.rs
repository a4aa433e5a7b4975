use std::sync::Arc;

use parking_lot::Mutex;

use crossarb::port::{Event, Notifier};

/// Keeps every event it receives. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// `first_seen` flags of the opportunity events, in order.
    pub fn first_seen_flags(&self) -> Vec<bool> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::OpportunityDetected { first_seen, .. } => Some(*first_seen),
                _ => None,
            })
            .collect()
    }

    pub fn scans_completed(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, Event::ScanCompleted(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}
