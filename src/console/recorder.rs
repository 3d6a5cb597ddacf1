//! Key recording: `Idle -> Recording -> Idle`
//!
//! While recording, the recorder holds its own subscription to the event hub
//! and accumulates distinct pressed keys. Stopping drops the subscription and
//! merges the captured keys into the editor's selection.

use crate::models::{ServerEvent, is_unknown_key};
use crate::realtime::{EventHub, Subscription};

#[derive(Debug, Default)]
pub struct KeyRecorder {
    subscription: Option<Subscription>,
    captured: Vec<String>,
}

impl KeyRecorder {
    pub fn is_recording(&self) -> bool {
        self.subscription.is_some()
    }

    /// Keys seen so far in this recording, first-seen order
    pub fn captured(&self) -> &[String] {
        &self.captured
    }

    /// Subscribe and start capturing. No-op while already recording.
    pub fn start(&mut self, hub: &EventHub) -> bool {
        if self.is_recording() {
            return false;
        }
        self.captured.clear();
        self.subscription = Some(hub.subscribe());
        log::debug!("key recording started");
        true
    }

    /// Drain pending events. Returns whether anything new was captured.
    pub fn pump(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        let mut changed = false;
        while let Some(event) = subscription.try_recv() {
            if let ServerEvent::KeyPressed { key } = event {
                if is_unknown_key(&key) || self.captured.contains(&key) {
                    continue;
                }
                self.captured.push(key);
                changed = true;
            }
        }
        changed
    }

    /// Unsubscribe and append keys that are not already in `selected`.
    /// No-op while idle.
    pub fn stop(&mut self, selected: &mut Vec<String>) -> bool {
        if !self.is_recording() {
            return false;
        }
        self.pump();
        self.subscription = None;
        for key in self.captured.drain(..) {
            if !selected.contains(&key) {
                selected.push(key);
            }
        }
        log::debug!("key recording stopped, selection now {:?}", selected);
        true
    }

    /// Unsubscribe and discard the captured keys
    pub fn cancel(&mut self) {
        self.subscription = None;
        self.captured.clear();
    }

    pub fn toggle(&mut self, hub: &EventHub, selected: &mut Vec<String>) -> bool {
        if self.is_recording() {
            self.stop(selected);
        } else {
            self.start(hub);
        }
        self.is_recording()
    }
}
