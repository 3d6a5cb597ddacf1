//! Transient notifications

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::models::ToastKind;

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created: Instant,
}

/// Bounded toast stack; the oldest toast is evicted when full
#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    max: usize,
    ttl: Duration,
    next_id: u64,
}

impl ToastQueue {
    pub fn new(max: usize, ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            max: max.max(1),
            ttl,
            next_id: 0,
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) -> u64 {
        let message = message.into();
        match kind {
            ToastKind::Error => log::warn!("toast: {}", message),
            _ => log::info!("toast: {}", message),
        }

        while self.toasts.len() >= self.max {
            self.toasts.pop_front();
        }
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push_back(Toast {
            id,
            kind,
            message,
            created: now,
        });
        id
    }

    /// Drop toasts older than the TTL
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.created) < ttl);
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        before != self.toasts.len()
    }

    pub fn dismiss_latest(&mut self) -> bool {
        self.toasts.pop_back().is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }
}
