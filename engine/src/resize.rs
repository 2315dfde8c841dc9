//! Window resize listeners.
//!
//! Each subscriber gets its own [`Throttle`] and a [`ListenerId`]. The id handed out by
//! [`ResizeListeners::subscribe`] is the same one used to release the listener, so teardown
//! never has to rebuild the rate limiter to find its entry.

use std::time::{Duration, Instant};

use crate::throttle::Throttle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Listener<K> {
    id: ListenerId,
    key: K,
    throttle: Throttle,
}

#[derive(Debug, Clone)]
pub struct ResizeListeners<K> {
    next_id: u64,
    listeners: Vec<Listener<K>>,
}

impl<K: Clone> ResizeListeners<K> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    pub fn subscribe(&mut self, key: K, interval: Duration) -> ListenerId {
        self.subscribe_with(key, Throttle::new(interval))
    }

    pub fn subscribe_with(&mut self, key: K, throttle: Throttle) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener { id, key, throttle });
        tracing::debug!(listener = id.0, total = self.listeners.len(), "resize listener added");
        id
    }

    /// Releases a listener. Returns `false` if `id` was already released.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        let removed = self.listeners.len() != before;
        if removed {
            tracing::debug!(listener = id.0, total = self.listeners.len(), "resize listener removed");
        }
        removed
    }

    /// Delivers a resize event at `now`, returning the keys whose handlers should run.
    pub fn dispatch(&mut self, now: Instant) -> Vec<K> {
        self.listeners
            .iter_mut()
            .filter_map(|l| l.throttle.call(now).then(|| l.key.clone()))
            .collect()
    }

    /// Delivers trailing calls whose throttle window has passed.
    pub fn poll(&mut self, now: Instant) -> Vec<K> {
        self.listeners
            .iter_mut()
            .filter_map(|l| l.throttle.poll(now).then(|| l.key.clone()))
            .collect()
    }
}

impl<K: Clone> Default for ResizeListeners<K> {
    fn default() -> Self {
        Self::new()
    }
}
