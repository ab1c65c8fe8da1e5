//! Inbound host events
//!
//! Hosts deliver events by name with a JSON payload. [`EventSource`] is the
//! subscription side of that; [`EventBus`] is an in-process implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub type EventHandler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub trait EventSource: Send + Sync {
    fn listen(&self, event: &'static str, handler: EventHandler) -> ListenerId;
    fn unlisten(&self, id: ListenerId);
}

/// Listeners registered for a page; unregistered on [`Attachment::detach`]
/// or drop.
pub struct Attachment {
    source: Arc<dyn EventSource>,
    ids: Vec<ListenerId>,
}

impl Attachment {
    pub fn new(source: Arc<dyn EventSource>, ids: Vec<ListenerId>) -> Self {
        Self { source, ids }
    }

    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        for id in self.ids.drain(..) {
            self.source.unlisten(id);
        }
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<&'static str, Vec<(ListenerId, EventHandler)>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `payload` to every listener of `event`. Returns how many
    /// listeners received it.
    pub fn emit(&self, event: &str, payload: &str) -> usize {
        // Handlers run without the lock held so they may (un)subscribe
        let handlers: Vec<EventHandler> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        for handler in &handlers {
            handler(payload);
        }
        handlers.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }
}

impl EventSource for EventBus {
    fn listen(&self, event: &'static str, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event)
            .or_default()
            .push((id, handler));
        id
    }

    fn unlisten(&self, id: ListenerId) {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for list in listeners.values_mut() {
            list.retain(|(lid, _)| *lid != id);
        }
    }
}
