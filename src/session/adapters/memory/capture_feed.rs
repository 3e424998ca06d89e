//! In-memory capture feed that fans events out to subscribers.

use crate::session::ports::{CaptureEvent, CaptureFeed, CaptureHandler, Subscription};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory [`CaptureFeed`].
///
/// Handlers run synchronously on the emitting thread, in subscription
/// order. Cancelling a subscription removes its handler.
#[derive(Clone, Default)]
pub struct InMemoryCaptureFeed {
    handlers: Arc<Mutex<HandlerTable>>,
}

#[derive(Default)]
struct HandlerTable {
    next_key: u64,
    entries: BTreeMap<u64, CaptureHandler>,
}

impl InMemoryCaptureFeed {
    /// Creates a feed with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every subscriber and returns how many received it.
    #[must_use]
    pub fn emit(&self, event: &CaptureEvent) -> usize {
        // Handlers are called without the table lock so they may subscribe
        // or cancel.
        let handlers: Vec<CaptureHandler> =
            lock(&self.handlers).entries.values().cloned().collect();
        for handler in &handlers {
            handler(event.clone());
        }
        handlers.len()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.handlers).entries.len()
    }
}

impl CaptureFeed for InMemoryCaptureFeed {
    fn subscribe(&self, handler: CaptureHandler) -> Subscription {
        let key = {
            let mut table = lock(&self.handlers);
            let key = table.next_key;
            table.next_key = table.next_key.saturating_add(1);
            table.entries.insert(key, handler);
            key
        };

        let table = Arc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(handlers) = table.upgrade() {
                lock(&handlers).entries.remove(&key);
            }
        })
    }
}

impl fmt::Debug for InMemoryCaptureFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryCaptureFeed")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn lock(table: &Mutex<HandlerTable>) -> MutexGuard<'_, HandlerTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}
