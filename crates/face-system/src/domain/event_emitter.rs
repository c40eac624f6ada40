//! # EventEmitter
//!
//! Synchronous multi-subscriber notification. Subscribers run on the calling
//! thread, in the order they connected, and `emit` does not return until the
//! last one has run.

use std::fmt;

/// Handle returned by `connect`, used to disconnect later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Handler<T> = Box<dyn FnMut(&T) + Send>;

/// Ordered list of subscribers for one event.
pub struct EventEmitter<T> {
    handlers: Vec<(Subscription, Handler<T>)>,
    next_id: u64,
}

impl<T> EventEmitter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    /// Add a subscriber at the end of the list.
    pub fn connect<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&T) + Send + 'static,
    {
        let subscription = Subscription(self.next_id);
        self.next_id += 1;
        self.handlers.push((subscription, Box::new(handler)));
        subscription
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn disconnect(&mut self, subscription: Subscription) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(s, _)| *s != subscription);
        self.handlers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke every subscriber with `value`.
    pub(crate) fn emit(&mut self, value: &T) {
        for (_, handler) in &mut self.handlers {
            handler(value);
        }
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_subscribers_run_in_connect_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut emitter = EventEmitter::<u32>::new();

        for tag in ["a", "b", "c"] {
            let log = Arc::clone(&log);
            emitter.connect(move |v| log.lock().push(format!("{tag}{v}")));
        }

        emitter.emit(&7);
        assert_eq!(*log.lock(), ["a7", "b7", "c7"]);
    }

    #[test]
    fn test_disconnect() {
        let hits = Arc::new(Mutex::new(0));
        let mut emitter = EventEmitter::<()>::new();

        let counted = Arc::clone(&hits);
        let sub = emitter.connect(move |_| *counted.lock() += 1);
        emitter.emit(&());
        assert!(emitter.disconnect(sub));
        assert!(!emitter.disconnect(sub));
        emitter.emit(&());

        assert_eq!(*hits.lock(), 1);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_emit_without_subscribers() {
        let mut emitter = EventEmitter::<String>::default();
        emitter.emit(&"nobody".to_string());
        assert_eq!(emitter.subscriber_count(), 0);
    }
}
