//! Synchronous multicast event streams.
//!
//! Widgets expose their notifications as [`EventStream`]s. Subscribing returns
//! a [`Subscription`] guard; the handler stays registered until the guard is
//! dropped or explicitly unsubscribed.

use std::sync::{Arc, RwLock, Weak};

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
}

/// A multicast stream of `E` events.
///
/// Cloning yields another handle to the same subscriber list. `emit` calls
/// every handler in registration order before returning, and never holds the
/// registry lock while a handler runs, so handlers may subscribe, unsubscribe
/// or emit again.
pub struct EventStream<E> {
    registry: Arc<RwLock<Registry<E>>>,
}

/// Payload-free stream used for "state changed, re-read the getters".
pub type StateChanges = EventStream<()>;

impl<E> EventStream<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Deliver `event` to every current subscriber.
    pub fn emit(&self, event: &E) {
        let handlers: Vec<Handler<E>> = match self.registry.read() {
            Ok(registry) => registry.handlers.iter().map(|(_, h)| h.clone()).collect(),
            Err(_) => return,
        };
        for handler in handlers {
            handler(event);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .read()
            .map(|registry| registry.handlers.len())
            .unwrap_or(0)
    }
}

impl<E: 'static> EventStream<E> {
    /// Register a handler. It is removed when the returned guard goes away.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let Ok(mut registry) = self.registry.write() else {
            return Subscription::empty();
        };
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, Arc::new(handler)));

        let weak: Weak<RwLock<Registry<E>>> = Arc::downgrade(&self.registry);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade()
                    && let Ok(mut registry) = registry.write()
                {
                    registry.handlers.retain(|(handler_id, _)| *handler_id != id);
                }
            })),
        }
    }
}

impl<E> Clone for EventStream<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for EventStream<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventStream<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Guard for a registered handler.
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn empty() -> Self {
        Self { remove: None }
    }

    /// Remove the handler now.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}
