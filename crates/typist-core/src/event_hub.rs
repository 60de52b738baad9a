//! EventHub - named publish/subscribe with cancelable dispatch
//!
//! Handlers are keyed by event name and invoked synchronously in
//! registration order. Dispatch runs over a snapshot of the handler list,
//! so handlers may register or remove handlers without disturbing the
//! event currently being delivered.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::trace;

/// Lifecycle event names emitted by the animator
pub struct AnimationEvent;

impl AnimationEvent {
    /// Emitted once before the first step
    pub const START: &'static str = "animation:start";
    /// Emitted after each completed pass when looping
    pub const LOOP: &'static str = "animation:loop";
    /// Emitted once when a non-looping run finishes
    pub const END: &'static str = "animation:end";
}

/// An event delivered to handlers
#[derive(Debug)]
pub struct Event {
    name: String,
    default_prevented: AtomicBool,
}

impl Event {
    /// Create a new event with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_prevented: AtomicBool::new(false),
        }
    }

    /// Event name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mark the event as default-prevented
    pub fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    /// Whether any handler called [`Event::prevent_default`]
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }
}

/// Registered event handler. Identity is the allocation, so keep the
/// returned clone around to remove it later.
pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Publish/subscribe registry keyed by event name
#[derive(Default)]
pub struct EventHub {
    listeners: RwLock<HashMap<String, Vec<Handler>>>,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        let counts: HashMap<&str, usize> = listeners
            .iter()
            .map(|(name, stack)| (name.as_str(), stack.len()))
            .collect();
        f.debug_struct("EventHub").field("listeners", &counts).finish()
    }
}

impl EventHub {
    /// Create an empty hub
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Duplicates are allowed and kept in order.
    pub fn on<F>(&self, name: impl Into<String>, handler: F) -> Handler
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        self.add(name, handler.clone());
        handler
    }

    /// Register an already shared handler
    pub fn add(&self, name: impl Into<String>, handler: Handler) {
        let name = name.into();
        trace!(event = %name, "Adding event handler");
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        listeners.entry(name).or_default().push(handler);
    }

    /// Remove the first handler identical to `handler`.
    ///
    /// Returns whether a handler was removed.
    pub fn off(&self, name: &str, handler: &Handler) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        let Some(stack) = listeners.get_mut(name) else {
            return false;
        };
        match stack.iter().position(|h| Arc::ptr_eq(h, handler)) {
            Some(i) => {
                stack.remove(i);
                true
            }
            None => false,
        }
    }

    /// Dispatch an event to its handlers.
    ///
    /// Returns `false` if any handler prevented the default.
    pub fn emit(&self, event: &Event) -> bool {
        let stack: Vec<Handler> = {
            let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
            match listeners.get(event.name()) {
                Some(stack) => stack.clone(),
                None => return true,
            }
        };

        trace!(event = %event.name(), handlers = stack.len(), "Dispatching event");
        for handler in &stack {
            handler(event);
        }
        !event.default_prevented()
    }

    /// Number of handlers registered for `name`
    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        listeners.get(name).map_or(0, Vec::len)
    }
}
