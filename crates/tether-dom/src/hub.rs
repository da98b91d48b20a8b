//! Listener lists keyed by event name.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use tether_core::{BindError, Capabilities, EventTarget, Listener};

new_key_type! {
    struct ListenerKey;
}

struct Entry<E: 'static> {
    event: String,
    listener: Listener<E>,
}

/// Concrete [`EventTarget`]: keeps listeners per event name in registration
/// order and calls them synchronously on [`dispatch`](EventHub::dispatch).
pub struct EventHub<E: 'static> {
    caps: Cell<Capabilities>,
    supported: Option<HashSet<String>>,
    entries: RefCell<SlotMap<ListenerKey, Entry<E>>>,
    by_event: RefCell<HashMap<String, SmallVec<[ListenerKey; 4]>>>,
}

impl<E: 'static> EventHub<E> {
    pub fn new() -> Self {
        Self {
            caps: Cell::new(Capabilities::all()),
            supported: None,
            entries: RefCell::new(SlotMap::with_key()),
            by_event: RefCell::new(HashMap::new()),
        }
    }

    /// Only these event names may be listened to.
    pub fn with_supported_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported = Some(events.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_capabilities(self, caps: Capabilities) -> Self {
        self.caps.set(caps);
        self
    }

    pub fn set_capabilities(&self, caps: Capabilities) {
        self.caps.set(caps);
    }

    pub fn supports(&self, event: &str) -> bool {
        self.supported
            .as_ref()
            .is_none_or(|set| set.contains(event))
    }

    /// Calls every listener registered under `event`, in registration order.
    /// Listeners removed by an earlier listener in the same dispatch are
    /// skipped; listeners added during dispatch wait for the next one.
    /// Returns how many listeners ran.
    pub fn dispatch(&self, event: &str, payload: &E) -> usize {
        let keys: SmallVec<[ListenerKey; 4]> = match self.by_event.borrow().get(event) {
            Some(keys) => keys.clone(),
            None => return 0,
        };

        let mut called = 0;
        for key in keys {
            let listener = self.entries.borrow().get(key).map(|e| e.listener.clone());
            if let Some(listener) = listener {
                listener.call(payload);
                called += 1;
            }
        }
        called
    }

    pub fn total_listeners(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Event names with at least one listener.
    pub fn events(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_event.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        self.by_event.borrow_mut().clear();
    }

    fn find(&self, event: &str, listener: &Listener<E>) -> Option<ListenerKey> {
        let by_event = self.by_event.borrow();
        let entries = self.entries.borrow();
        by_event.get(event)?.iter().copied().find(|k| {
            entries
                .get(*k)
                .is_some_and(|e| e.listener.ptr_eq(listener))
        })
    }
}

impl<E: 'static> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventTarget<E> for EventHub<E> {
    fn capabilities(&self) -> Capabilities {
        self.caps.get()
    }

    fn add_listener(&self, event: &str, listener: &Listener<E>) -> Result<bool, BindError> {
        if !self.supports(event) {
            return Err(BindError::UnsupportedEvent {
                event: event.to_string(),
            });
        }
        if self.find(event, listener).is_some() {
            return Ok(false);
        }
        let key = self.entries.borrow_mut().insert(Entry {
            event: event.to_string(),
            listener: listener.clone(),
        });
        self.by_event
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(key);
        Ok(true)
    }

    fn remove_listener(&self, event: &str, listener: &Listener<E>) -> bool {
        let Some(key) = self.find(event, listener) else {
            return false;
        };
        let removed = self.entries.borrow_mut().remove(key);
        if let Some(entry) = &removed {
            let mut by_event = self.by_event.borrow_mut();
            if let Some(keys) = by_event.get_mut(&entry.event) {
                keys.retain(|k| *k != key);
                if keys.is_empty() {
                    by_event.remove(&entry.event);
                }
            }
        }
        removed.is_some()
    }

    fn has_listener(&self, event: &str, listener: &Listener<E>) -> bool {
        self.find(event, listener).is_some()
    }

    fn listener_count(&self, event: &str) -> usize {
        self.by_event.borrow().get(event).map_or(0, |keys| keys.len())
    }
}
