//! # Event Log
//!
//! Handlers record typed events while they run; the result pipeline copies
//! the whole log into the dispatch result.
//!
//! An `EventLog` is a shared handle. Cloning it (or deriving a context from
//! one that holds it) keeps appending to the same underlying list, so
//! chained calls accumulate each other's events. Build a fresh log for every
//! top-level request that must stay isolated.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One key/value attribute of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
    /// Whether downstream indexers should index this attribute.
    pub index: bool,
}

impl EventAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            index: false,
        }
    }
}

/// A typed event with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event type, e.g. `"message"` or `"dvs_request"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<EventAttribute>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute, builder style.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(EventAttribute::new(key, value));
        self
    }

    /// Flatten into `(type, attribute_key, attribute_value)` rows.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &str)> + '_ {
        self.attributes
            .iter()
            .map(move |attr| (self.kind.as_str(), attr.key.as_str(), attr.value.as_str()))
    }
}

/// Shared, append-only event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    /// Create an empty log with its own storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event.
    pub fn emit(&self, event: Event) {
        self.inner.lock().push(event);
    }

    /// Record several events in order.
    pub fn emit_all(&self, events: impl IntoIterator<Item = Event>) {
        self.inner.lock().extend(events);
    }

    /// Snapshot of every event recorded so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Whether both handles write to the same storage.
    #[must_use]
    pub fn shares_storage_with(&self, other: &EventLog) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
