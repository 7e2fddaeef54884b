//! Record Store - shared holder for the record under edit
//!
//! The page that owns a form creates a [`RecordStore`] and hands an `Arc` of it
//! to the multi-page orchestrator and to its own submit handler. Every field
//! change goes through [`RecordStore::set_field`], which swaps in a new
//! [`Record`] and notifies subscribers.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use clubhouse_core::{field_keys, Record, RecordStore};
//!
//! field_keys! {
//!     pub enum Profile {
//!         Name => "name",
//!     }
//! }
//!
//! let store = Arc::new(RecordStore::new(Record::new()));
//! let _handle = store.subscribe(|record, changed| {
//!     println!("{:?} changed: {:?}", changed, record);
//! });
//!
//! store.set_field(Profile::Name, "Ada");
//! assert_eq!(store.get().text(Profile::Name), "Ada");
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use crate::key::FieldKey;
use crate::record::Record;
use crate::value::FieldValue;

type Subscriber<K> = Arc<dyn Fn(&Record<K>, Option<K>) + Send + Sync>;

/// A shared, subscribable record
pub struct RecordStore<K: FieldKey> {
    /// The current record
    record: RwLock<Record<K>>,
    /// Change subscribers, slot per handle
    subscribers: RwLock<Vec<Option<Subscriber<K>>>>,
}

impl<K: FieldKey> RecordStore<K> {
    /// Create a store holding `initial`
    pub fn new(initial: Record<K>) -> Self {
        Self {
            record: RwLock::new(initial),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the current record
    pub fn get(&self) -> Record<K> {
        self.record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the whole record
    pub fn replace(&self, record: Record<K>) {
        {
            let mut current = self.record.write().unwrap_or_else(PoisonError::into_inner);
            *current = record.clone();
        }
        self.notify_subscribers(&record, None);
    }

    /// Replace a single field, leaving every other entry shared
    pub fn set_field(&self, key: K, value: impl Into<FieldValue>) {
        let record = {
            let mut current = self.record.write().unwrap_or_else(PoisonError::into_inner);
            let next = current.set(key, value);
            *current = next.clone();
            next
        };
        tracing::debug!(field = key.name(), "record store field updated");
        self.notify_subscribers(&record, Some(key));
    }

    /// Update the record through a closure
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&Record<K>) -> Record<K>,
    {
        let record = {
            let mut current = self.record.write().unwrap_or_else(PoisonError::into_inner);
            let next = f(&*current);
            *current = next.clone();
            next
        };
        self.notify_subscribers(&record, None);
    }

    /// Subscribe to record changes
    ///
    /// The callback receives the new record and the key that changed, or
    /// `None` for whole-record replacements. Callbacks run with no lock held,
    /// so they may subscribe, unsubscribe or write to the store. Slots freed by
    /// [`unsubscribe`](Self::unsubscribe) are reused.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&Record<K>, Option<K>) + Send + Sync + 'static,
    {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let callback: Subscriber<K> = Arc::new(callback);
        let index = match subscribers.iter().position(Option::is_none) {
            Some(free) => {
                subscribers[free] = Some(callback);
                free
            }
            None => {
                subscribers.push(Some(callback));
                subscribers.len() - 1
            }
        };
        SubscriptionHandle { index }
    }

    /// Drop a subscription
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = subscribers.get_mut(handle.index) {
            *slot = None;
        }
    }

    fn notify_subscribers(&self, record: &Record<K>, changed: Option<K>) {
        let callbacks: Vec<Subscriber<K>> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .flatten()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(record, changed);
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .flatten()
            .count()
    }
}

impl<K: FieldKey> Default for RecordStore<K> {
    fn default() -> Self {
        Self::new(Record::new())
    }
}

/// Handle for unsubscribing from store updates
#[derive(Debug)]
pub struct SubscriptionHandle {
    index: usize,
}
