//! Persistent field records
//!
//! A [`Record`] maps the keys of one [`FieldKey`] set to values. Updates are
//! non-destructive: [`Record::set`] returns a new record in which exactly one
//! entry is replaced and every other entry shares its `Arc` with the source,
//! so downstream consumers can detect changes by pointer comparison.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{CoreError, Result};
use crate::key::FieldKey;
use crate::value::FieldValue;

/// One logical record under edit
pub struct Record<K: FieldKey> {
    fields: IndexMap<K, Arc<FieldValue>>,
}

impl<K: FieldKey> Record<K> {
    /// Create an empty record
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Builder-style insert, used when assembling an initial record
    pub fn with(mut self, key: K, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key, Arc::new(value.into()));
        self
    }

    /// Look up a field; `None` when the key has never been set
    pub fn get(&self, key: K) -> Option<&FieldValue> {
        self.fields.get(&key).map(Arc::as_ref)
    }

    /// Look up a field, sharing the stored allocation
    pub fn get_shared(&self, key: K) -> Option<Arc<FieldValue>> {
        self.fields.get(&key).cloned()
    }

    /// Text content of a field, empty when absent or not text
    pub fn text(&self, key: K) -> &str {
        self.get(key).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Produce a new record with `key` replaced by `value`
    pub fn set(&self, key: K, value: impl Into<FieldValue>) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(key, Arc::new(value.into()));
        tracing::trace!(field = key.name(), "record field set");
        Self { fields }
    }

    /// Look up a field by wire name
    pub fn get_by_name(&self, name: &str) -> Result<Option<&FieldValue>> {
        let key = K::from_name(name).ok_or_else(|| CoreError::UnknownField {
            field: name.to_string(),
        })?;
        Ok(self.get(key))
    }

    /// Produce a new record with the field named `name` replaced
    pub fn set_by_name(&self, name: &str, value: impl Into<FieldValue>) -> Result<Self> {
        let key = K::from_name(name).ok_or_else(|| CoreError::UnknownField {
            field: name.to_string(),
        })?;
        Ok(self.set(key, value))
    }

    /// Whether the key has a value
    pub fn contains(&self, key: K) -> bool {
        self.fields.contains_key(&key)
    }

    /// Number of fields holding a value
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field holds a value
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over set fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (K, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (*key, value.as_ref()))
    }

    /// Keys whose values differ between `self` and `other`
    ///
    /// Shared allocations short-circuit the comparison.
    pub fn changed_fields(&self, other: &Self) -> Vec<K> {
        K::all()
            .iter()
            .copied()
            .filter(|key| match (self.fields.get(key), other.fields.get(key)) {
                (None, None) => false,
                (Some(a), Some(b)) => !Arc::ptr_eq(a, b) && a != b,
                _ => true,
            })
            .collect()
    }

    /// Whether `key` refers to the same allocation in both records
    pub fn shares(&self, other: &Self, key: K) -> bool {
        match (self.fields.get(&key), other.fields.get(&key)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<K: FieldKey> Clone for Record<K> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<K: FieldKey> Default for Record<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FieldKey> PartialEq for Record<K> {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<K: FieldKey> fmt::Debug for Record<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|(k, v)| (k.name(), v)))
            .finish()
    }
}
