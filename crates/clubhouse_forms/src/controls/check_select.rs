//! Check select control
//!
//! A row of checkboxes whose checked ids are reduced to one stored value by a
//! formatter. The default formatter stores a [`FieldValue::Set`]; a joining
//! formatter stores a delimited string instead.

use std::fmt;
use std::sync::Arc;

use clubhouse_core::FieldValue;

use super::{FieldMeta, Selection};

/// Reduces the checked ids to the stored value
pub type Formatter = Arc<dyn Fn(Vec<String>) -> FieldValue + Send + Sync>;

/// Formatter storing the ids joined by `separator`
pub fn join_formatter(separator: impl Into<String>) -> Formatter {
    let separator = separator.into();
    Arc::new(move |ids: Vec<String>| FieldValue::Text(ids.join(&separator)))
}

fn set_formatter() -> Formatter {
    Arc::new(FieldValue::Set)
}

/// Multiple choice from a fixed list
#[derive(Clone)]
pub struct CheckSelect {
    meta: FieldMeta,
    /// Offered options in display order
    pub selections: Vec<Selection>,
    formatter: Formatter,
    separator: String,
}

impl CheckSelect {
    /// Create a check select editing `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            meta: FieldMeta::new(field),
            selections: Vec::new(),
            formatter: set_formatter(),
            separator: ",".to_string(),
        }
    }

    /// Add one option
    pub fn selection(mut self, id: impl Into<String>, display: impl Into<String>) -> Self {
        self.selections.push(Selection::new(id, display));
        self
    }

    /// Replace all options
    pub fn selections(mut self, selections: impl IntoIterator<Item = Selection>) -> Self {
        self.selections = selections.into_iter().collect();
        self
    }

    /// Use a custom formatter
    ///
    /// Text produced by a custom formatter is read back by splitting on the
    /// configured separator (`,` unless [`joined`](Self::joined) set another).
    pub fn formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(Vec<String>) -> FieldValue + Send + Sync + 'static,
    {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Store the checked ids as one string joined by `separator`
    pub fn joined(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        self.formatter = join_formatter(separator.clone());
        self.separator = separator;
        self
    }

    /// Whether `id` is one of the offered options
    pub fn offers(&self, id: &str) -> bool {
        self.selections.iter().any(|selection| selection.id == id)
    }

    /// Ids currently checked according to `value`
    pub fn checked_ids(&self, value: Option<&FieldValue>) -> Vec<String> {
        match value {
            Some(FieldValue::Set(ids)) => ids.iter().filter(|id| !id.is_empty()).cloned().collect(),
            Some(FieldValue::Text(text)) => text
                .split(self.separator.as_str())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether `id` is checked according to `value`
    pub fn is_checked(&self, value: Option<&FieldValue>, id: &str) -> bool {
        self.checked_ids(value).iter().any(|checked| checked == id)
    }

    /// Value to store after checking or unchecking `id`
    ///
    /// Empty ids never reach the formatter.
    pub(crate) fn toggled(&self, current: Option<&FieldValue>, id: &str, checked: bool) -> FieldValue {
        let mut ids = self.checked_ids(current);
        if checked {
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        } else {
            ids.retain(|existing| existing != id);
        }
        ids.retain(|id| !id.is_empty());
        (self.formatter)(ids)
    }

    /// Value to store with nothing checked
    pub(crate) fn cleared(&self) -> FieldValue {
        (self.formatter)(Vec::new())
    }
}

super::field_meta_builders!(CheckSelect);

impl fmt::Debug for CheckSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckSelect")
            .field("meta", &self.meta)
            .field("selections", &self.selections)
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}

/// Create a check select editing `field`
pub fn check_select(field: impl Into<String>) -> CheckSelect {
    CheckSelect::new(field)
}
