//! Dropdown select control

use clubhouse_core::FieldValue;

use super::{FieldMeta, Selection};

/// Single choice from a fixed list; stores the chosen id as text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropSelect {
    meta: FieldMeta,
    /// Offered options in display order
    pub selections: Vec<Selection>,
}

impl DropSelect {
    /// Create a dropdown editing `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            meta: FieldMeta::new(field),
            selections: Vec::new(),
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

    /// Display label for an id
    pub fn display_for(&self, id: &str) -> Option<&str> {
        self.selections
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.display.as_str())
    }

    /// Value to store for `id`, if it is offered
    pub(crate) fn choose(&self, id: &str) -> Option<FieldValue> {
        self.display_for(id).map(|_| FieldValue::Text(id.to_string()))
    }
}

super::field_meta_builders!(DropSelect);

/// Create a dropdown editing `field`
pub fn drop_select(field: impl Into<String>) -> DropSelect {
    DropSelect::new(field)
}
