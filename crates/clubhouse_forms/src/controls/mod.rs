//! Leaf field controls
//!
//! A control is declared with the field name it edits plus display metadata.
//! Declared controls are inert; composition turns each one into a
//! [`BoundControl`] that carries the current value and the change callback.
//! Interactions happen on the bound control, which only ever reports its own
//! field.

mod check_select;
mod drop_select;
mod switch;
mod text_field;
mod upload;

use std::sync::Arc;

use clubhouse_core::{FieldKey, FieldValue, FileBlob};
use smallvec::SmallVec;

use crate::error::{FormError, Result};
use crate::requirements::{RequirementViolation, Requirements};

pub use check_select::{check_select, join_formatter, CheckSelect, Formatter};
pub use drop_select::{drop_select, DropSelect};
pub use switch::{switch, Switch};
pub use text_field::{text_field, TextField};
pub use upload::{upload, Upload};

/// Change callback shared by every control on a page
pub type ChangeCallback<K> = Arc<dyn Fn(K, FieldValue) + Send + Sync>;

/// Static metadata common to every leaf control
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMeta {
    /// Name of the record field this control edits
    pub field: String,
    /// Display label
    pub label: Option<String>,
    /// Whether an empty value is a violation
    pub required: bool,
    /// Text requirements
    pub requirements: Requirements,
    /// Help text shown under the control
    pub description: Option<String>,
}

impl FieldMeta {
    /// Metadata for `field` with everything else unset
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }

    /// Violations for the given value
    ///
    /// Empty optional fields are not checked against text requirements.
    pub fn violations(&self, value: Option<&FieldValue>) -> SmallVec<[RequirementViolation; 2]> {
        match value {
            None => self.missing(),
            Some(value) if value.is_empty() => self.missing(),
            Some(FieldValue::Text(text)) => self.requirements.check(text),
            Some(_) => SmallVec::new(),
        }
    }

    fn missing(&self) -> SmallVec<[RequirementViolation; 2]> {
        let mut violations = SmallVec::new();
        if self.required {
            violations.push(RequirementViolation::Missing);
        }
        violations
    }
}

/// Implements the metadata builder methods shared by every control
macro_rules! field_meta_builders {
    ($ty:ty) => {
        impl $ty {
            /// Set the display label
            pub fn label(mut self, label: impl Into<String>) -> Self {
                self.meta.label = Some(label.into());
                self
            }

            /// Mark the field as required
            pub fn required(mut self) -> Self {
                self.meta.required = true;
                self
            }

            /// Set the text requirements
            pub fn requirements(mut self, requirements: $crate::requirements::Requirements) -> Self {
                self.meta.requirements = requirements;
                self
            }

            /// Set the help text
            pub fn description(mut self, description: impl Into<String>) -> Self {
                self.meta.description = Some(description.into());
                self
            }

            /// The control's field metadata
            pub fn meta(&self) -> &$crate::controls::FieldMeta {
                &self.meta
            }
        }
    };
}
pub(crate) use field_meta_builders;

/// A `{id, display}` pair offered by selection controls
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Stored value
    pub id: String,
    /// Label shown to the user
    pub display: String,
}

impl Selection {
    /// Create a new selection
    pub fn new(id: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: display.into(),
        }
    }
}

/// Which kind of leaf a control is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Text,
    DropSelect,
    CheckSelect,
    Upload,
    Switch,
}

/// Any leaf control
#[derive(Clone, Debug)]
pub enum Control {
    Text(TextField),
    DropSelect(DropSelect),
    CheckSelect(CheckSelect),
    Upload(Upload),
    Switch(Switch),
}

impl Control {
    /// The control's field metadata
    pub fn meta(&self) -> &FieldMeta {
        match self {
            Control::Text(c) => c.meta(),
            Control::DropSelect(c) => c.meta(),
            Control::CheckSelect(c) => c.meta(),
            Control::Upload(c) => c.meta(),
            Control::Switch(c) => c.meta(),
        }
    }

    /// Declared field name
    pub fn field(&self) -> &str {
        &self.meta().field
    }

    /// The control's kind
    pub fn kind(&self) -> ControlKind {
        match self {
            Control::Text(_) => ControlKind::Text,
            Control::DropSelect(_) => ControlKind::DropSelect,
            Control::CheckSelect(_) => ControlKind::CheckSelect,
            Control::Upload(_) => ControlKind::Upload,
            Control::Switch(_) => ControlKind::Switch,
        }
    }
}

/// A control bound to a record slice and change callback
#[derive(Clone)]
pub struct BoundControl<K: FieldKey> {
    key: K,
    control: Control,
    value: Option<Arc<FieldValue>>,
    on_change: ChangeCallback<K>,
}

impl<K: FieldKey> BoundControl<K> {
    pub(crate) fn new(
        key: K,
        control: Control,
        value: Option<Arc<FieldValue>>,
        on_change: ChangeCallback<K>,
    ) -> Self {
        Self {
            key,
            control,
            value,
            on_change,
        }
    }

    /// The bound field key
    pub fn key(&self) -> K {
        self.key
    }

    /// The declared control, unchanged by binding
    pub fn control(&self) -> &Control {
        &self.control
    }

    /// The control's field metadata
    pub fn meta(&self) -> &FieldMeta {
        self.control.meta()
    }

    /// The injected value; `None` when the record has no entry for the field
    pub fn value(&self) -> Option<&FieldValue> {
        self.value.as_deref()
    }

    /// The injected value's allocation, shared with the record
    pub fn shared_value(&self) -> Option<&Arc<FieldValue>> {
        self.value.as_ref()
    }

    /// Requirement violations for the injected value
    ///
    /// Uploads also report a stored file whose type they do not accept.
    pub fn violations(&self) -> SmallVec<[RequirementViolation; 2]> {
        let mut violations = self.meta().violations(self.value());
        if let (Control::Upload(upload), Some(FieldValue::File(file))) = (&self.control, self.value()) {
            if !upload.accepts(&file.content_type) {
                violations.push(RequirementViolation::UnacceptedFileType {
                    content_type: file.content_type.clone(),
                });
            }
        }
        violations
    }

    /// Type into a text field
    pub fn input(&self, text: impl Into<String>) -> Result<()> {
        match &self.control {
            Control::Text(_) => {
                self.emit(FieldValue::Text(text.into()));
                Ok(())
            }
            _ => Err(self.unsupported("input")),
        }
    }

    /// Pick an option in a dropdown
    ///
    /// Returns `Ok(false)` without emitting when `id` is not offered.
    pub fn select(&self, id: &str) -> Result<bool> {
        match &self.control {
            Control::DropSelect(select) => match select.choose(id) {
                Some(value) => {
                    self.emit(value);
                    Ok(true)
                }
                None => Ok(false),
            },
            _ => Err(self.unsupported("select")),
        }
    }

    /// Check or uncheck one option of a check select
    ///
    /// Returns `Ok(false)` without emitting when `id` is not offered.
    pub fn toggle(&self, id: &str, checked: bool) -> Result<bool> {
        match &self.control {
            Control::CheckSelect(select) if select.offers(id) => {
                self.emit(select.toggled(self.value(), id, checked));
                Ok(true)
            }
            Control::CheckSelect(_) => Ok(false),
            _ => Err(self.unsupported("toggle")),
        }
    }

    /// Hand a picked file to an upload control
    ///
    /// Returns `Ok(false)` without emitting when the file's content type is
    /// not accepted.
    pub fn choose(&self, file: FileBlob) -> Result<bool> {
        match &self.control {
            Control::Upload(upload) if upload.accepts(&file.content_type) => {
                self.emit(FieldValue::File(file));
                Ok(true)
            }
            Control::Upload(_) => {
                tracing::debug!(
                    field = self.key.name(),
                    content_type = %file.content_type,
                    "file type not accepted"
                );
                Ok(false)
            }
            _ => Err(self.unsupported("choose")),
        }
    }

    /// Flip a switch
    pub fn set_on(&self, on: bool) -> Result<()> {
        match &self.control {
            Control::Switch(_) => {
                self.emit(FieldValue::Bool(on));
                Ok(())
            }
            _ => Err(self.unsupported("set_on")),
        }
    }

    /// Reset the field to its empty value
    ///
    /// Uploads cannot be cleared; a picked file is replaced by picking another.
    pub fn clear(&self) -> Result<()> {
        let value = match &self.control {
            Control::Text(_) | Control::DropSelect(_) => FieldValue::Text(String::new()),
            Control::CheckSelect(select) => select.cleared(),
            Control::Switch(_) => FieldValue::Bool(false),
            Control::Upload(_) => return Err(self.unsupported("clear")),
        };
        self.emit(value);
        Ok(())
    }

    fn emit(&self, value: FieldValue) {
        tracing::trace!(field = self.key.name(), "control change");
        (self.on_change)(self.key, value);
    }

    fn unsupported(&self, action: &'static str) -> FormError {
        FormError::Unsupported {
            field: self.key.name().to_string(),
            kind: self.control.kind(),
            action,
        }
    }
}

impl<K: FieldKey> std::fmt::Debug for BoundControl<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundControl")
            .field("key", &self.key)
            .field("control", &self.control)
            .field("value", &self.value)
            .finish()
    }
}
