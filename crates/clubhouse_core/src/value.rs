//! Field values
//!
//! A form field holds one of a small set of value shapes. Records store
//! values behind `Arc` so unchanged fields can be shared between record
//! versions.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// An in-memory file picked by an upload control
///
/// The bytes live only as long as the record holding them; persisting the
/// file is the submit handler's job.
#[derive(Clone, PartialEq, Eq)]
pub struct FileBlob {
    /// Original file name
    pub name: String,
    /// MIME type reported by the picker
    pub content_type: String,
    /// File contents
    pub bytes: Arc<[u8]>,
}

impl FileBlob {
    /// Create a new file blob
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Size of the file in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file has no contents
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for FileBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileBlob")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A value held by one form field
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Free text, or the id chosen from a dropdown
    Text(String),
    /// A set of selected ids
    Set(Vec<String>),
    /// A picked file
    File(FileBlob),
    /// A toggle
    Bool(bool),
    /// A nested record keyed by field name
    Nested(IndexMap<String, FieldValue>),
}

impl FieldValue {
    /// Text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Selected ids, if this is a set value
    pub fn as_set(&self) -> Option<&[String]> {
        match self {
            FieldValue::Set(ids) => Some(ids),
            _ => None,
        }
    }

    /// File handle, if this is a file value
    pub fn as_file(&self) -> Option<&FileBlob> {
        match self {
            FieldValue::File(file) => Some(file),
            _ => None,
        }
    }

    /// Toggle state, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(on) => Some(*on),
            _ => None,
        }
    }

    /// Nested fields, if this is a nested record
    pub fn as_nested(&self) -> Option<&IndexMap<String, FieldValue>> {
        match self {
            FieldValue::Nested(fields) => Some(fields),
            _ => None,
        }
    }

    /// Whether the value counts as "not filled in"
    ///
    /// Booleans are never empty; `false` is an answer.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Set(ids) => ids.iter().all(|id| id.is_empty()),
            FieldValue::File(file) => file.is_empty(),
            FieldValue::Bool(_) => false,
            FieldValue::Nested(fields) => fields.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(ids: Vec<String>) -> Self {
        FieldValue::Set(ids)
    }
}

impl From<FileBlob> for FieldValue {
    fn from(file: FileBlob) -> Self {
        FieldValue::File(file)
    }
}

impl From<bool> for FieldValue {
    fn from(on: bool) -> Self {
        FieldValue::Bool(on)
    }
}
