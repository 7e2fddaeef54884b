//! Text field control

use super::FieldMeta;

/// Single- or multi-line text entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextField {
    meta: FieldMeta,
    /// Render as a text area
    pub multiline: bool,
    /// Visible rows when multiline
    pub rows: u32,
    /// Placeholder text shown when empty
    pub placeholder: Option<String>,
}

impl TextField {
    /// Create a text field editing `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            meta: FieldMeta::new(field),
            multiline: false,
            rows: 1,
            placeholder: None,
        }
    }

    /// Render as a multi-line text area
    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Set the visible row count
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    /// Set the placeholder text
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }
}

super::field_meta_builders!(TextField);

/// Create a text field editing `field`
pub fn text_field(field: impl Into<String>) -> TextField {
    TextField::new(field)
}
