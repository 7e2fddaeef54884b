//! Boolean switch control

use super::FieldMeta;

/// On/off toggle storing a boolean
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Switch {
    meta: FieldMeta,
}

impl Switch {
    /// Create a switch editing `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            meta: FieldMeta::new(field),
        }
    }
}

super::field_meta_builders!(Switch);

/// Create a switch editing `field`
pub fn switch(field: impl Into<String>) -> Switch {
    Switch::new(field)
}
