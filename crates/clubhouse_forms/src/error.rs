//! Error types for clubhouse_forms

use thiserror::Error;

use crate::controls::ControlKind;

/// Errors raised while composing or driving a form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A control declares a field outside the record's key set
    #[error("control on page `{page}` declares unknown field `{field}`")]
    UnknownField { field: String, page: String },

    /// Submit was requested before reaching the last page
    #[error("submit is only available on the last page (on page {index}, last is {last})")]
    NotOnLastPage { index: usize, last: usize },

    /// The form has no pages
    #[error("form has no pages")]
    EmptyForm,

    /// An interaction that the control does not support
    #[error("`{action}` is not supported by the {kind:?} control for `{field}`")]
    Unsupported {
        field: String,
        kind: ControlKind,
        action: &'static str,
    },
}

/// Result type for clubhouse_forms operations
pub type Result<T> = std::result::Result<T, FormError>;
