//! Clubhouse Form Engine
//!
//! Declarative multi-page forms bound to a [`Record`](clubhouse_core::Record).
//!
//! # Architecture
//!
//! 1. **Leaf Field Controls**: text fields, dropdowns, check selects, uploads
//!    and switches. Each declares the field it edits and emits
//!    `(field, value)` changes through an injected callback.
//!
//! 2. **Form Nodes**: a page is a tree of [`FormNode`]s. Sections group
//!    controls cosmetically; literals pass through untouched.
//!
//! 3. **Composition**: [`FormPage::compose`] walks the tree and binds each
//!    control to its slice of the record plus the shared change callback.
//!
//! 4. **Navigation**: [`MultiPageForm`] tracks the active page and exposes
//!    next/back/submit transitions.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use clubhouse_core::{field_keys, Record, RecordStore};
//! use clubhouse_forms::prelude::*;
//!
//! field_keys! {
//!     pub enum Signup {
//!         Name => "name",
//!         Newsletter => "newsletter",
//!     }
//! }
//!
//! let store = Arc::new(RecordStore::new(Record::<Signup>::new()));
//! let form = MultiPageForm::new("Sign up", store.clone())
//!     .page(
//!         page("About you")
//!             .child(text_field("name").label("Name").required())
//!             .child(switch("newsletter").label("Send me news")),
//!     );
//!
//! let rendered = form.render().unwrap();
//! rendered.control(Signup::Name).unwrap().input("Ada").unwrap();
//! assert_eq!(store.get().text(Signup::Name), "Ada");
//! ```

pub mod controls;
pub mod error;
pub mod multi_page;
pub mod node;
pub mod page;
pub mod requirements;
pub mod section;

pub use controls::{
    check_select, drop_select, join_formatter, switch, text_field, upload, BoundControl,
    ChangeCallback, CheckSelect, Control, ControlKind, DropSelect, FieldMeta, Formatter,
    Selection, Switch, TextField, Upload,
};
pub use error::{FormError, Result};
pub use multi_page::{FieldIssue, MultiPageForm, Navigation, PrimaryAction, RenderedPage};
pub use node::FormNode;
pub use page::{controls_of, page, FormPage, Rendered};
pub use requirements::{RequirementViolation, Requirements};
pub use section::{section, Section, SectionStyle};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::controls::{
        check_select, drop_select, join_formatter, switch, text_field, upload, BoundControl,
        Selection,
    };
    pub use crate::multi_page::{MultiPageForm, PrimaryAction};
    pub use crate::node::FormNode;
    pub use crate::page::{page, FormPage, Rendered};
    pub use crate::requirements::Requirements;
    pub use crate::section::section;
}
