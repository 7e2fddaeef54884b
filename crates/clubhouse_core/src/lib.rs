//! Clubhouse Core
//!
//! Foundational form-state primitives shared by the rest of the workspace:
//!
//! - **Field Keys**: typed key sets declared with [`field_keys!`]
//! - **Field Values**: heterogeneous values a form field can hold
//! - **Records**: persistent field-name to value maps with single-field updates
//! - **Record Stores**: shared, subscribable holders for the record under edit
//!
//! # Example
//!
//! ```rust
//! use clubhouse_core::{field_keys, Record};
//!
//! field_keys! {
//!     pub enum Contact {
//!         Name => "name",
//!         Email => "email",
//!     }
//! }
//!
//! let record = Record::new().with(Contact::Name, "Ada");
//! let updated = record.set(Contact::Email, "ada@example.com");
//!
//! assert_eq!(updated.get(Contact::Name).and_then(|v| v.as_text()), Some("Ada"));
//! assert!(record.get(Contact::Email).is_none());
//! ```

pub mod error;
pub mod key;
pub mod record;
pub mod store;
pub mod value;

pub use error::{CoreError, Result};
pub use key::FieldKey;
pub use record::Record;
pub use store::{RecordStore, SubscriptionHandle};
pub use value::{FieldValue, FileBlob};
