//! Typed field key sets
//!
//! A record's key set is an enum implementing [`FieldKey`]. Each variant maps
//! to the wire name used by form declarations and remote payloads. The
//! [`field_keys!`](crate::field_keys) macro declares such an enum together with
//! its name table.

use std::fmt::Debug;
use std::hash::Hash;

/// A closed set of field names for one kind of record
pub trait FieldKey: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// The wire name of this field
    fn name(self) -> &'static str;

    /// Resolve a wire name back to a key
    fn from_name(name: &str) -> Option<Self>;

    /// Every key in declaration order
    fn all() -> &'static [Self];
}

/// Declare a field key enum and implement [`FieldKey`] for it
///
/// ```rust
/// use clubhouse_core::{field_keys, FieldKey};
///
/// field_keys! {
///     /// Fields of a login form
///     pub enum Login {
///         User => "user",
///         Password => "password",
///     }
/// }
///
/// assert_eq!(Login::from_name("user"), Some(Login::User));
/// assert_eq!(Login::Password.name(), "password");
/// assert_eq!(Login::all().len(), 2);
/// ```
#[macro_export]
macro_rules! field_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::FieldKey for $name {
            fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }

            fn from_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    $( $wire => ::std::option::Option::Some($name::$variant), )+
                    _ => ::std::option::Option::None,
                }
            }

            fn all() -> &'static [Self] {
                &[ $( $name::$variant ),+ ]
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::FieldKey::name(*self))
            }
        }
    };
}
