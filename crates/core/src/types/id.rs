//! Newtype IDs for type-safe entity references.
//!
//! The backend API hands out small integer ids for every entity. Wrapping
//! them keeps a `CustomerId` from ever being passed where an `OutletId` is
//! expected.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper around `i32`.
///
/// Generated types get `Serialize`/`Deserialize` with `#[serde(transparent)]`,
/// the usual derives, `new()`/`as_i32()` accessors, `Display`, and `From`
/// conversions in both directions.
///
/// # Example
///
/// ```rust
/// # use nextgen_core::define_id;
/// define_id!(CustomerId);
/// define_id!(OutletId);
///
/// let customer = CustomerId::new(7);
/// let outlet = OutletId::new(7);
///
/// // Different types, so this won't compile:
/// // let _: CustomerId = outlet;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Standard entity IDs, matching the backend's data model
define_id!(CustomerId);
define_id!(OwnerId);
define_id!(OutletId);
define_id!(ItemId);
// A menu line links an item to an outlet; orders reference this id
define_id!(MenuEntryId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = OutletId::new(42);
        assert_eq!(id.as_i32(), 42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(OutletId::from(42), id);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(OrderId::new(17).to_string(), "17");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id: ItemId = serde_json::from_str("5").unwrap();
        assert_eq!(id, ItemId::new(5));
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
    }
}
