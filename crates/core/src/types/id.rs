//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_key!` macro to create string-keyed wrappers that prevent
//! accidentally mixing identifiers from different entity types.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe string key wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use tidepool_core::define_key;
/// define_key!(SkuKey);
/// define_key!(BundleKey);
///
/// let sku = SkuKey::new("tee-blue");
/// let bundle = BundleKey::new("tee-blue");
///
/// assert_eq!(sku.as_str(), bundle.as_str());
/// // These are different types, so this won't compile:
/// // let _: SkuKey = bundle;
/// ```
#[macro_export]
macro_rules! define_key {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new key from any string-like value.
            #[must_use]
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.0
            }
        }
    };
}

define_key!(ProductId);

/// Identifier of a scheduled page task (e.g. a button label revert).
///
/// Allocated sequentially by the page controller so a task could be
/// cancelled by id later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Create a new task ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The ID that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl core::fmt::Display for TaskId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display_and_conversions() {
        let id = ProductId::from("tee-blue");
        assert_eq!(id.to_string(), "tee-blue");
        assert_eq!(id, ProductId::new(String::from("tee-blue")));
        assert_eq!(String::from(id), "tee-blue");
    }

    #[test]
    fn test_product_id_serializes_transparently() {
        let id = ProductId::new("a");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"a\""));
    }

    #[test]
    fn test_task_id_next() {
        let id = TaskId::default();
        assert_eq!(id.as_u64(), 0);
        assert_eq!(id.next().as_u64(), 1);
        assert_eq!(TaskId::new(u64::MAX).next().as_u64(), 0);
    }
}
