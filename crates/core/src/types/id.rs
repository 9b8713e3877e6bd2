//! Newtype IDs for type-safe entity references.
//!
//! The remote API treats every identifier as opaque. Most arrive as JSON
//! strings, but transfer and certificate rows come straight from numeric
//! columns, so deserialization accepts either and normalizes to a string.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain JSON string
/// - `Deserialize` from a JSON string or number
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Default`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use pustakalaya_core::define_id;
/// define_id!(ShelfId);
/// define_id!(RackId);
///
/// let shelf_id = ShelfId::new("7");
/// let rack_id = RackId::new("7");
///
/// // These are different types, so this won't compile:
/// // let _: ShelfId = rack_id;
/// assert_eq!(shelf_id.as_str(), rack_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::lenient::string_or_number(deserializer).map(Self)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(BookId);
define_id!(DonorId);
define_id!(LibrarianId);
define_id!(TransferId);
define_id!(CertificateId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_json_string() {
        let id: BookId = serde_json::from_str(r#""b-17""#).unwrap();
        assert_eq!(id.as_str(), "b-17");
    }

    #[test]
    fn test_id_from_json_number() {
        let id: TransferId = serde_json::from_str("42").unwrap();
        assert_eq!(id, TransferId::new("42"));
    }

    #[test]
    fn test_id_serializes_as_string() {
        let json = serde_json::to_string(&DonorId::new("9")).unwrap();
        assert_eq!(json, r#""9""#);
    }

    #[test]
    fn test_id_rejects_objects() {
        assert!(serde_json::from_str::<UserId>(r#"{"id": 1}"#).is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(LibrarianId::from("L1").to_string(), "L1");
    }
}
