//! Unique identifiers for Weft entities.
//!
//! [`WorkflowId`] and [`RunId`] are UUID-backed, generated by the engine
//! (`v4()`), `Copy`, and support `nil()`/`parse`/`Display`/`FromStr`/full
//! serde. [`NodeId`] is different on purpose: node IDs are author-chosen
//! strings scoped to one workflow definition (`"fetch_page"`, `"transform"`),
//! not engine-generated, so it wraps a validated `String` instead of a UUID.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Defines a `Copy`, UUID-backed identifier type with the usual constructors.
///
/// Equivalent in spirit to `domain_key::define_uuid!`, but implemented
/// directly against [`uuid::Uuid`] so this crate has no dependency whose
/// macro-generated API we cannot verify without a compiler in the loop.
macro_rules! define_uuid_id {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new random (v4) identifier.
            #[must_use]
            pub fn v4() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// The nil (all-zero) identifier.
            #[must_use]
            pub fn nil() -> Self {
                Self(uuid::Uuid::nil())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn new(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Parse from a string form.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                uuid::Uuid::parse_str(s).map(Self)
            }

            /// Build from raw bytes.
            #[must_use]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(uuid::Uuid::from_bytes(bytes))
            }

            /// The underlying UUID bytes.
            #[must_use]
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }

            /// The underlying UUID.
            #[must_use]
            pub fn get(&self) -> uuid::Uuid {
                self.0
            }

            /// Whether this is the nil identifier.
            #[must_use]
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            /// The domain name, for error messages and debugging.
            #[must_use]
            pub fn domain(&self) -> &'static str {
                stringify!($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = uuid::Error;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = uuid::Error;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::nil()
            }
        }
    };
}

define_uuid_id!(WorkflowId);
define_uuid_id!(RunId);

/// The author-chosen identifier of a node within one workflow definition.
///
/// Unique within its workflow, not globally. Used verbatim as the namespace
/// prefix for predecessor output keys (`{node_id}_{output_name}`), so it is
/// restricted to characters that are unambiguous in that position.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

/// A [`NodeId`] failed validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NodeIdError {
    /// The candidate ID was empty.
    #[error("node id must not be empty")]
    Empty,
}

impl NodeId {
    /// Build a `NodeId`, panicking if it is invalid.
    ///
    /// Intended for literal IDs known at call-site to be valid (tests,
    /// programmatically-built workflows); use [`NodeId::try_new`] when the
    /// value comes from untrusted input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self::try_new(id).expect("invalid node id")
    }

    /// Build a `NodeId`, validating the candidate string.
    pub fn try_new(id: impl Into<String>) -> Result<Self, NodeIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(NodeIdError::Empty);
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:?})", self.0)
    }
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn workflow_id_v4_creates_non_nil_uuid() {
        let id = WorkflowId::v4();
        assert!(!id.is_nil());
    }

    #[test]
    fn run_id_v4_creates_non_nil_uuid() {
        let id = RunId::v4();
        assert!(!id.is_nil());
    }

    #[test]
    fn id_nil_creates_zero_valued_uuid() {
        let id = RunId::nil();
        assert!(id.is_nil());
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn id_parse_valid_uuid_string_succeeds() {
        let id = RunId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert!(!id.is_nil());
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn id_parse_invalid_string_returns_error() {
        assert!(RunId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn id_copy_semantics_both_copies_usable() {
        let id1 = RunId::v4();
        let id2 = id1;
        assert_eq!(id1, id2);
    }

    #[test]
    fn id_from_uuid_roundtrips() {
        let raw = uuid::Uuid::new_v4();
        let typed = RunId::new(raw);
        assert_eq!(raw, typed.get());
    }

    #[test]
    fn id_from_bytes_roundtrips() {
        let bytes = [42u8; 16];
        let id = RunId::from_bytes(bytes);
        assert_eq!(id.as_bytes(), &bytes);
    }

    #[test]
    fn id_serde_json_roundtrip() {
        let id = WorkflowId::v4();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: WorkflowId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn different_id_types_are_incompatible() {
        fn accepts_workflow(_id: WorkflowId) {}
        fn accepts_run(_id: RunId) {}

        accepts_workflow(WorkflowId::v4());
        accepts_run(RunId::v4());
        // accepts_workflow(RunId::v4()); // would not compile
    }

    #[test]
    fn id_ordering_is_consistent() {
        let a = RunId::nil();
        let b = RunId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert!(a < b);
    }

    #[test]
    fn id_hash_is_consistent() {
        let id = RunId::v4();
        let mut set = HashSet::new();
        set.insert(id);
        assert!(set.contains(&id));
    }

    #[test]
    fn node_id_rejects_empty() {
        assert_eq!(NodeId::try_new(""), Err(NodeIdError::Empty));
    }

    #[test]
    fn node_id_accepts_arbitrary_non_empty_string() {
        let id = NodeId::new("fetch_page");
        assert_eq!(id.as_str(), "fetch_page");
        assert_eq!(id.to_string(), "fetch_page");
    }

    #[test]
    fn node_id_serde_json_roundtrip() {
        let id = NodeId::new("transform");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"transform\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
