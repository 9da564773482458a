//! Normalized string keys naming a registered node type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The stable string ID of a node type, e.g. `http_request` (§3 NodeType).
///
/// Parsing normalizes case and whitespace so that `"HTTP Request"` and
/// `"http_request"` resolve to the same key — this matches how the registry
/// is expected to be looked up from configuration or tooling input, while the
/// canonical form (what gets stored and compared) is always the normalized
/// one.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTypeId(String);

/// A [`NodeTypeId`] failed to parse.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NodeTypeKeyError {
    /// The candidate string normalized to nothing.
    #[error("node type id must not be empty")]
    Empty,
}

impl NodeTypeId {
    /// Parse and normalize a candidate string.
    pub fn parse(s: &str) -> Result<Self, NodeTypeKeyError> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| {
                if c.is_whitespace() || c == '-' {
                    '_'
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect();
        if normalized.is_empty() {
            return Err(NodeTypeKeyError::Empty);
        }
        Ok(Self(normalized))
    }

    /// The normalized key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NodeTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeTypeId({:?})", self.0)
    }
}

impl FromStr for NodeTypeId {
    type Err = NodeTypeKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for NodeTypeId {
    type Error = NodeTypeKeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}
