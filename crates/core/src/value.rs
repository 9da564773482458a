//! The shared JSON-compatible value map used at every handler boundary.

use serde_json::Value;

/// An opaque key→value map of JSON-compatible values.
///
/// Used for node static configuration, handler inputs and outputs, and
/// run-level parameters (§3, §6 "Handler contract"). The engine never
/// inspects the shape of these values beyond merging and, for string values,
/// placeholder substitution (§4.6) — handlers own their own config schema.
pub type PortMap = serde_json::Map<String, Value>;
