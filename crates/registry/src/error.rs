//! Error types for node-type registration, resolution, and handler execution.

use weft_core::NodeTypeId;

/// Errors from the [`crate::NodeTypeRegistry`] (§4.1, feeding *InvalidWorkflow*, §7).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// `Register` was called with a type ID that is already bound.
    #[error("node type '{0}' is already registered")]
    AlreadyRegistered(NodeTypeId),

    /// `Resolve` was called with a type ID that has no binding.
    #[error("unknown node type '{0}'")]
    UnknownType(NodeTypeId),

    /// The factory rejected the node's static configuration.
    #[error("invalid config for node type '{type_id}': {message}")]
    InvalidConfig {
        /// The node type whose factory rejected the config.
        type_id: NodeTypeId,
        /// The factory's rejection reason.
        message: String,
    },
}

/// The outcome of a [`crate::Handler::execute`] call that did not succeed
/// (§6 "Output (failure)").
///
/// `Failed` carries the handler's own error message verbatim, stored as-is
/// per the contract; `Cancelled` is produced by [`crate::HandlerContext::check_cancelled`]
/// and by the Dispatch Pool when a deadline fires mid-execution.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler's own reported failure.
    #[error("{0}")]
    Failed(String),

    /// The handler observed (or was forced to observe) cancellation.
    #[error("execution was cancelled")]
    Cancelled,
}

impl HandlerError {
    /// Build a [`HandlerError::Failed`] from any displayable message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_registered_display() {
        let err = RegistryError::AlreadyRegistered(NodeTypeId::parse("logger").unwrap());
        assert_eq!(err.to_string(), "node type 'logger' is already registered");
    }

    #[test]
    fn invalid_config_display() {
        let err = RegistryError::InvalidConfig {
            type_id: NodeTypeId::parse("http_request").unwrap(),
            message: "missing url".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config for node type 'http_request': missing url"
        );
    }

    #[test]
    fn handler_error_failed_display() {
        let err = HandlerError::failed("boom");
        assert_eq!(err.to_string(), "boom");
    }
}
