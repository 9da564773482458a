//! Plugin Bridge error types (§7).

use weft_core::NodeTypeId;

/// Errors from the Plugin Bridge: the transport connection, the handshake,
/// or a plugin's own handler execution.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The transport could not connect to the plugin process.
    #[error("failed to connect to plugin '{type_id}': {message}")]
    Transport {
        /// The plugin-backed node type being connected to.
        type_id: NodeTypeId,
        /// The transport's own error message.
        message: String,
    },

    /// A call to the plugin did not return within its deadline.
    #[error("plugin '{0}' timed out")]
    Timeout(NodeTypeId),

    /// The plugin process exited or crashed mid-call.
    #[error("plugin '{0}' crashed")]
    PluginCrashed(NodeTypeId),

    /// The plugin's handshake failed (handshake cookie mismatch, incompatible
    /// protocol version, or similar).
    #[error("handshake with plugin '{type_id}' failed: {reason}")]
    HandshakeFailed {
        /// The plugin-backed node type.
        type_id: NodeTypeId,
        /// Why the handshake was rejected.
        reason: String,
    },

    /// The plugin returned a handler-level failure (§6 "Output (failure)").
    #[error(transparent)]
    Handler(#[from] weft_registry::HandlerError),
}

impl PluginError {
    /// Build a [`PluginError::Transport`] from any displayable message.
    pub fn transport(type_id: NodeTypeId, message: impl Into<String>) -> Self {
        Self::Transport {
            type_id,
            message: message.into(),
        }
    }
}
