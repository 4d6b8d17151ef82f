//! Client error types.

use ecomgate_core::SignatureError;

/// Result type for gateway client operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur when signing requests or validating responses.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// MAC construction or signature engine failure.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The response lacks a field the merchant side requires.
    #[error("missing response field: {field}")]
    MissingResponseField {
        /// Protocol name of the missing field.
        field: String,
    },

    /// Gateway reported a duplicate transaction (`ACTION=1`).
    #[error("gateway response: duplicate transaction detected")]
    DuplicateTransaction,

    /// Gateway declined the transaction (`ACTION=2`).
    #[error("gateway response: transaction declined")]
    TransactionDeclined,

    /// Gateway reported a transaction processing fault (`ACTION=3`).
    #[error("gateway response: transaction processing fault")]
    ProcessingFault,

    /// Response `ACTION` code outside the documented set.
    #[error("unknown gateway response status: {action}")]
    UnknownResponseStatus {
        /// The unrecognized `ACTION` value.
        action: String,
    },
}
