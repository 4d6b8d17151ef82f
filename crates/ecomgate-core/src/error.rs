//! Error types for the signature subsystem.

/// Result type for signature operations.
pub type Result<T> = std::result::Result<T, SignatureError>;

/// Errors that can occur while building MACs or producing and verifying
/// signatures.
///
/// A signature that executes but does not match is *not* an error; the
/// verification operations return `Ok(false)` for that case.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// A field required for MAC construction is absent or empty under the
    /// strict policy.
    #[error("missing signature field: {field}")]
    MissingSignatureField {
        /// Protocol name of the missing field.
        field: String,
    },

    /// Private or public key failed to parse, or the passphrase is wrong.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// The signing primitive failed despite valid key material.
    #[error("signature generation failed: {0}")]
    SignatureGenerationFailed(String),

    /// Algorithm selector outside the supported set.
    #[error("unknown signature algorithm: {0}")]
    UnknownAlgorithm(String),
}
