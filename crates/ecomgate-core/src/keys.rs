//! RSA key material parsing.
//!
//! Keys arrive as PEM text supplied by the merchant's configuration: the
//! merchant private key (optionally passphrase-protected) and the bank
//! public key. Parsed keys are immutable; a long-lived client may hold them
//! for its whole lifetime and share them freely across threads.

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::{Result, SignatureError};

/// Parse a PEM-encoded RSA private key.
///
/// Accepts PKCS#8 (`BEGIN PRIVATE KEY`) and PKCS#1 (`BEGIN RSA PRIVATE
/// KEY`). When `passphrase` is given, the key must be an encrypted PKCS#8
/// document (`BEGIN ENCRYPTED PRIVATE KEY`).
///
/// # Errors
///
/// [`SignatureError::InvalidKeyMaterial`] if the PEM does not parse or the
/// passphrase is wrong.
pub fn decode_private_key(pem: &str, passphrase: Option<&str>) -> Result<RsaPrivateKey> {
    if let Some(passphrase) = passphrase {
        return RsaPrivateKey::from_pkcs8_encrypted_pem(pem, passphrase).map_err(|e| {
            SignatureError::InvalidKeyMaterial(format!(
                "private key (encrypted PKCS#8): {e}"
            ))
        });
    }

    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| SignatureError::InvalidKeyMaterial(format!("private key: {e}")))
}

/// Parse a PEM-encoded RSA public key.
///
/// Accepts SPKI (`BEGIN PUBLIC KEY`) and PKCS#1 (`BEGIN RSA PUBLIC KEY`).
///
/// # Errors
///
/// [`SignatureError::InvalidKeyMaterial`] if the PEM does not parse.
pub fn decode_public_key(pem: &str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| SignatureError::InvalidKeyMaterial(format!("public key: {e}")))
}
