//! Core signature subsystem for the e-commerce card gateway.
//!
//! This crate implements the pieces of the gateway protocol with real
//! correctness stakes:
//!
//! - **MAC builder**: deterministic length-prefixed serialization of the
//!   signed field subset ([`build_mac`])
//! - **Signature engine**: RSA signing and verification with two hash
//!   profiles, the current SHA-256 scheme and the legacy MD5 scheme with its
//!   manual `DigestInfo` assembly ([`profile`])
//! - **Key material**: PEM parsing for the merchant private key and the bank
//!   public key ([`keys`])
//!
//! Everything here is synchronous, stateless per call, and free of I/O.
//! Transport, parameter assembly, and response schema handling live in the
//! surrounding client.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod mac;
pub mod profile;

pub use error::{Result, SignatureError};
pub use keys::{decode_private_key, decode_public_key};
pub use mac::{
    build_mac, FieldMap, MissingFieldPolicy, GATEWAY_MAC_FIELDS, MERCHANT_MAC_FIELDS,
};
pub use profile::{
    sign_hex, verify_hex, LegacyMd5Profile, Sha256Profile, SignatureAlgo, SignatureProfile,
};

// Key types are part of this crate's public API surface.
pub use rsa::{RsaPrivateKey, RsaPublicKey};
