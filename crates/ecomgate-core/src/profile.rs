//! Signature profiles for the gateway `P_SIGN` field.
//!
//! Two interchangeable RSA profiles exist and must match the gateway's
//! provisioning:
//!
//! - [`Sha256Profile`] — standard RSASSA-PKCS1-v1_5 over SHA-256. The
//!   library primitive handles padding and `DigestInfo` encoding.
//! - [`LegacyMd5Profile`] — a historical gateway quirk predating standard
//!   digest-then-sign conventions: the MD5 `DigestInfo` structure is
//!   assembled by hand and pushed through a raw PKCS#1 v1.5 private-key
//!   operation. Verification is the inverse raw public-key operation,
//!   followed by prefix stripping and a constant-time digest comparison.
//!
//! Signatures cross the wire as uppercase hexadecimal strings; see
//! [`sign_hex`] and [`verify_hex`].

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, SignatureError};

/// ASN.1 `DigestInfo` header identifying an MD5 digest of length 16.
///
/// OID values from RFC 8017 Section 9.2 notes.
pub const MD5_DIGEST_INFO_PREFIX: [u8; 18] = [
    0x30, 0x20, 0x30, 0x0c, 0x06, 0x08, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x02, 0x05, 0x05,
    0x00, 0x04, 0x10,
];

/// ASN.1 `DigestInfo` header identifying a SHA-256 digest of length 32.
///
/// Kept for completeness of the prefix table. The SHA-256 profile signs and
/// verifies through the standard primitives and never strips it manually.
pub const SHA256_DIGEST_INFO_PREFIX: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];

/// Hash algorithm selector for `P_SIGN` generation and verification.
///
/// Configured per client; there is no negotiation with the gateway. Signer
/// and verifier must use the same selector for interop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgo {
    /// Historical MD5 scheme with manual `DigestInfo` assembly.
    Md5,
    /// Standard RSASSA-PKCS1-v1_5 over SHA-256.
    #[default]
    Sha256,
}

impl SignatureAlgo {
    /// Returns the strategy implementing this algorithm.
    #[must_use]
    pub fn profile(self) -> &'static dyn SignatureProfile {
        match self {
            Self::Md5 => &LegacyMd5Profile,
            Self::Sha256 => &Sha256Profile,
        }
    }

    /// Protocol-level name of the algorithm.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }
}

impl FromStr for SignatureAlgo {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md5" => Ok(Self::Md5),
            "sha256" => Ok(Self::Sha256),
            other => Err(SignatureError::UnknownAlgorithm(other.to_owned())),
        }
    }
}

impl fmt::Display for SignatureAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy interface over the two hash/padding schemes.
///
/// Implementations are stateless; concurrent use is safe.
pub trait SignatureProfile: Send + Sync {
    /// Sign `mac`, returning the raw signature bytes.
    ///
    /// # Errors
    ///
    /// [`SignatureError::SignatureGenerationFailed`] if the underlying
    /// primitive fails (e.g. an unsupported key size).
    fn sign(&self, mac: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>>;

    /// Check `signature` against a freshly recomputed `mac`.
    ///
    /// `Ok(false)` means the operation executed but the signature did not
    /// match; malformed signatures are a mismatch, not an error.
    ///
    /// # Errors
    ///
    /// Key-material problems only; never a mismatch.
    fn verify(&self, mac: &[u8], signature: &[u8], key: &RsaPublicKey) -> Result<bool>;
}

/// Standard RSASSA-PKCS1-v1_5 with SHA-256.
#[derive(Debug, Clone, Copy)]
pub struct Sha256Profile;

impl SignatureProfile for Sha256Profile {
    fn sign(&self, mac: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>> {
        let digest = Sha256::digest(mac);
        key.sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| SignatureError::SignatureGenerationFailed(e.to_string()))
    }

    fn verify(&self, mac: &[u8], signature: &[u8], key: &RsaPublicKey) -> Result<bool> {
        let digest = Sha256::digest(mac);
        Ok(key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            .is_ok())
    }
}

/// Historical MD5 scheme with manual `DigestInfo` assembly.
#[derive(Debug, Clone, Copy)]
pub struct LegacyMd5Profile;

impl SignatureProfile for LegacyMd5Profile {
    fn sign(&self, mac: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>> {
        let digest = Md5::digest(mac);
        let mut digest_info = Vec::with_capacity(MD5_DIGEST_INFO_PREFIX.len() + digest.len());
        digest_info.extend_from_slice(&MD5_DIGEST_INFO_PREFIX);
        digest_info.extend_from_slice(&digest);

        // Unprefixed EMSA-PKCS1-v1_5 over the hand-built DigestInfo: the raw
        // "encrypt with the private key" transcription the gateway expects,
        // not the digest-then-sign primitive.
        key.sign(Pkcs1v15Sign::new_unprefixed(), &digest_info)
            .map_err(|e| SignatureError::SignatureGenerationFailed(e.to_string()))
    }

    fn verify(&self, mac: &[u8], signature: &[u8], key: &RsaPublicKey) -> Result<bool> {
        let Some(digest_info) = recover_digest_info(signature, key) else {
            return Ok(false);
        };
        let Some(recovered) = digest_info.strip_prefix(&MD5_DIGEST_INFO_PREFIX[..]) else {
            return Ok(false);
        };

        let recovered_hex = hex::encode_upper(recovered);
        let expected_hex = hex::encode_upper(Md5::digest(mac));
        Ok(constant_time_eq(&recovered_hex, &expected_hex))
    }
}

/// Raw RSA public-key operation followed by EMSA-PKCS1-v1_5 unpadding.
///
/// The encoded message is `00 01 FF..FF 00 T` with at least eight bytes of
/// `FF` padding; returns `T` (the `DigestInfo`), or `None` on any structural
/// defect.
fn recover_digest_info(signature: &[u8], key: &RsaPublicKey) -> Option<Vec<u8>> {
    let k = key.size();
    if signature.len() != k {
        return None;
    }

    let s = BigUint::from_bytes_be(signature);
    if &s >= key.n() {
        return None;
    }

    // m = s^e mod n, left-padded back to the key length.
    let m = s.modpow(key.e(), key.n()).to_bytes_be();
    let mut em = vec![0u8; k - m.len()];
    em.extend_from_slice(&m);

    if em[0] != 0x00 || em[1] != 0x01 {
        return None;
    }
    let padding_len = em[2..].iter().take_while(|&&b| b == 0xff).count();
    if padding_len < 8 || em.get(2 + padding_len) != Some(&0x00) {
        return None;
    }

    Some(em[2 + padding_len + 1..].to_vec())
}

/// Constant-time string comparison.
///
/// Signature digests are compared without short-circuiting to avoid
/// timing side channels.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Sign `mac` with the selected profile, returning the uppercase hex
/// signature carried in the `P_SIGN` field.
///
/// # Errors
///
/// [`SignatureError::SignatureGenerationFailed`] if the signing primitive
/// fails.
pub fn sign_hex(mac: &[u8], key: &RsaPrivateKey, algo: SignatureAlgo) -> Result<String> {
    let signature = algo.profile().sign(mac, key)?;
    Ok(hex::encode_upper(signature))
}

/// Verify a hex-encoded signature against `mac` with the selected profile.
///
/// Hex decoding is case-insensitive; malformed hex or a wrong-size
/// signature is a mismatch (`Ok(false)`), never an error.
///
/// # Errors
///
/// Key-material problems only.
pub fn verify_hex(
    mac: &[u8],
    signature_hex: &str,
    key: &RsaPublicKey,
    algo: SignatureAlgo,
) -> Result<bool> {
    let Ok(signature) = hex::decode(signature_hex) else {
        return Ok(false);
    };
    algo.profile().verify(mac, &signature, key)
}
