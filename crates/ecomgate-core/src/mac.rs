//! Canonical MAC construction for gateway signatures.
//!
//! The gateway authenticates a message by signing a deterministic
//! serialization of a fixed field subset: for each field, the decimal length
//! of its value immediately followed by the value bytes, with no delimiters
//! (`{len1}{value1}{len2}{value2}...`). The field subset and its order are
//! fixed per direction and must match the gateway byte for byte.
//!
//! The MAC is derived state: it is recomputed from the field map whenever it
//! is needed and never persisted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignatureError};

/// Flat field-name to value mapping, as supplied by the transport layer.
///
/// Insertion order is irrelevant; the canonical order is imposed by the
/// field order list, not the map.
pub type FieldMap = HashMap<String, String>;

/// Fields signed in merchant-to-gateway requests, in MAC order.
pub const MERCHANT_MAC_FIELDS: [&str; 5] = ["ORDER", "NONCE", "TIMESTAMP", "TRTYPE", "AMOUNT"];

/// Fields signed in gateway-to-merchant responses, in MAC order.
pub const GATEWAY_MAC_FIELDS: [&str; 5] = ["ACTION", "RC", "RRN", "ORDER", "AMOUNT"];

/// Policy for fields that are absent or empty when a MAC is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Fail with [`SignatureError::MissingSignatureField`]. Always used for
    /// outbound signing; the default for inbound verification.
    #[default]
    Strict,
    /// Substitute the literal `-` so a MAC can still be computed over a
    /// sparse gateway response. Legacy-compatibility override; never applied
    /// implicitly.
    Placeholder,
}

/// Build the canonical MAC bytes for `fields` under `order`.
///
/// Fields not named in `order` are ignored. The value `"0"` is non-empty and
/// never triggers the strict failure.
///
/// # Errors
///
/// [`SignatureError::MissingSignatureField`] if a listed field is absent or
/// empty and `policy` is [`MissingFieldPolicy::Strict`].
pub fn build_mac(
    fields: &FieldMap,
    order: &[&str],
    policy: MissingFieldPolicy,
) -> Result<Vec<u8>> {
    let mut mac = Vec::new();

    for &name in order {
        let value = fields.get(name).map_or("", String::as_str);
        let value = if value.is_empty() {
            match policy {
                MissingFieldPolicy::Strict => {
                    return Err(SignatureError::MissingSignatureField {
                        field: name.to_owned(),
                    });
                }
                MissingFieldPolicy::Placeholder => "-",
            }
        } else {
            value
        };

        mac.extend_from_slice(value.len().to_string().as_bytes());
        mac.extend_from_slice(value.as_bytes());
    }

    Ok(mac)
}
