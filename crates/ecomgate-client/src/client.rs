//! Merchant-side gateway client: request signing and response validation.

use serde::Deserialize;

use ecomgate_core::{
    build_mac, decode_private_key, decode_public_key, sign_hex, verify_hex, FieldMap,
    MissingFieldPolicy, RsaPrivateKey, RsaPublicKey, SignatureAlgo, GATEWAY_MAC_FIELDS,
    MERCHANT_MAC_FIELDS,
};

use crate::error::{GatewayError, Result};
use crate::protocol::{action, P_SIGN_FIELD};

/// Configuration for [`GatewayClient`].
///
/// Key material is PEM text; it is parsed once at client construction.
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// Merchant identifier assigned by the bank (`MERCHANT`).
    pub merchant_id: String,
    /// Terminal identifier assigned by the bank (`TERMINAL`).
    pub terminal_id: String,
    /// PEM-encoded merchant RSA private key.
    pub merchant_private_key: String,
    /// Passphrase for the merchant private key, if it is encrypted.
    #[serde(default)]
    pub merchant_private_key_passphrase: Option<String>,
    /// PEM-encoded bank RSA public key.
    pub bank_public_key: String,
    /// Hash/padding profile; must match the gateway's provisioning.
    #[serde(default)]
    pub signature_algo: SignatureAlgo,
    /// Missing-field policy applied when verifying inbound responses.
    /// Outbound signing is always strict.
    #[serde(default)]
    pub verify_policy: MissingFieldPolicy,
}

impl GatewayConfig {
    /// Build a configuration with the default algorithm (SHA-256) and
    /// strict inbound verification.
    #[must_use]
    pub fn new(
        merchant_id: impl Into<String>,
        terminal_id: impl Into<String>,
        merchant_private_key: impl Into<String>,
        bank_public_key: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            terminal_id: terminal_id.into(),
            merchant_private_key: merchant_private_key.into(),
            merchant_private_key_passphrase: None,
            bank_public_key: bank_public_key.into(),
            signature_algo: SignatureAlgo::default(),
            verify_policy: MissingFieldPolicy::default(),
        }
    }
}

/// Merchant-side client holding parsed key material and the algorithm
/// selection.
///
/// All state is immutable after construction; the client can be shared
/// across threads and used concurrently without locking.
#[derive(Debug)]
pub struct GatewayClient {
    merchant_id: String,
    terminal_id: String,
    private_key: RsaPrivateKey,
    bank_public_key: RsaPublicKey,
    algo: SignatureAlgo,
    verify_policy: MissingFieldPolicy,
}

impl GatewayClient {
    /// Parse the configured key material and build a client.
    ///
    /// # Errors
    ///
    /// [`ecomgate_core::SignatureError::InvalidKeyMaterial`] if either key
    /// fails to parse or the passphrase is wrong.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let private_key = decode_private_key(
            &config.merchant_private_key,
            config.merchant_private_key_passphrase.as_deref(),
        )?;
        let bank_public_key = decode_public_key(&config.bank_public_key)?;

        Ok(Self {
            merchant_id: config.merchant_id,
            terminal_id: config.terminal_id,
            private_key,
            bank_public_key,
            algo: config.signature_algo,
            verify_policy: config.verify_policy,
        })
    }

    /// Merchant identifier (`MERCHANT`).
    #[must_use]
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Terminal identifier (`TERMINAL`).
    #[must_use]
    pub fn terminal_id(&self) -> &str {
        &self.terminal_id
    }

    /// The configured signature algorithm.
    #[must_use]
    pub fn signature_algo(&self) -> SignatureAlgo {
        self.algo
    }

    /// Sign an outbound request, returning the `P_SIGN` hex value.
    ///
    /// The MAC covers `ORDER, NONCE, TIMESTAMP, TRTYPE, AMOUNT` under the
    /// strict policy: an absent or empty field is an error, so a request
    /// with accidentally missing mandatory data can never be signed.
    ///
    /// # Errors
    ///
    /// [`ecomgate_core::SignatureError::MissingSignatureField`] or
    /// [`ecomgate_core::SignatureError::SignatureGenerationFailed`].
    pub fn sign_request(&self, fields: &FieldMap) -> Result<String> {
        let mac = build_mac(fields, &MERCHANT_MAC_FIELDS, MissingFieldPolicy::Strict)?;
        let p_sign = sign_hex(&mac, &self.private_key, self.algo)?;

        tracing::debug!(algo = %self.algo, mac_len = mac.len(), "signed outbound request");
        Ok(p_sign)
    }

    /// Verify the `P_SIGN` of an inbound response against the bank key.
    ///
    /// Recomputes the MAC over `ACTION, RC, RRN, ORDER, AMOUNT` with the
    /// configured missing-field policy. A signature that does not match is
    /// `Ok(false)`, not an error.
    ///
    /// # Errors
    ///
    /// [`GatewayError::MissingResponseField`] if `P_SIGN` is absent, or a
    /// MAC policy failure under strict verification.
    pub fn verify_response(&self, fields: &FieldMap) -> Result<bool> {
        let p_sign = fields
            .get(P_SIGN_FIELD)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GatewayError::MissingResponseField {
                field: P_SIGN_FIELD.to_owned(),
            })?;

        let mac = build_mac(fields, &GATEWAY_MAC_FIELDS, self.verify_policy)?;
        let valid = verify_hex(&mac, p_sign, &self.bank_public_key, self.algo)?;

        if !valid {
            tracing::warn!(algo = %self.algo, "inbound response signature mismatch");
        }
        Ok(valid)
    }

    /// Validate a gateway response: dispatch on the `ACTION` status code and
    /// verify the signature of successful responses.
    ///
    /// Returns the signature verdict for `ACTION=0` responses.
    ///
    /// # Errors
    ///
    /// A typed [`GatewayError`] for duplicate, declined, faulted, or unknown
    /// statuses, plus everything [`Self::verify_response`] can return.
    pub fn validate_response(&self, fields: &FieldMap) -> Result<bool> {
        let status = fields
            .get("ACTION")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GatewayError::MissingResponseField {
                field: "ACTION".to_owned(),
            })?;

        match status.as_str() {
            action::SUCCESS => self.verify_response(fields),
            action::DUPLICATE => Err(GatewayError::DuplicateTransaction),
            action::DECLINED => Err(GatewayError::TransactionDeclined),
            action::FAULT => Err(GatewayError::ProcessingFault),
            other => Err(GatewayError::UnknownResponseStatus {
                action: other.to_owned(),
            }),
        }
    }
}
