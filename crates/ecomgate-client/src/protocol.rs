//! Gateway protocol constants and small merchant-side helpers.

use rand::RngCore;

/// Field carrying the signature in requests and responses.
pub const P_SIGN_FIELD: &str = "P_SIGN";

/// Successful response code (`RC`).
pub const RC_SUCCESS: &str = "00";

/// Transaction type codes (`TRTYPE`).
pub mod trtype {
    /// Payment authorization.
    pub const AUTHORIZATION: &str = "0";
    /// Sales completion, sent when goods or services are delivered.
    pub const SALES_COMPLETION: &str = "21";
    /// Reversal of a previously authorized or completed transaction.
    pub const REVERSAL: &str = "24";
    /// Transaction status check.
    pub const STATUS_CHECK: &str = "90";
}

/// Response status codes (`ACTION`).
pub mod action {
    /// Transaction completed successfully.
    pub const SUCCESS: &str = "0";
    /// Duplicate transaction detected.
    pub const DUPLICATE: &str = "1";
    /// Transaction declined.
    pub const DECLINED: &str = "2";
    /// Transaction processing fault.
    pub const FAULT: &str = "3";
}

/// Zero-pad an order ID to the 6-character minimum the gateway requires.
#[must_use]
pub fn normalize_order_id(order_id: &str) -> String {
    format!("{order_id:0>6}")
}

/// Strip the zero padding applied by [`normalize_order_id`].
#[must_use]
pub fn denormalize_order_id(order_id: &str) -> String {
    order_id.trim_start_matches('0').to_owned()
}

/// Generate a merchant nonce: 32 unpredictable random bytes in hexadecimal.
#[must_use]
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
