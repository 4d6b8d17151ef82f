//! Merchant-side client for the e-commerce card gateway.
//!
//! This crate wraps the [`ecomgate_core`] signature subsystem with the glue
//! a merchant integration needs:
//!
//! - [`GatewayClient`] — holds parsed key material and the algorithm
//!   selector; signs outbound requests and validates inbound responses
//! - [`protocol`] — `TRTYPE`/`ACTION` codes, order-ID normalization, nonce
//!   generation
//!
//! Transport, parameter-set assembly, and HTML form rendering stay with the
//! caller; the client takes and returns flat field maps.
//!
//! # Example
//!
//! ```no_run
//! use ecomgate_client::{GatewayClient, GatewayConfig};
//! use ecomgate_core::FieldMap;
//!
//! # fn example() -> Result<(), ecomgate_client::GatewayError> {
//! let config = GatewayConfig::new(
//!     "MERCHANT001",
//!     "TERM0001",
//!     std::fs::read_to_string("merchant_key.pem").unwrap(),
//!     std::fs::read_to_string("bank_public_key.pem").unwrap(),
//! );
//! let client = GatewayClient::new(config)?;
//!
//! let mut fields = FieldMap::new();
//! fields.insert("ORDER".into(), "000123".into());
//! fields.insert("NONCE".into(), ecomgate_client::protocol::generate_nonce());
//! fields.insert("TIMESTAMP".into(), "20230101120000".into());
//! fields.insert("TRTYPE".into(), ecomgate_client::protocol::trtype::AUTHORIZATION.into());
//! fields.insert("AMOUNT".into(), "100.00".into());
//!
//! let p_sign = client.sign_request(&fields)?;
//! fields.insert("P_SIGN".into(), p_sign);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
pub mod protocol;

pub use client::{GatewayClient, GatewayConfig};
pub use error::{GatewayError, Result};
