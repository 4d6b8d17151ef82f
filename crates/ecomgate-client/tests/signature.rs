//! End-to-end signing and verification tests.
//!
//! The tests act as both merchant and bank with one freshly generated key
//! pair: requests are signed with the merchant key, and responses are signed
//! with the same key standing in for the bank.

use std::sync::OnceLock;

use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;

use ecomgate_client::protocol::{action, generate_nonce, trtype};
use ecomgate_client::{GatewayClient, GatewayConfig, GatewayError};
use ecomgate_core::{
    build_mac, sign_hex, FieldMap, MissingFieldPolicy, SignatureAlgo, SignatureError,
    GATEWAY_MAC_FIELDS,
};

struct TestKeys {
    private_key: RsaPrivateKey,
    private_pem: String,
    public_pem: String,
}

fn test_keys() -> &'static TestKeys {
    static KEYS: OnceLock<TestKeys> = OnceLock::new();
    KEYS.get_or_init(|| {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("RSA key generation");
        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .expect("PKCS#8 encoding")
            .to_string();
        let public_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .expect("SPKI encoding");
        TestKeys {
            private_key,
            private_pem,
            public_pem,
        }
    })
}

fn test_client(algo: SignatureAlgo, verify_policy: MissingFieldPolicy) -> GatewayClient {
    let keys = test_keys();
    let mut config = GatewayConfig::new(
        "MERCHANT001",
        "TERM0001",
        keys.private_pem.clone(),
        keys.public_pem.clone(),
    );
    config.signature_algo = algo;
    config.verify_policy = verify_policy;
    GatewayClient::new(config).expect("client construction")
}

fn request_fields() -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("ORDER".into(), "000123".into());
    fields.insert("NONCE".into(), generate_nonce());
    fields.insert("TIMESTAMP".into(), "20230101120000".into());
    fields.insert("TRTYPE".into(), trtype::AUTHORIZATION.into());
    fields.insert("AMOUNT".into(), "100.00".into());
    fields
}

fn response_fields() -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("ACTION".into(), action::SUCCESS.into());
    fields.insert("RC".into(), "00".into());
    fields.insert("RRN".into(), "123456789012".into());
    fields.insert("ORDER".into(), "000123".into());
    fields.insert("AMOUNT".into(), "100.00".into());
    fields
}

/// Sign `fields` the way the bank does, inserting `P_SIGN`.
fn bank_sign_response(fields: &mut FieldMap, algo: SignatureAlgo, policy: MissingFieldPolicy) {
    let mac = build_mac(fields, &GATEWAY_MAC_FIELDS, policy).expect("response MAC");
    let p_sign = sign_hex(&mac, &test_keys().private_key, algo).expect("bank signature");
    fields.insert("P_SIGN".into(), p_sign);
}

#[test]
fn signed_request_verifies_for_both_profiles() {
    for algo in [SignatureAlgo::Md5, SignatureAlgo::Sha256] {
        let client = test_client(algo, MissingFieldPolicy::Strict);
        let fields = request_fields();

        let p_sign = client.sign_request(&fields).unwrap();

        let mac = build_mac(
            &fields,
            &ecomgate_core::MERCHANT_MAC_FIELDS,
            MissingFieldPolicy::Strict,
        )
        .unwrap();
        let public_key = test_keys().private_key.to_public_key();
        assert!(
            ecomgate_core::verify_hex(&mac, &p_sign, &public_key, algo).unwrap(),
            "{algo} request signature must verify"
        );
    }
}

#[test]
fn bank_signed_response_validates_for_both_profiles() {
    for algo in [SignatureAlgo::Md5, SignatureAlgo::Sha256] {
        let client = test_client(algo, MissingFieldPolicy::Strict);
        let mut fields = response_fields();
        bank_sign_response(&mut fields, algo, MissingFieldPolicy::Strict);

        assert!(
            client.validate_response(&fields).unwrap(),
            "{algo} response signature must validate"
        );
    }
}

#[test]
fn tampered_response_field_fails_verification() {
    for algo in [SignatureAlgo::Md5, SignatureAlgo::Sha256] {
        let client = test_client(algo, MissingFieldPolicy::Strict);
        let mut fields = response_fields();
        bank_sign_response(&mut fields, algo, MissingFieldPolicy::Strict);

        fields.insert("AMOUNT".into(), "100.01".into());
        assert!(!client.verify_response(&fields).unwrap());
    }
}

#[test]
fn tampered_p_sign_fails_verification() {
    let client = test_client(SignatureAlgo::Sha256, MissingFieldPolicy::Strict);
    let mut fields = response_fields();
    bank_sign_response(&mut fields, SignatureAlgo::Sha256, MissingFieldPolicy::Strict);

    let p_sign = fields.get("P_SIGN").unwrap().clone();
    let mut tampered = p_sign.into_bytes();
    tampered[0] = if tampered[0] == b'0' { b'1' } else { b'0' };
    fields.insert("P_SIGN".into(), String::from_utf8(tampered).unwrap());

    assert!(!client.verify_response(&fields).unwrap());
}

#[test]
fn algorithm_mismatch_fails_verification() {
    let md5_client = test_client(SignatureAlgo::Md5, MissingFieldPolicy::Strict);
    let sha256_client = test_client(SignatureAlgo::Sha256, MissingFieldPolicy::Strict);

    let mut md5_signed = response_fields();
    bank_sign_response(&mut md5_signed, SignatureAlgo::Md5, MissingFieldPolicy::Strict);
    let mut sha256_signed = response_fields();
    bank_sign_response(&mut sha256_signed, SignatureAlgo::Sha256, MissingFieldPolicy::Strict);

    assert!(!sha256_client.verify_response(&md5_signed).unwrap());
    assert!(!md5_client.verify_response(&sha256_signed).unwrap());
}

#[test]
fn missing_p_sign_is_an_error() {
    let client = test_client(SignatureAlgo::Sha256, MissingFieldPolicy::Strict);
    let fields = response_fields();

    let err = client.verify_response(&fields).unwrap_err();
    assert!(matches!(
        err,
        GatewayError::MissingResponseField { field } if field == "P_SIGN"
    ));
}

#[test]
fn signing_without_nonce_names_the_field() {
    let client = test_client(SignatureAlgo::Sha256, MissingFieldPolicy::Strict);
    let mut fields = request_fields();
    fields.remove("NONCE");

    let err = client.sign_request(&fields).unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Signature(SignatureError::MissingSignatureField { field }) if field == "NONCE"
    ));
}

#[test]
fn placeholder_policy_accepts_sparse_response() {
    let client = test_client(SignatureAlgo::Sha256, MissingFieldPolicy::Placeholder);
    let mut fields = response_fields();
    fields.remove("RRN");
    bank_sign_response(
        &mut fields,
        SignatureAlgo::Sha256,
        MissingFieldPolicy::Placeholder,
    );

    assert!(client.verify_response(&fields).unwrap());
}

#[test]
fn strict_policy_rejects_sparse_response() {
    let client = test_client(SignatureAlgo::Sha256, MissingFieldPolicy::Strict);
    let mut fields = response_fields();
    fields.remove("RRN");
    fields.insert("P_SIGN".into(), "AB".repeat(256));

    let err = client.verify_response(&fields).unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Signature(SignatureError::MissingSignatureField { field }) if field == "RRN"
    ));
}

#[test]
fn response_status_dispatch() {
    let client = test_client(SignatureAlgo::Sha256, MissingFieldPolicy::Strict);

    let status_cases = [
        (action::DUPLICATE, "duplicate"),
        (action::DECLINED, "declined"),
        (action::FAULT, "fault"),
    ];
    for (status, label) in status_cases {
        let mut fields = response_fields();
        fields.insert("ACTION".into(), status.into());
        let err = client.validate_response(&fields).unwrap_err();
        match (status, &err) {
            ("1", GatewayError::DuplicateTransaction)
            | ("2", GatewayError::TransactionDeclined)
            | ("3", GatewayError::ProcessingFault) => {}
            _ => panic!("wrong error for {label} status: {err}"),
        }
    }

    let mut fields = response_fields();
    fields.insert("ACTION".into(), "9".into());
    assert!(matches!(
        client.validate_response(&fields).unwrap_err(),
        GatewayError::UnknownResponseStatus { action } if action == "9"
    ));

    let mut fields = response_fields();
    fields.remove("ACTION");
    assert!(matches!(
        client.validate_response(&fields).unwrap_err(),
        GatewayError::MissingResponseField { field } if field == "ACTION"
    ));
}

#[test]
fn invalid_key_material_fails_at_construction() {
    let config = GatewayConfig::new(
        "MERCHANT001",
        "TERM0001",
        "not a private key",
        test_keys().public_pem.clone(),
    );
    let err = GatewayClient::new(config).unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Signature(SignatureError::InvalidKeyMaterial(_))
    ));

    let config = GatewayConfig::new(
        "MERCHANT001",
        "TERM0001",
        test_keys().private_pem.clone(),
        "not a public key",
    );
    let err = GatewayClient::new(config).unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Signature(SignatureError::InvalidKeyMaterial(_))
    ));
}
