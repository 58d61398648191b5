/// Integration tests for crypto-core JWT functionality
///
/// Covers token issuance, validation, tampering and malformed input through
/// the public API only.
use crypto_core::jwt::{
    generate_access_token, generate_access_token_with_ttl, get_user_id_from_token,
    initialize_jwt_keys, validate_token,
};
use std::sync::Once;
use uuid::Uuid;

const TEST_PRIVATE_KEY: &str = include_str!("fixtures/test_private_key.pem");
const TEST_PUBLIC_KEY: &str = include_str!("fixtures/test_public_key.pem");

static INIT: Once = Once::new();

fn init_test_keys() {
    INIT.call_once(|| {
        initialize_jwt_keys(TEST_PRIVATE_KEY, TEST_PUBLIC_KEY)
            .expect("Failed to initialize test JWT keys");
    });
}

#[test]
fn test_token_lifecycle() {
    init_test_keys();

    let user_id = Uuid::new_v4();
    let token = generate_access_token(user_id).expect("Should generate access token");
    assert!(!token.is_empty(), "Token should not be empty");

    let data = validate_token(&token).expect("Fresh token should validate");
    assert_eq!(data.claims.sub, user_id.to_string());
    assert_eq!(get_user_id_from_token(&token).unwrap(), user_id);
}

#[test]
fn test_validate_tampered_token() {
    init_test_keys();

    let token = generate_access_token(Uuid::new_v4()).expect("Should generate access token");
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    parts[2] = parts[2].chars().rev().collect();
    let tampered = parts.join(".");

    assert!(validate_token(&tampered).is_err(), "Should reject tampered token");
}

#[test]
fn test_validate_malformed_tokens() {
    init_test_keys();

    for token in ["", "abc", "a.b", "a.b.c", "Bearer x.y.z"] {
        assert!(
            validate_token(token).is_err(),
            "Should reject malformed token {token:?}"
        );
    }
}

#[test]
fn test_expired_token_rejected() {
    init_test_keys();

    let token = generate_access_token_with_ttl(Uuid::new_v4(), chrono::Duration::days(-1))
        .expect("Should generate expired token");
    assert!(validate_token(&token).is_err());
}
