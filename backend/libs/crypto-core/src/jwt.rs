/// RS256 JWT handling shared by Meetapp services
///
/// Tokens are issued by the session service and validated everywhere else.
/// Only RS256 is accepted; there is no symmetric fallback.
///
/// Keys live in process-wide `OnceCell`s. A service initializes them once at
/// startup, either with the full pair (issuer) or with the public key only
/// (validators):
///
/// ```rust,no_run
/// use crypto_core::jwt;
///
/// let public_key = jwt::load_validation_key().expect("JWT public key");
/// jwt::initialize_jwt_validation_only(&public_key).expect("valid RSA key");
/// ```
use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_EXPIRY_DAYS: i64 = 7;

const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

/// Environment variable holding the PEM-encoded public key.
pub const PUBLIC_KEY_ENV: &str = "JWT_PUBLIC_KEY_PEM";
/// Environment variable holding a path to the PEM-encoded public key.
pub const PUBLIC_KEY_FILE_ENV: &str = "JWT_PUBLIC_KEY_FILE";

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user id as a UUID string
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Initialize both keys. Used by services that issue tokens.
///
/// Fails if either PEM is not an RSA key or if keys were already set.
pub fn initialize_jwt_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA private key: {e}"))?;

    JWT_ENCODING_KEY
        .set(encoding_key)
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;

    initialize_jwt_validation_only(public_key_pem)
}

/// Initialize the public key only. Used by services that just validate.
pub fn initialize_jwt_validation_only(public_key_pem: &str) -> Result<()> {
    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

/// Read the validation key from `JWT_PUBLIC_KEY_PEM`, falling back to the
/// file named by `JWT_PUBLIC_KEY_FILE`.
///
/// Escaped newlines (`\n`) in the inline variant are expanded, since most
/// deployment tooling cannot carry multi-line env values.
pub fn load_validation_key() -> Result<String> {
    if let Ok(pem) = std::env::var(PUBLIC_KEY_ENV) {
        if !pem.trim().is_empty() {
            return Ok(pem.replace("\\n", "\n"));
        }
    }

    let path = std::env::var(PUBLIC_KEY_FILE_ENV)
        .map_err(|_| anyhow!("neither {PUBLIC_KEY_ENV} nor {PUBLIC_KEY_FILE_ENV} is set"))?;

    std::fs::read_to_string(&path).with_context(|| format!("Failed to read JWT public key from {path}"))
}

fn get_encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT signing key not initialized. Call initialize_jwt_keys() during startup.")
    })
}

fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() or initialize_jwt_validation_only() during startup.")
    })
}

/// Issue an access token for `user_id` with the default lifetime.
pub fn generate_access_token(user_id: Uuid) -> Result<String> {
    generate_access_token_with_ttl(user_id, Duration::days(ACCESS_TOKEN_EXPIRY_DAYS))
}

/// Issue an access token that expires `ttl` from now. A negative `ttl`
/// produces an already-expired token.
pub fn generate_access_token_with_ttl(user_id: Uuid, ttl: Duration) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    let encoding_key = get_encoding_key()?;
    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

/// Verify signature and expiry and decode the claims.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, decoding_key, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Validate `token` and return its subject as a user id.
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = include_str!("../tests/fixtures/test_private_key.pem");
    const TEST_PUBLIC_KEY: &str = include_str!("../tests/fixtures/test_public_key.pem");

    fn init_test_keys() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            initialize_jwt_keys(TEST_PRIVATE_KEY, TEST_PUBLIC_KEY)
                .expect("Failed to initialize test keys");
        });
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        init_test_keys();

        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id).expect("Failed to generate token");
        assert_eq!(token.matches('.').count(), 2);

        let data = validate_token(&token).expect("token should validate");
        assert_eq!(data.claims.sub, user_id.to_string());
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn test_validate_invalid_token() {
        init_test_keys();

        assert!(validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        init_test_keys();

        let token = generate_access_token_with_ttl(Uuid::new_v4(), Duration::hours(-2))
            .expect("Failed to generate token");
        assert!(validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_user_id() {
        init_test_keys();

        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id).expect("Failed to generate token");
        assert_eq!(get_user_id_from_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_second_initialization_fails() {
        init_test_keys();

        assert!(initialize_jwt_validation_only(TEST_PUBLIC_KEY).is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_load_validation_key_expands_escaped_newlines() {
        std::env::set_var(PUBLIC_KEY_ENV, "-----BEGIN PUBLIC KEY-----\\nabc\\n-----END PUBLIC KEY-----");
        let pem = load_validation_key().unwrap();
        assert_eq!(pem, "-----BEGIN PUBLIC KEY-----\nabc\n-----END PUBLIC KEY-----");
        std::env::remove_var(PUBLIC_KEY_ENV);
    }

    #[test]
    #[serial_test::serial]
    fn test_load_validation_key_missing() {
        std::env::remove_var(PUBLIC_KEY_ENV);
        std::env::remove_var(PUBLIC_KEY_FILE_ENV);
        assert!(load_validation_key().is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_load_validation_key_from_file() {
        std::env::remove_var(PUBLIC_KEY_ENV);
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test_public_key.pem");
        std::env::set_var(PUBLIC_KEY_FILE_ENV, path);

        let pem = load_validation_key().unwrap();
        assert!(pem.contains("BEGIN PUBLIC KEY"));

        std::env::remove_var(PUBLIC_KEY_FILE_ENV);
    }
}
