//! Environment variable parsing helpers
//!
//! Two flavours: lenient (bad values fall back to the default) for tuning
//! knobs, and strict (bad values are an error) for settings where a typo
//! should stop the service from starting.

use std::str::FromStr;

/// Parse `key`, falling back to `default` when missing or unparseable.
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse `key`, falling back to `default` only when the variable is missing.
///
/// A present but unparseable value is reported as an error naming the key.
pub fn parse_env_strict<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Failed to parse {}='{}'", key, raw)),
        Err(_) => Ok(default),
    }
}
