/*
 * Responsibility
 * - Environment/config loading (listen address, gate policy, key material)
 * - Validation of required values (missing or bad config fails startup)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::{env, fmt};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

// No Debug derive: `signing_secret` is key material and must not end up in logs.
#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // HMAC-SHA256 key for verifying inbound bearer tokens
    pub signing_secret: Vec<u8>,
    // Path prefixes that skip authentication entirely
    pub bypass_prefixes: Vec<String>,
    // Subjects ("sub" claim) allowed through the gate
    pub allowed_subjects: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let secret = env::var("GATE_SIGNING_SECRET")
            .map_err(|_| ConfigError::Missing("GATE_SIGNING_SECRET"))?;

        let secret_is_base64 = env::var("GATE_SIGNING_SECRET_BASE64")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let signing_secret = decode_secret(&secret, secret_is_base64)?;

        let bypass_prefixes = parse_list(
            &env::var("GATE_BYPASS_PREFIXES").unwrap_or_else(|_| "/health".to_string()),
        );

        // Empty allowlist is accepted and denies every authenticated subject.
        let allowed_subjects = parse_list(&env::var("GATE_ALLOWED_SUBJECTS").unwrap_or_default());

        Ok(Config {
            addr,
            app_env,
            signing_secret,
            bypass_prefixes,
            allowed_subjects,
        })
    }
}

/// Decode the configured secret into raw key bytes.
///
/// The value is either used as-is (UTF-8 bytes) or base64-decoded first,
/// depending on `GATE_SIGNING_SECRET_BASE64`. HMAC-SHA256 wants at least
/// 256 bits of key material, so anything shorter than 32 bytes is refused.
fn decode_secret(raw: &str, is_base64: bool) -> Result<Vec<u8>, ConfigError> {
    let bytes = if is_base64 {
        STANDARD
            .decode(raw.trim())
            .map_err(|_| ConfigError::Invalid("GATE_SIGNING_SECRET"))?
    } else {
        raw.as_bytes().to_vec()
    };

    if bytes.len() < 32 {
        return Err(ConfigError::Invalid("GATE_SIGNING_SECRET"));
    }

    Ok(bytes)
}

// Comma-separated list: trimmed, empty entries dropped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
