use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Claims read from a verified token.
///
/// NOTE:
/// - `sub` is optional at the wire level; the gate rejects tokens without it.
/// - `exp` is handled by `jsonwebtoken` during validation and is not carried
///   here.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
}

/// HS256 token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let decoding_key = DecodingKey::from_secret(secret);

        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is validated when the claim is present but is not required:
        // the issuer this gate fronts also mints subject-only tokens.
        validation.required_spec_claims.remove("exp");
        // Standard expiry semantics, no clock skew allowance.
        validation.leeway = 0;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify signature + registered claims, then decode the payload.
    ///
    /// `jsonwebtoken::Validation` checks:
    /// - the HS256 signature against our key
    /// - structural validity (three-part token, base64url-decodable)
    /// - `exp`, when the claim is present
    pub fn verify(&self, token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}
