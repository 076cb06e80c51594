//! Request gating: path bypass, bearer-token verification, subject allowlist.
//!
//! Responsibility:
//! - Decide, per request, whether it may reach the protected handlers.
//! - Bypass check runs first and is exclusive: a path matching a configured
//!   prefix skips authentication entirely, valid token or not.
//! - Everything else: extract the bearer token, verify it (HS256), and
//!   require the token subject to be on the allowlist.
//!
//! The decision is binary. Every failure collapses into the same
//! [`Decision::Reject`], so a caller cannot tell a missing token from a bad
//! signature from a disallowed subject.

mod token;

pub use token::{TokenClaims, TokenVerifier};

use std::collections::HashSet;

use thiserror::Error;

/// Outcome of evaluating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request continues to the protected handler unchanged.
    Proceed,
    /// Request is short-circuited with 401 and an empty body.
    Reject,
}

/// Why authentication/authorization failed.
///
/// Internal taxonomy only: [`RequestGate::evaluate`] folds every variant into
/// one uniform [`Decision::Reject`] and the distinction never reaches the
/// HTTP caller.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("missing Authorization header")]
    MissingAuthHeader,

    #[error("Authorization header is not a Bearer credential")]
    MalformedAuthScheme,

    #[error("token is structurally invalid")]
    TokenMalformed(#[source] jsonwebtoken::errors::Error),

    #[error("token signature does not verify")]
    SignatureInvalid,

    #[error("token is expired")]
    TokenExpired,

    #[error("token has no subject claim")]
    SubjectMissing,

    #[error("subject is not on the allowlist")]
    SubjectNotAllowed,
}

impl From<jsonwebtoken::errors::Error> for GateError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => GateError::SignatureInvalid,
            ErrorKind::ExpiredSignature => GateError::TokenExpired,
            _ => GateError::TokenMalformed(e),
        }
    }
}

/// Construction-time configuration for [`RequestGate`].
///
/// Injected explicitly so independently configured gates can coexist
/// (and be constructed directly in tests). No process-wide statics.
#[derive(Clone)]
pub struct GateConfig {
    /// Symmetric HMAC-SHA256 key the inbound tokens are signed with.
    pub signing_key: Vec<u8>,
    /// Ordered list of literal path prefixes exempt from authentication.
    pub bypass_prefixes: Vec<String>,
    /// Complete authorization policy: subjects allowed through the gate.
    pub allowed_subjects: Vec<String>,
}

/// Evaluates one inbound request and produces an allow/deny decision.
///
/// Holds only read-only configuration fixed at construction, so a single
/// instance is safe to share across concurrent requests without locking.
pub struct RequestGate {
    verifier: TokenVerifier,
    bypass_prefixes: Vec<String>,
    allowed_subjects: HashSet<String>,
}

impl RequestGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            verifier: TokenVerifier::new(&config.signing_key),
            bypass_prefixes: config.bypass_prefixes,
            allowed_subjects: config.allowed_subjects.into_iter().collect(),
        }
    }

    /// Produce the [`Decision`] for one request.
    ///
    /// `path` is the raw request path; `authorization` is the Authorization
    /// header value, if the request carried one. Side-effect-free and
    /// synchronous: no I/O, no logging, no request mutation.
    pub fn evaluate(&self, path: &str, authorization: Option<&str>) -> Decision {
        if self.is_bypassed(path) {
            return Decision::Proceed;
        }

        // Fail closed: every error kind maps to the same rejection.
        match self.authorize(authorization) {
            Ok(_subject) => Decision::Proceed,
            Err(_) => Decision::Reject,
        }
    }

    /// Literal, case-sensitive prefix test against the raw path.
    ///
    /// No percent-decoding, no trailing-slash handling: `/actuator` matches
    /// `/actuator/health` and also `/actuator-extra`. Hardening the compare
    /// would change the documented contract, so it stays raw.
    fn is_bypassed(&self, path: &str) -> bool {
        self.bypass_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix))
    }

    /// Header scheme check, token verification, allowlist membership.
    ///
    /// The token is isolated by stripping the fixed `"Bearer "` prefix, so a
    /// token that happens to contain that substring passes through intact.
    fn authorize(&self, authorization: Option<&str>) -> Result<String, GateError> {
        let auth = authorization.ok_or(GateError::MissingAuthHeader)?;
        let token = auth
            .strip_prefix("Bearer ")
            .ok_or(GateError::MalformedAuthScheme)?;

        let claims = self.verifier.verify(token)?;

        let subject = claims.sub.ok_or(GateError::SubjectMissing)?;
        if !self.allowed_subjects.contains(&subject) {
            return Err(GateError::SubjectNotAllowed);
        }

        Ok(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"w9pZ4m7Q1z2G5BzYFzL3KQ5XrC9a1N8ZrKJtYv9WlqE=";

    fn gate() -> RequestGate {
        RequestGate::new(GateConfig {
            signing_key: SECRET.to_vec(),
            bypass_prefixes: vec!["/actuator".to_string(), "/h2-console".to_string()],
            allowed_subjects: vec!["admin".to_string(), "bankuser".to_string()],
        })
    }

    fn sign_for(subject: &str, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "sub": subject }),
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[test]
    fn bypassed_path_proceeds_without_header() {
        assert_eq!(gate().evaluate("/actuator/health", None), Decision::Proceed);
    }

    #[test]
    fn bypassed_path_ignores_garbage_header() {
        // Bypass is exclusive: no token inspection happens at all.
        assert_eq!(
            gate().evaluate("/actuator/health", Some("Bearer not-a-token")),
            Decision::Proceed
        );
        assert_eq!(
            gate().evaluate("/h2-console", Some("garbage")),
            Decision::Proceed
        );
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(gate().evaluate("/api/data", None), Decision::Reject);
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        assert_eq!(
            gate().evaluate("/api/data", Some("Basic dXNlcjpwdw==")),
            Decision::Reject
        );
        // Scheme match is exact, including case.
        let token = sign_for("admin", SECRET);
        assert_eq!(
            gate().evaluate("/api/data", Some(&format!("bearer {token}"))),
            Decision::Reject
        );
    }

    #[test]
    fn valid_token_for_allowed_subject_proceeds() {
        let token = sign_for("admin", SECRET);
        assert_eq!(
            gate().evaluate("/api/data", Some(&bearer(&token))),
            Decision::Proceed
        );
    }

    #[test]
    fn subject_outside_allowlist_is_rejected() {
        let token = sign_for("guest", SECRET);
        assert_eq!(
            gate().evaluate("/api/data", Some(&bearer(&token))),
            Decision::Reject
        );
    }

    #[test]
    fn subject_match_is_case_sensitive() {
        let token = sign_for("Admin", SECRET);
        assert_eq!(
            gate().evaluate("/api/data", Some(&bearer(&token))),
            Decision::Reject
        );
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let exp = Utc::now().timestamp() + 3600;
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "exp": exp }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(
            gate().evaluate("/api/data", Some(&bearer(&token))),
            Decision::Reject
        );
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        // Allowed subject, wrong key: still rejected.
        let token = sign_for("admin", b"another-secret-another-secret-32");
        assert_eq!(
            gate().evaluate("/api/data", Some(&bearer(&token))),
            Decision::Reject
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let exp = Utc::now().timestamp() - 3600;
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "sub": "admin", "exp": exp }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(
            gate().evaluate("/api/data", Some(&bearer(&token))),
            Decision::Reject
        );
    }

    #[test]
    fn unexpired_token_proceeds() {
        let exp = Utc::now().timestamp() + 3600;
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "sub": "bankuser", "exp": exp }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(
            gate().evaluate("/api/data", Some(&bearer(&token))),
            Decision::Proceed
        );
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert_eq!(
            gate().evaluate("/api/data", Some("Bearer invalid-token")),
            Decision::Reject
        );
    }

    #[test]
    fn prefix_match_is_literal_and_case_sensitive() {
        assert_eq!(gate().evaluate("/Actuator/health", None), Decision::Reject);
        // Raw prefix semantics: no segment boundary is enforced.
        assert_eq!(gate().evaluate("/actuator-extra", None), Decision::Proceed);
        // No percent-decoding before the compare.
        assert_eq!(gate().evaluate("/%61ctuator/health", None), Decision::Reject);
    }

    #[test]
    fn empty_allowlist_denies_every_subject() {
        let gate = RequestGate::new(GateConfig {
            signing_key: SECRET.to_vec(),
            bypass_prefixes: vec![],
            allowed_subjects: vec![],
        });
        let token = sign_for("admin", SECRET);
        assert_eq!(
            gate.evaluate("/api/data", Some(&bearer(&token))),
            Decision::Reject
        );
    }

    #[test]
    fn evaluation_is_idempotent() {
        let gate = gate();
        let token = sign_for("admin", SECRET);
        let auth = bearer(&token);

        let first = gate.evaluate("/api/data", Some(&auth));
        let second = gate.evaluate("/api/data", Some(&auth));
        assert_eq!(first, second);
        assert_eq!(first, Decision::Proceed);

        let first = gate.evaluate("/api/data", None);
        let second = gate.evaluate("/api/data", None);
        assert_eq!(first, second);
        assert_eq!(first, Decision::Reject);
    }

    #[test]
    fn verification_errors_keep_their_kind_internally() {
        let gate = gate();

        assert!(matches!(
            gate.authorize(None),
            Err(GateError::MissingAuthHeader)
        ));
        assert!(matches!(
            gate.authorize(Some("Token abc")),
            Err(GateError::MalformedAuthScheme)
        ));
        assert!(matches!(
            gate.authorize(Some("Bearer not-a-token")),
            Err(GateError::TokenMalformed(_))
        ));

        let wrong_key = sign_for("admin", b"another-secret-another-secret-32");
        assert!(matches!(
            gate.authorize(Some(&bearer(&wrong_key))),
            Err(GateError::SignatureInvalid)
        ));

        let guest = sign_for("guest", SECRET);
        assert!(matches!(
            gate.authorize(Some(&bearer(&guest))),
            Err(GateError::SubjectNotAllowed)
        ));
    }
}
