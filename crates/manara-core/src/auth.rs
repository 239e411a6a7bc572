//! Write authorization
//!
//! Every mutating request carries an `Authorization: Bearer <token>` header.
//! The service hands the header value to an `Authorizer` and refuses the
//! request unless it is accepted.
//!
//! `TokenAuthorizer` keeps only SHA-256 digests of the configured admin
//! tokens and compares digests in constant time. With no tokens configured
//! it refuses every write.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Why a request was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable bearer credential was presented
    #[error("Missing bearer credentials")]
    MissingCredentials,

    /// A credential was presented but not accepted
    #[error("Unauthorized")]
    Unauthorized,
}

/// The editor a request was authorized for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    /// Short digest prefix, safe to log
    pub fingerprint: String,
}

/// Decides whether a request may modify the site
pub trait Authorizer: Send + Sync {
    /// Check the raw `Authorization` header value, if any
    fn authorize(&self, header: Option<&str>) -> Result<AdminIdentity, AuthError>;
}

/// Accepts bearer tokens from a fixed list
pub struct TokenAuthorizer {
    digests: Vec<[u8; 32]>,
}

impl TokenAuthorizer {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let digests = tokens
            .into_iter()
            .filter(|t| !t.as_ref().trim().is_empty())
            .map(|t| digest(t.as_ref().trim()))
            .collect();
        Self { digests }
    }

    /// Number of accepted tokens
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

impl Authorizer for TokenAuthorizer {
    fn authorize(&self, header: Option<&str>) -> Result<AdminIdentity, AuthError> {
        let token = header
            .and_then(bearer_token)
            .ok_or(AuthError::MissingCredentials)?;

        let presented = digest(token);
        // Compare against every entry so timing doesn't reveal which matched
        let matched = self
            .digests
            .iter()
            .fold(false, |found, known| found | bool::from(known[..].ct_eq(&presented[..])));

        if matched {
            Ok(AdminIdentity {
                fingerprint: fingerprint(&presented),
            })
        } else {
            Err(AuthError::Unauthorized)
        }
    }
}

/// Extract the token from a `Bearer` header value
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

/// First 8 hex characters of a digest
fn fingerprint(digest: &[u8; 32]) -> String {
    hex::encode(&digest[..4])
}

/// Fingerprint of a token as it appears in logs
pub fn token_fingerprint(token: &str) -> String {
    fingerprint(&digest(token.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_configured_token() {
        let auth = TokenAuthorizer::new(["s3cret", "other"]);
        assert_eq!(auth.len(), 2);

        let identity = auth.authorize(Some("Bearer s3cret")).unwrap();
        assert_eq!(identity.fingerprint, token_fingerprint("s3cret"));
        assert_eq!(identity.fingerprint.len(), 8);

        assert!(auth.authorize(Some("bearer   other ")).is_ok());
    }

    #[test]
    fn test_rejects_wrong_token() {
        let auth = TokenAuthorizer::new(["s3cret"]);
        assert_eq!(
            auth.authorize(Some("Bearer guess")),
            Err(AuthError::Unauthorized)
        );
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let auth = TokenAuthorizer::new(["s3cret"]);
        assert_eq!(auth.authorize(None), Err(AuthError::MissingCredentials));
        assert_eq!(
            auth.authorize(Some("s3cret")),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            auth.authorize(Some("Basic s3cret")),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            auth.authorize(Some("Bearer ")),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_no_tokens_refuses_everything() {
        let auth = TokenAuthorizer::new(Vec::<String>::new());
        assert!(auth.is_empty());
        assert_eq!(auth.authorize(Some("Bearer ")), Err(AuthError::MissingCredentials));
        assert_eq!(
            auth.authorize(Some("Bearer anything")),
            Err(AuthError::Unauthorized)
        );
    }

    #[test]
    fn test_blank_tokens_are_ignored() {
        let auth = TokenAuthorizer::new(["", "   "]);
        assert!(auth.is_empty());
    }
}
