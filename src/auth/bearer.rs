// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Boundary between transported credentials and the verifier
//!
//! Callers present tokens either in an `Authorization: Bearer <token>` header
//! or as a `token` query parameter. Whatever goes wrong, the caller only ever
//! learns that it is [`Unauthenticated`]; the specific rejection is logged so
//! that a client cannot tell a bad signature from an expired token.
//!
//! # Example
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use rust_token_auth::auth::{Authenticator, KeyMaterial, SigningAlgorithm, TokenVerifier, VerificationPolicy};
//! # let key = Arc::new(KeyMaterial::generate(2048, SigningAlgorithm::RS256).unwrap());
//! # let policy = VerificationPolicy::builder().allow(SigningAlgorithm::RS256).build().unwrap();
//! let authenticator = Authenticator::new(TokenVerifier::new(key, policy));
//!
//! match authenticator.authenticate_request(Some("Bearer eyJhbGciOi..."), None) {
//!     Ok(claims) => println!("hello {:?}", claims.sub),
//!     Err(_) => println!("401 Unauthorized"),
//! }
//! ```

use log::{debug, warn};
use thiserror::Error;

use super::claims::ClaimSet;
use super::verifier::TokenVerifier;

/// Name of the query parameter carrying a token
pub const TOKEN_QUERY_PARAMETER: &str = "token";

/// The only failure a rejected caller gets to see
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unauthenticated")]
pub struct Unauthenticated;

/// Extract the token from an `Authorization` header value
///
/// The scheme is matched case-insensitively. Returns `None` for any other
/// scheme or an empty credential.
///
/// ```
/// use rust_token_auth::auth::extract_bearer_token;
///
/// assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
/// assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
/// ```
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, credential) = header_value.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let credential = credential.trim();
    (!credential.is_empty()).then_some(credential)
}

/// Extract the `token` parameter from a URL query string (with or without `?`)
pub fn token_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == TOKEN_QUERY_PARAMETER)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Collapses every verification failure into [`Unauthenticated`]
#[derive(Debug, Clone)]
pub struct Authenticator {
    verifier: TokenVerifier,
}

impl Authenticator {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Verify a bare token
    pub fn authenticate(&self, token: &str) -> Result<ClaimSet, Unauthenticated> {
        self.verifier.verify(token).map_err(|e| {
            warn!(
                "Token rejected at {} stage [{}]: {}",
                e.stage(),
                e.kind(),
                e
            );
            Unauthenticated
        })
    }

    /// Authenticate a request from its `Authorization` header or query string
    ///
    /// The header wins when both are present. A header with another scheme is
    /// a failure, not a reason to look at the query.
    pub fn authenticate_request(
        &self,
        authorization: Option<&str>,
        query: Option<&str>,
    ) -> Result<ClaimSet, Unauthenticated> {
        if let Some(header) = authorization {
            let token = extract_bearer_token(header).ok_or_else(|| {
                warn!("Authorization header does not carry a bearer token");
                Unauthenticated
            })?;
            return self.authenticate(token);
        }

        match query.and_then(token_from_query) {
            Some(token) => self.authenticate(&token),
            None => {
                debug!("Request carries no token");
                Err(Unauthenticated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        assert_eq!(extract_bearer_token("bearer a.b.c"), Some("a.b.c"));
        assert_eq!(extract_bearer_token("BEARER   a.b.c  "), Some("a.b.c"));
    }

    #[test]
    fn test_scheme_may_be_followed_by_any_whitespace() {
        assert_eq!(extract_bearer_token("Bearer\ta.b.c"), Some("a.b.c"));
        assert_eq!(extract_bearer_token("Bearer \t a.b.c"), Some("a.b.c"));
        assert_eq!(extract_bearer_token("Bearer\t"), None);
    }

    #[test]
    fn test_non_bearer_headers_are_ignored() {
        assert_eq!(extract_bearer_token("Bearer"), None);
        assert_eq!(extract_bearer_token("Bearer   "), None);
        assert_eq!(extract_bearer_token("Token a.b.c"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn test_token_query_parameter() {
        assert_eq!(token_from_query("token=a.b.c"), Some("a.b.c".to_string()));
        assert_eq!(
            token_from_query("?page=2&token=a.b.c"),
            Some("a.b.c".to_string())
        );
        assert_eq!(token_from_query("page=2"), None);
        assert_eq!(token_from_query("token="), None);
    }

    #[test]
    fn test_unauthenticated_message_is_generic() {
        assert_eq!(Unauthenticated.to_string(), "unauthenticated");
    }
}
