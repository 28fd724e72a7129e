// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Error taxonomy for the token lifecycle
//!
//! Every failure of the lifecycle engine is one of the closed enums below.
//! Callers discriminate on variants, never on message strings.
//!
//! | Concern | Type |
//! |---------|------|
//! | Producing or loading key material | [`KeyError`] |
//! | Building a claim set | [`ClaimsError`] |
//! | Issuing a token | [`SigningError`] |
//! | Building a verification policy | [`PolicyError`] |
//! | Rejecting a presented token | [`VerificationError`] |

use std::fmt;

use thiserror::Error;

use super::algorithm::SigningAlgorithm;

/// Key material could not be produced or loaded.
///
/// Both variants are fatal to process startup.
#[derive(Error, Debug)]
pub enum KeyError {
    /// The key-generation primitive rejected the parameters
    #[error("Key generation failed: {reason}")]
    Generation { reason: String },

    /// The encoded key is malformed, unsupported, or does not fit the algorithm
    #[error("Key import failed: {reason}")]
    Import { reason: String },
}

impl KeyError {
    pub(crate) fn generation(reason: impl Into<String>) -> Self {
        KeyError::Generation {
            reason: reason.into(),
        }
    }

    pub(crate) fn import(reason: impl Into<String>) -> Self {
        KeyError::Import {
            reason: reason.into(),
        }
    }
}

/// A claim set violates its construction invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// `iat` or `exp` was not supplied
    #[error("Missing registered claim '{0}'")]
    MissingTimestamp(&'static str),

    /// `exp` must be strictly greater than `iat`
    #[error("Expiration {exp} is not after issued-at {iat}")]
    InvalidValidityWindow { iat: i64, exp: i64 },

    /// A registered claim name was passed as a custom claim
    #[error("Claim '{0}' is registered and cannot be set as a custom claim")]
    ReservedClaim(String),
}

/// Issuance-time failure. No token must be emitted.
///
/// The messages never contain key material.
#[derive(Error, Debug)]
pub enum SigningError {
    #[error("Key material has no private half")]
    MissingPrivateKey,

    #[error("Header declares {header} but the key is bound to {key}")]
    AlgorithmMismatch {
        header: SigningAlgorithm,
        key: SigningAlgorithm,
    },

    #[error("Invalid claim set: {0}")]
    InvalidClaims(#[from] ClaimsError),

    #[error("Failed to serialize token section: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Signature primitive rejected the input: {0}")]
    Crypto(#[from] jsonwebtoken::errors::Error),
}

/// A verification policy cannot be built as requested.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("A verification policy needs at least one allowed algorithm")]
    NoAllowedAlgorithms,

    #[error("Required claim names must not be empty")]
    EmptyClaimName,

    #[error("The role allow-list must not be empty")]
    EmptyRoleAllowList,
}

/// The five ordered stages of the verification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VerificationStage {
    Parse,
    AlgorithmGate,
    Signature,
    StructuralClaims,
    SemanticClaims,
}

impl fmt::Display for VerificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VerificationStage::Parse => "parse",
            VerificationStage::AlgorithmGate => "algorithm-gate",
            VerificationStage::Signature => "signature",
            VerificationStage::StructuralClaims => "structural-claims",
            VerificationStage::SemanticClaims => "semantic-claims",
        };
        f.write_str(name)
    }
}

/// Verification-time rejection.
///
/// All variants mean "treat the subject as unauthenticated". They exist so
/// that internal logs can record the precise reason; they must not be
/// forwarded to the rejected caller (see [`crate::auth::bearer::Authenticator`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Algorithm '{0}' is not allowed")]
    AlgorithmNotAllowed(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Missing required claim '{0}'")]
    MissingClaim(String),

    #[error("Issuer mismatch: expected '{expected}', found {found:?}")]
    IssuerMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Token expired at {exp} (now {now})")]
    TokenExpired { exp: i64, now: i64 },

    #[error("Token not valid before {nbf} (now {now})")]
    TokenNotYetValid { nbf: i64, now: i64 },

    #[error("Role {0:?} is not allowed")]
    RoleNotAllowed(Option<String>),
}

impl VerificationError {
    /// Pipeline stage that produced this rejection
    pub fn stage(&self) -> VerificationStage {
        match self {
            VerificationError::MalformedToken(_) => VerificationStage::Parse,
            VerificationError::AlgorithmNotAllowed(_) => VerificationStage::AlgorithmGate,
            VerificationError::InvalidSignature => VerificationStage::Signature,
            VerificationError::MissingClaim(_) => VerificationStage::StructuralClaims,
            VerificationError::IssuerMismatch { .. }
            | VerificationError::TokenExpired { .. }
            | VerificationError::TokenNotYetValid { .. }
            | VerificationError::RoleNotAllowed(_) => VerificationStage::SemanticClaims,
        }
    }

    /// Stable identifier for audit logs
    pub fn kind(&self) -> &'static str {
        match self {
            VerificationError::MalformedToken(_) => "malformed_token",
            VerificationError::AlgorithmNotAllowed(_) => "algorithm_not_allowed",
            VerificationError::InvalidSignature => "invalid_signature",
            VerificationError::MissingClaim(_) => "missing_claim",
            VerificationError::IssuerMismatch { .. } => "issuer_mismatch",
            VerificationError::TokenExpired { .. } => "token_expired",
            VerificationError::TokenNotYetValid { .. } => "token_not_yet_valid",
            VerificationError::RoleNotAllowed(_) => "role_not_allowed",
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        VerificationError::MalformedToken(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_follow_pipeline_order() {
        let errors = [
            VerificationError::malformed("x"),
            VerificationError::AlgorithmNotAllowed("HS256".to_string()),
            VerificationError::InvalidSignature,
            VerificationError::MissingClaim("role".to_string()),
            VerificationError::TokenExpired { exp: 1, now: 2 },
        ];
        let stages: Vec<_> = errors.iter().map(|e| e.stage()).collect();
        let mut sorted = stages.clone();
        sorted.sort();
        assert_eq!(stages, sorted);
    }

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            VerificationError::malformed("x"),
            VerificationError::AlgorithmNotAllowed("none".to_string()),
            VerificationError::InvalidSignature,
            VerificationError::MissingClaim("iss".to_string()),
            VerificationError::IssuerMismatch {
                expected: "a".to_string(),
                found: None,
            },
            VerificationError::TokenExpired { exp: 1, now: 1 },
            VerificationError::TokenNotYetValid { nbf: 2, now: 1 },
            VerificationError::RoleNotAllowed(None),
        ];
        let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }
}
