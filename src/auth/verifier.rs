// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Token verification pipeline
//!
//! Verification is a linear pipeline of five stages. It fails closed: the
//! first stage that finds a problem ends verification with its specific
//! [`VerificationError`]; nothing is accumulated.
//!
//! | Stage | Check | Rejection |
//! |-------|-------|-----------|
//! | 1. Parse | three segments, each base64url; header is JSON with `alg` | `MalformedToken` |
//! | 2. Algorithm gate | header `alg` is in the policy's allowed set | `AlgorithmNotAllowed` |
//! | 3. Signature | signature over `header.payload` verifies with the public key | `InvalidSignature` |
//! | 4. Structural claims | payload is a JSON object carrying every required claim | `MissingClaim` |
//! | 5. Semantic claims | issuer, `exp`, `nbf`, role allow-list | `IssuerMismatch`, `TokenExpired`, ... |
//!
//! The algorithm gate runs before any cryptographic work, so a token can
//! never choose how it is verified. The payload is only interpreted once the
//! signature has been checked.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rust_token_auth::auth::{KeyMaterial, SigningAlgorithm, TokenVerifier, VerificationPolicy};
//!
//! let pem = std::fs::read("keys/public.pem").unwrap();
//! let key = Arc::new(KeyMaterial::import_public(&pem, SigningAlgorithm::RS256).unwrap());
//! let policy = VerificationPolicy::builder()
//!     .allow(SigningAlgorithm::RS256)
//!     .issuer("Authentication server (NO.1)")
//!     .require_all(["iss", "exp", "role"])
//!     .build()
//!     .unwrap();
//!
//! let verifier = TokenVerifier::new(key, policy);
//! match verifier.verify("eyJhbGciOi...") {
//!     Ok(claims) => println!("subject {:?}", claims.sub),
//!     Err(e) => eprintln!("rejected at {}: {}", e.stage(), e.kind()),
//! }
//! ```

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use log::debug;
use serde_json::{Map, Value};

use super::algorithm::SigningAlgorithm;
use super::claims::ClaimSet;
use super::error::VerificationError;
use super::keys::KeyMaterial;
use super::policy::VerificationPolicy;
use super::token::{self, TokenHeader};

/// A token that passed every stage
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    pub header: TokenHeader,
    pub claims: ClaimSet,
}

/// Verify `token` at wall-clock time `now` (seconds since the Unix epoch)
///
/// Pure function of its inputs; safe to call concurrently.
pub fn verify_token(
    token: &str,
    key: &KeyMaterial,
    policy: &VerificationPolicy,
    now: i64,
) -> Result<ClaimSet, VerificationError> {
    verify_token_detailed(token, key, policy, now).map(|verified| verified.claims)
}

/// Same as [`verify_token`], also returning the protected header
pub fn verify_token_detailed(
    token: &str,
    key: &KeyMaterial,
    policy: &VerificationPolicy,
    now: i64,
) -> Result<VerifiedToken, VerificationError> {
    // Stage 1
    let parsed = token::parse(token)?;

    // Stage 2
    let algorithm = SigningAlgorithm::from_str(&parsed.header.alg)
        .ok()
        .filter(|alg| policy.allows(*alg))
        .ok_or_else(|| VerificationError::AlgorithmNotAllowed(parsed.header.alg.clone()))?;

    // Stage 3
    check_signature(parsed.signing_input, parsed.signature, algorithm, key)?;
    debug!("Token signature verified with {}", algorithm);

    // Stage 4
    let payload: Map<String, Value> = serde_json::from_slice(&parsed.payload)
        .map_err(|e| VerificationError::malformed(format!("payload is not a JSON object: {}", e)))?;
    for name in policy.required_claims() {
        if payload.get(name).map_or(true, Value::is_null) {
            return Err(VerificationError::MissingClaim(name.clone()));
        }
    }
    let claims: ClaimSet = serde_json::from_value(Value::Object(payload))
        .map_err(|e| VerificationError::malformed(format!("invalid registered claim: {}", e)))?;

    // Stage 5
    check_semantics(&claims, policy, now)?;

    Ok(VerifiedToken {
        header: TokenHeader {
            alg: algorithm,
            typ: parsed
                .header
                .typ
                .unwrap_or_else(|| token::DEFAULT_TOKEN_TYPE.to_string()),
        },
        claims,
    })
}

fn check_signature(
    signing_input: &str,
    signature: &str,
    algorithm: SigningAlgorithm,
    key: &KeyMaterial,
) -> Result<(), VerificationError> {
    // The key is bound to one scheme and cannot vouch for any other
    if algorithm != key.algorithm() {
        debug!(
            "Token declares {} but the verifying key is bound to {}",
            algorithm,
            key.algorithm()
        );
        return Err(VerificationError::InvalidSignature);
    }

    match jsonwebtoken::crypto::verify(
        signature,
        signing_input.as_bytes(),
        key.decoding_key(),
        algorithm.to_jsonwebtoken_algorithm(),
    ) {
        Ok(true) => Ok(()),
        Ok(false) => Err(VerificationError::InvalidSignature),
        Err(e) => {
            debug!("Signature primitive error: {}", e);
            Err(VerificationError::InvalidSignature)
        }
    }
}

fn check_semantics(
    claims: &ClaimSet,
    policy: &VerificationPolicy,
    now: i64,
) -> Result<(), VerificationError> {
    if let Some(expected) = policy.issuer() {
        if claims.iss.as_deref() != Some(expected) {
            return Err(VerificationError::IssuerMismatch {
                expected: expected.to_string(),
                found: claims.iss.clone(),
            });
        }
    }

    let leeway = i64::try_from(policy.leeway_secs()).unwrap_or(i64::MAX);
    if let Some(exp) = claims.exp {
        // exp == now is already expired
        if exp.saturating_add(leeway) <= now {
            return Err(VerificationError::TokenExpired { exp, now });
        }
    }
    if let Some(nbf) = claims.nbf {
        if nbf > now.saturating_add(leeway) {
            return Err(VerificationError::TokenNotYetValid { nbf, now });
        }
    }

    if let Some(roles) = policy.allowed_roles() {
        let role = claims.role();
        if !role.is_some_and(|r| roles.contains(r)) {
            return Err(VerificationError::RoleNotAllowed(
                role.map(str::to_string),
            ));
        }
    }

    Ok(())
}

/// Current wall-clock time in seconds since the Unix epoch
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Verifier bound to one public key and one policy
///
/// Holds no session state; clone it or share it across threads.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    key: Arc<KeyMaterial>,
    policy: VerificationPolicy,
}

impl TokenVerifier {
    pub fn new(key: Arc<KeyMaterial>, policy: VerificationPolicy) -> Self {
        Self { key, policy }
    }

    pub fn policy(&self) -> &VerificationPolicy {
        &self.policy
    }

    /// Verify against the current wall-clock time
    pub fn verify(&self, token: &str) -> Result<ClaimSet, VerificationError> {
        self.verify_at(token, unix_now())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<ClaimSet, VerificationError> {
        verify_token(token, &self.key, &self.policy, now)
    }

    pub fn verify_detailed(&self, token: &str) -> Result<VerifiedToken, VerificationError> {
        self.verify_detailed_at(token, unix_now())
    }

    pub fn verify_detailed_at(
        &self,
        token: &str,
        now: i64,
    ) -> Result<VerifiedToken, VerificationError> {
        verify_token_detailed(token, &self.key, &self.policy, now)
    }
}
