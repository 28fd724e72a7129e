// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

mod common;

use std::sync::Arc;
use std::thread;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use common::*;
use rust_token_auth::auth::{
    KeyMaterial, SigningAlgorithm, TokenSigner, TokenVerifier, VerificationError,
    VerificationPolicy, VerificationStage,
};

fn segment(json: &str) -> String {
    URL_SAFE_NO_PAD.encode(json)
}

/// Replace one character in the middle of `segment` with a different base64url character
fn flip_middle(segment: &str) -> String {
    let mut chars: Vec<char> = segment.chars().collect();
    let middle = chars.len() / 2;
    chars[middle] = if chars[middle] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[test]
fn test_issue_then_verify_round_trip() {
    setup();
    let claims = editor_claims(NOW);
    let token = signer().sign(&claims).unwrap();

    let verified = verifier().verify_detailed_at(token.as_str(), NOW + 60).unwrap();
    assert_eq!(verified.claims, claims);
    assert_eq!(verified.header.alg, SigningAlgorithm::RS256);
    assert_eq!(verified.header.typ, "JWT");
    assert_eq!(verified.claims.claim_str("name"), Some("John Doe"));
}

#[test]
fn test_same_claims_same_token_for_rs256() {
    setup();
    let claims = editor_claims(NOW);
    let first = signer().sign(&claims).unwrap();
    let second = signer().sign(&claims).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_token_from_another_key_is_rejected() {
    setup();
    let token = TokenSigner::new(key_b())
        .unwrap()
        .sign(&editor_claims(NOW))
        .unwrap();
    let err = verifier().verify_at(token.as_str(), NOW).unwrap_err();
    assert_eq!(err, VerificationError::InvalidSignature);
}

#[test]
fn test_tampered_payload_is_rejected() {
    setup();
    let token = signer().sign(&editor_claims(NOW)).unwrap();
    let parts: Vec<&str> = token.as_str().split('.').collect();

    // A well-formed but different payload
    let forged_payload = segment(
        r#"{"sub":"22334455","iss":"Auth-1","iat":1693482541,"exp":1693741741,"name":"John Doe","role":"ADMIN"}"#,
    );
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
    assert_eq!(
        verifier().verify_at(&forged, NOW).unwrap_err(),
        VerificationError::InvalidSignature
    );

    let flipped = format!("{}.{}.{}", parts[0], flip_middle(parts[1]), parts[2]);
    assert_eq!(
        verifier().verify_at(&flipped, NOW).unwrap_err().stage(),
        VerificationStage::Signature
    );
}

#[test]
fn test_tampered_signature_is_rejected() {
    setup();
    let token = signer().sign(&editor_claims(NOW)).unwrap();
    let parts: Vec<&str> = token.as_str().split('.').collect();
    let forged = format!("{}.{}.{}", parts[0], parts[1], flip_middle(parts[2]));
    assert_eq!(
        verifier().verify_at(&forged, NOW).unwrap_err(),
        VerificationError::InvalidSignature
    );
}

#[test]
fn test_algorithm_outside_policy_is_rejected_before_crypto() {
    setup();
    let pss_key = Arc::new(KeyMaterial::generate(2048, SigningAlgorithm::PS256).unwrap());
    let token = TokenSigner::new(pss_key.clone())
        .unwrap()
        .sign(&editor_claims(NOW))
        .unwrap();

    // Right key, but the policy only trusts RS256
    let verifier = TokenVerifier::new(Arc::new(pss_key.public_only()), editor_policy());
    let err = verifier.verify_at(token.as_str(), NOW).unwrap_err();
    assert_eq!(err, VerificationError::AlgorithmNotAllowed("PS256".to_string()));
    assert_eq!(err.stage(), VerificationStage::AlgorithmGate);
}

#[test]
fn test_symmetric_and_unsigned_headers_are_rejected() {
    setup();
    let payload = segment(r#"{"iss":"Auth-1","exp":1693741741,"role":"EDITOR"}"#);

    let hs256 = format!(
        "{}.{}.{}",
        segment(r#"{"alg":"HS256","typ":"JWT"}"#),
        payload,
        segment("forged-with-the-public-key-as-hmac-secret")
    );
    assert_eq!(
        verifier().verify_at(&hs256, NOW).unwrap_err(),
        VerificationError::AlgorithmNotAllowed("HS256".to_string())
    );

    let none = format!("{}.{}.", segment(r#"{"alg":"none","typ":"JWT"}"#), payload);
    assert_eq!(
        verifier().verify_at(&none, NOW).unwrap_err(),
        VerificationError::AlgorithmNotAllowed("none".to_string())
    );
}

#[test]
fn test_policy_with_two_algorithms_still_binds_to_the_key() {
    setup();
    let pss_key = Arc::new(KeyMaterial::generate(2048, SigningAlgorithm::PS256).unwrap());
    let token = TokenSigner::new(pss_key)
        .unwrap()
        .sign(&editor_claims(NOW))
        .unwrap();

    let policy = VerificationPolicy::builder()
        .allow_all([SigningAlgorithm::RS256, SigningAlgorithm::PS256])
        .issuer("Auth-1")
        .build()
        .unwrap();
    // key_a is bound to RS256
    let verifier = TokenVerifier::new(key_a(), policy);
    assert_eq!(
        verifier.verify_at(token.as_str(), NOW).unwrap_err(),
        VerificationError::InvalidSignature
    );
}

#[test]
fn test_expiry_boundary() {
    setup();
    let claims = editor_claims(NOW);
    let exp = claims.exp.unwrap();
    let token = signer().sign(&claims).unwrap();

    assert!(verifier().verify_at(token.as_str(), exp - 1).is_ok());
    assert_eq!(
        verifier().verify_at(token.as_str(), exp).unwrap_err(),
        VerificationError::TokenExpired { exp, now: exp }
    );
    let late = verifier().verify_at(token.as_str(), exp + 1).unwrap_err();
    assert!(matches!(late, VerificationError::TokenExpired { .. }));
    assert_eq!(late.kind(), "token_expired");
    assert_eq!(late.stage(), VerificationStage::SemanticClaims);
}

#[test]
fn test_missing_required_claim() {
    setup();
    let claims = rust_token_auth::auth::ClaimSet::builder()
        .subject("22334455")
        .issuer("Auth-1")
        .issued_at(NOW)
        .expires_in(LIFETIME)
        .build()
        .unwrap();
    let token = signer().sign(&claims).unwrap();
    let err = verifier().verify_at(token.as_str(), NOW).unwrap_err();
    assert_eq!(err, VerificationError::MissingClaim("role".to_string()));
    assert_eq!(err.stage(), VerificationStage::StructuralClaims);
}

#[test]
fn test_issuer_mismatch() {
    setup();
    let claims = rust_token_auth::auth::ClaimSet::builder()
        .issuer("Auth-2")
        .issued_at(NOW)
        .expires_in(LIFETIME)
        .claim("role", "EDITOR")
        .build()
        .unwrap();
    let token = signer().sign(&claims).unwrap();
    assert_eq!(
        verifier().verify_at(token.as_str(), NOW).unwrap_err(),
        VerificationError::IssuerMismatch {
            expected: "Auth-1".to_string(),
            found: Some("Auth-2".to_string()),
        }
    );
}

#[test]
fn test_malformed_tokens() {
    setup();
    for token in ["", "abc", "a.b", "a.b.c.d", "!!!.???.***"] {
        let err = verifier().verify_at(token, NOW).unwrap_err();
        assert_eq!(err.stage(), VerificationStage::Parse, "token {:?}", token);
    }
}

#[test]
fn test_concurrent_verification_shares_one_verifier() {
    setup();
    let verifier = Arc::new(verifier());
    let token = Arc::new(signer().sign(&editor_claims(NOW)).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let verifier = verifier.clone();
            let token = token.clone();
            thread::spawn(move || {
                let claims = verifier.verify_at(token.as_str(), NOW + i).unwrap();
                claims.role().map(str::to_string)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().as_deref(), Some("EDITOR"));
    }
}
