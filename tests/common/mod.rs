// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

#![allow(dead_code)]

use std::sync::{Arc, Once, OnceLock};

use rust_token_auth::auth::{
    ClaimSet, KeyMaterial, SigningAlgorithm, TokenSigner, TokenVerifier, VerificationPolicy,
};

static INIT: Once = Once::new();

pub const NOW: i64 = 1_693_482_541;
pub const LIFETIME: i64 = 259_200;

// Setup logger for tests
pub fn setup() {
    INIT.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

/// Issuing key pair shared by every test of a binary
pub fn key_a() -> Arc<KeyMaterial> {
    static KEY: OnceLock<Arc<KeyMaterial>> = OnceLock::new();
    KEY.get_or_init(|| Arc::new(KeyMaterial::generate(2048, SigningAlgorithm::RS256).unwrap()))
        .clone()
}

/// Unrelated RS256 key pair
pub fn key_b() -> Arc<KeyMaterial> {
    static KEY: OnceLock<Arc<KeyMaterial>> = OnceLock::new();
    KEY.get_or_init(|| Arc::new(KeyMaterial::generate(2048, SigningAlgorithm::RS256).unwrap()))
        .clone()
}

pub fn editor_claims(iat: i64) -> ClaimSet {
    ClaimSet::builder()
        .subject("22334455")
        .issuer("Auth-1")
        .issued_at(iat)
        .expires_in(LIFETIME)
        .claim("name", "John Doe")
        .claim("role", "EDITOR")
        .build()
        .unwrap()
}

pub fn editor_policy() -> VerificationPolicy {
    VerificationPolicy::builder()
        .allow(SigningAlgorithm::RS256)
        .issuer("Auth-1")
        .require_all(["iss", "exp", "role"])
        .build()
        .unwrap()
}

pub fn signer() -> TokenSigner {
    TokenSigner::new(key_a()).unwrap()
}

/// Verifier holding only the public half of [`key_a`]
pub fn verifier() -> TokenVerifier {
    TokenVerifier::new(Arc::new(key_a().public_only()), editor_policy())
}
