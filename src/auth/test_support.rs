// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Shared fixtures for unit tests; RSA keys are generated once per test binary

use std::sync::OnceLock;

use super::{ClaimSet, KeyMaterial, SigningAlgorithm, VerificationPolicy};

static KEY_A: OnceLock<KeyMaterial> = OnceLock::new();
static KEY_B: OnceLock<KeyMaterial> = OnceLock::new();

pub(crate) fn key_a() -> &'static KeyMaterial {
    KEY_A.get_or_init(|| KeyMaterial::generate(2048, SigningAlgorithm::RS256).unwrap())
}

/// Unrelated to [`key_a`]
pub(crate) fn key_b() -> &'static KeyMaterial {
    KEY_B.get_or_init(|| KeyMaterial::generate(2048, SigningAlgorithm::RS256).unwrap())
}

pub(crate) fn sample_claims(iat: i64) -> ClaimSet {
    ClaimSet::builder()
        .subject("22334455")
        .issuer("Auth-1")
        .issued_at(iat)
        .expires_in(259_200)
        .claim("name", "John Doe")
        .claim("role", "EDITOR")
        .build()
        .unwrap()
}

pub(crate) fn sample_policy() -> VerificationPolicy {
    VerificationPolicy::builder()
        .allow(SigningAlgorithm::RS256)
        .issuer("Auth-1")
        .require_all(["iss", "exp", "role"])
        .build()
        .unwrap()
}
