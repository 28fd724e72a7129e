// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Token lifecycle engine
//!
//! Key material management, deterministic token construction and signing,
//! and the verification pipeline that decides whether a token's payload can
//! be trusted.
//!
//! Data flow:
//!
//! ```text
//! KeyMaterial::generate / import_private ──► TokenSigner ──► Token
//!                                             ▲
//!                                     ClaimSet┘
//!
//! Token + KeyMaterial (public) + VerificationPolicy ──► TokenVerifier ──► ClaimSet | VerificationError
//! ```

pub mod algorithm;
pub mod bearer;
pub mod claims;
pub mod error;
pub mod keys;
pub mod policy;
pub mod signer;
pub mod token;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use algorithm::{SigningAlgorithm, UnsupportedAlgorithm};
pub use bearer::{extract_bearer_token, token_from_query, Authenticator, Unauthenticated};
pub use claims::{ClaimSet, ClaimSetBuilder, REGISTERED_CLAIMS};
pub use error::{
    ClaimsError, KeyError, PolicyError, SigningError, VerificationError, VerificationStage,
};
pub use keys::{KeyMaterial, DEFAULT_MODULUS_BITS};
pub use policy::{VerificationPolicy, VerificationPolicyBuilder};
pub use signer::{sign_token, TokenSigner};
pub use token::{Token, TokenHeader};
pub use verifier::{unix_now, verify_token, verify_token_detailed, TokenVerifier, VerifiedToken};
