// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rust Token Auth library
//!
//! This library issues and verifies signed bearer tokens with RSA key pairs.
//!
//! - [`auth`]: key material, claims, signing and the verification pipeline
//! - [`config`]: YAML configuration with JSON schema validation
//! - [`utility`]: PEM key file persistence
//!
//! ```no_run
//! use std::sync::Arc;
//! use rust_token_auth::auth::{
//!     unix_now, ClaimSet, KeyMaterial, SigningAlgorithm, TokenSigner, TokenVerifier,
//!     VerificationPolicy,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let key = Arc::new(KeyMaterial::generate(2048, SigningAlgorithm::RS256)?);
//! let signer = TokenSigner::new(key.clone())?;
//!
//! let claims = ClaimSet::builder()
//!     .subject("22334455")
//!     .issuer("Auth-1")
//!     .issued_at(unix_now())
//!     .expires_in(3600)
//!     .claim("role", "EDITOR")
//!     .build()?;
//! let token = signer.sign(&claims)?;
//!
//! let policy = VerificationPolicy::builder()
//!     .allow(SigningAlgorithm::RS256)
//!     .issuer("Auth-1")
//!     .require("role")
//!     .build()?;
//! let verifier = TokenVerifier::new(Arc::new(key.public_only()), policy);
//! let verified = verifier.verify(token.as_str())?;
//! assert_eq!(verified.role(), Some("EDITOR"));
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod utility;
