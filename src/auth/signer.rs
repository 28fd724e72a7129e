// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Token construction and signing
//!
//! The signer never reads the clock: `iat` and `exp` come from the caller.
//! With the same claims, header and key the payload segment is always
//! identical; the whole token is identical too unless the scheme is
//! randomized (PSS).

use std::sync::Arc;

use log::debug;

use super::claims::ClaimSet;
use super::error::SigningError;
use super::keys::KeyMaterial;
use super::token::{encode_segment, Token, TokenHeader, SEGMENT_SEPARATOR};

/// Sign a claim set into a token
///
/// # Preconditions
///
/// * `key` carries a private half bound to `header.alg`
/// * `claims.exp > claims.iat`
///
/// # Errors
///
/// * [`SigningError::MissingPrivateKey`] for verification-only key material
/// * [`SigningError::AlgorithmMismatch`] when `header.alg` differs from the key's scheme
/// * [`SigningError::InvalidClaims`] when the validity window is missing or inverted
/// * [`SigningError::Crypto`] when the signature primitive rejects the input
pub fn sign_token(
    claims: &ClaimSet,
    header: &TokenHeader,
    key: &KeyMaterial,
) -> Result<Token, SigningError> {
    let encoding_key = key.encoding_key().ok_or(SigningError::MissingPrivateKey)?;
    if header.alg != key.algorithm() {
        return Err(SigningError::AlgorithmMismatch {
            header: header.alg,
            key: key.algorithm(),
        });
    }
    claims.validate_window()?;

    let header_segment = encode_segment(&serde_json::to_vec(header)?);
    let payload_segment = encode_segment(&serde_json::to_vec(claims)?);
    let signing_input = format!("{header_segment}{SEGMENT_SEPARATOR}{payload_segment}");

    let signature = jsonwebtoken::crypto::sign(
        signing_input.as_bytes(),
        encoding_key,
        header.alg.to_jsonwebtoken_algorithm(),
    )?;

    debug!(
        "Signed {} token for subject {:?} (exp {:?})",
        header.alg, claims.sub, claims.exp
    );
    Ok(Token::from_parts(&header_segment, &payload_segment, &signature))
}

/// Signer bound to one issuing key
///
/// Holds no mutable state; clone it or share it freely.
#[derive(Debug, Clone)]
pub struct TokenSigner {
    key: Arc<KeyMaterial>,
    header: TokenHeader,
}

impl TokenSigner {
    /// Bind a signer to `key`, using its algorithm and the `JWT` type in every header
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::MissingPrivateKey`] if the key cannot sign.
    pub fn new(key: Arc<KeyMaterial>) -> Result<Self, SigningError> {
        if !key.can_sign() {
            return Err(SigningError::MissingPrivateKey);
        }
        let header = TokenHeader::new(key.algorithm());
        Ok(Self { key, header })
    }

    pub fn with_token_type(mut self, typ: impl Into<String>) -> Self {
        self.header = self.header.with_type(typ);
        self
    }

    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    pub fn sign(&self, claims: &ClaimSet) -> Result<Token, SigningError> {
        sign_token(claims, &self.header, &self.key)
    }
}
