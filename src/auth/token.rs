// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Token wire format
//!
//! A token is three base64url (unpadded) segments joined by `.`:
//! `header.payload.signature`. The signature covers the exact ASCII bytes of
//! `header.payload` as they appear in the token.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::algorithm::SigningAlgorithm;
use super::error::VerificationError;

/// Separator between the three token segments
pub const SEGMENT_SEPARATOR: char = '.';

/// Default value of the header `typ` field
pub const DEFAULT_TOKEN_TYPE: &str = "JWT";

/// Protected header of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: SigningAlgorithm,
    pub typ: String,
}

impl TokenHeader {
    pub fn new(alg: SigningAlgorithm) -> Self {
        Self {
            alg,
            typ: DEFAULT_TOKEN_TYPE.to_string(),
        }
    }

    pub fn with_type(mut self, typ: impl Into<String>) -> Self {
        self.typ = typ.into();
        self
    }
}

/// Signed token as transmitted by callers
///
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub(crate) fn from_parts(header: &str, payload: &str, signature: &str) -> Self {
        Token(format!(
            "{header}{SEGMENT_SEPARATOR}{payload}{SEGMENT_SEPARATOR}{signature}"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Encoded payload segment, identical for every signature of the same claims
    pub fn payload_segment(&self) -> &str {
        self.0.split(SEGMENT_SEPARATOR).nth(1).unwrap_or_default()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

pub(crate) fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Header as declared by an untrusted token
///
/// `alg` stays a plain string so that unknown algorithms reach the
/// algorithm gate instead of failing as parse errors.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeclaredHeader {
    pub alg: String,
    #[serde(default)]
    pub typ: Option<String>,
}

/// Result of the parse stage: every segment decoded, only the header interpreted
#[derive(Debug)]
pub(crate) struct ParsedToken<'t> {
    /// `header.payload` exactly as received
    pub signing_input: &'t str,
    pub signature: &'t str,
    pub header: DeclaredHeader,
    pub payload: Vec<u8>,
}

/// Split a serialized token and decode its three segments
pub(crate) fn parse(token: &str) -> Result<ParsedToken<'_>, VerificationError> {
    let mut segments = token.split(SEGMENT_SEPARATOR);
    let (header_b64, payload_b64, signature_b64) =
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(h), Some(p), Some(s), None) => (h, p, s),
            _ => {
                return Err(VerificationError::malformed(
                    "expected exactly three dot-separated segments",
                ))
            }
        };

    if header_b64.is_empty() || payload_b64.is_empty() {
        return Err(VerificationError::malformed("empty header or payload segment"));
    }

    let header_bytes = decode_segment(header_b64, "header")?;
    let payload = decode_segment(payload_b64, "payload")?;
    decode_segment(signature_b64, "signature")?;

    let header: DeclaredHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| VerificationError::malformed(format!("header is not a valid JSON object: {}", e)))?;

    let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
    Ok(ParsedToken {
        signing_input,
        signature: signature_b64,
        header,
        payload,
    })
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, VerificationError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| VerificationError::malformed(format!("{} is not base64url: {}", name, e)))
}
