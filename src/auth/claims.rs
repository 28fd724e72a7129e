// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Claim set carried in the token payload
//!
//! Registered claims (`sub`, `iss`, `iat`, `exp`, `nbf`) have typed fields;
//! every other claim is kept as an opaque JSON value in `custom` and
//! serialized alongside them at the top level of the payload object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ClaimsError;

/// Claim names with fixed semantics
pub const REGISTERED_CLAIMS: [&str; 5] = ["sub", "iss", "iat", "exp", "nbf"];

/// Payload of a token
///
/// Once embedded in a signed token a claim set is immutable; any change
/// requires minting a new token. A claim set decoded on the verifying side is
/// only advisory until the verifier returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimSet {
    /// Subject identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issuer name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Issued-at, seconds since the Unix epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration, seconds since the Unix epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Not-before, seconds since the Unix epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Custom claims such as `name` or `role`
    #[serde(flatten)]
    pub custom: BTreeMap<String, Value>,
}

impl ClaimSet {
    pub fn builder() -> ClaimSetBuilder {
        ClaimSetBuilder::default()
    }

    /// Custom claim by name
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.custom.get(name)
    }

    /// Custom claim by name, if it is a string
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claim(name).and_then(Value::as_str)
    }

    pub fn role(&self) -> Option<&str> {
        self.claim_str("role")
    }

    /// Check the issuance invariant `exp > iat`
    pub fn validate_window(&self) -> Result<(i64, i64), ClaimsError> {
        let iat = self.iat.ok_or(ClaimsError::MissingTimestamp("iat"))?;
        let exp = self.exp.ok_or(ClaimsError::MissingTimestamp("exp"))?;
        if exp <= iat {
            return Err(ClaimsError::InvalidValidityWindow { iat, exp });
        }
        Ok((iat, exp))
    }
}

/// Builder for [`ClaimSet`]
///
/// `iat` and `exp` are always supplied by the caller; nothing here reads the
/// clock.
///
/// ```
/// use rust_token_auth::auth::ClaimSet;
///
/// let claims = ClaimSet::builder()
///     .subject("22334455")
///     .issuer("Auth-1")
///     .issued_at(1_693_482_541)
///     .expires_in(259_200)
///     .claim("role", "EDITOR")
///     .build()
///     .unwrap();
/// assert_eq!(claims.exp, Some(1_693_741_741));
/// ```
#[derive(Debug, Default)]
pub struct ClaimSetBuilder {
    claims: ClaimSet,
    lifetime: Option<i64>,
}

impl ClaimSetBuilder {
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.claims.sub = Some(sub.into());
        self
    }

    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.claims.iss = Some(iss.into());
        self
    }

    pub fn issued_at(mut self, iat: i64) -> Self {
        self.claims.iat = Some(iat);
        self
    }

    /// Absolute expiration; overrides [`expires_in`](Self::expires_in)
    pub fn expires_at(mut self, exp: i64) -> Self {
        self.claims.exp = Some(exp);
        self.lifetime = None;
        self
    }

    /// Expiration relative to `iat`, resolved in [`build`](Self::build)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    pub fn not_before(mut self, nbf: i64) -> Self {
        self.claims.nbf = Some(nbf);
        self
    }

    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.custom.insert(name.into(), value.into());
        self
    }

    /// Finish the claim set
    ///
    /// # Errors
    ///
    /// * [`ClaimsError::MissingTimestamp`] if `iat` or `exp` cannot be determined
    /// * [`ClaimsError::InvalidValidityWindow`] if `exp <= iat`
    /// * [`ClaimsError::ReservedClaim`] if a registered name was used as a custom claim
    pub fn build(mut self) -> Result<ClaimSet, ClaimsError> {
        if let Some(reserved) = self
            .claims
            .custom
            .keys()
            .find(|name| REGISTERED_CLAIMS.contains(&name.as_str()))
        {
            return Err(ClaimsError::ReservedClaim(reserved.clone()));
        }

        if let Some(lifetime) = self.lifetime {
            let iat = self.claims.iat.ok_or(ClaimsError::MissingTimestamp("iat"))?;
            self.claims.exp = Some(iat.saturating_add(lifetime));
        }

        self.claims.validate_window()?;
        Ok(self.claims)
    }
}
