// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Token issuance settings

use serde::{Deserialize, Serialize};

use crate::auth::token::DEFAULT_TOKEN_TYPE;
use crate::auth::{ClaimSet, ClaimSetBuilder};

fn default_issuer() -> String {
    "Authentication server (NO.1)".to_string()
}

/// Three days
fn default_lifetime_secs() -> u64 {
    3 * 24 * 60 * 60
}

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuanceConfig {
    /// Value of the `iss` claim in every issued token
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Distance between `iat` and `exp`, in seconds
    #[serde(default = "default_lifetime_secs")]
    pub lifetime_secs: u64,

    /// Header `typ` value
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            lifetime_secs: default_lifetime_secs(),
            token_type: default_token_type(),
        }
    }
}

impl IssuanceConfig {
    /// Start a claim set for `subject` issued at `now`, with the configured issuer and lifetime
    pub fn claims_for(&self, subject: impl Into<String>, now: i64) -> ClaimSetBuilder {
        ClaimSet::builder()
            .subject(subject)
            .issuer(self.issuer.clone())
            .issued_at(now)
            .expires_in(i64::try_from(self.lifetime_secs).unwrap_or(i64::MAX))
    }
}
