// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use rust_token_auth::auth::{ClaimsError, SigningError};
use thiserror::Error;

/// Specific errors for token creation
#[derive(Error, Debug)]
pub enum TokenCreationError {
    #[error("Configuration loading failed: {source:#}")]
    ConfigError { source: anyhow::Error },

    #[error("Failed to load the signing key: {source:#}")]
    KeyLoadingError { source: anyhow::Error },

    #[error("Invalid --claim argument '{argument}': expected NAME=VALUE")]
    InvalidClaimArgument { argument: String },

    #[error("Invalid claims: {0}")]
    InvalidClaims(#[from] ClaimsError),

    #[error("Token signing failed: {0}")]
    TokenSigningError(#[from] SigningError),
}

impl TokenCreationError {
    pub fn exit_code(&self) -> i32 {
        match self {
            TokenCreationError::ConfigError { .. } => 1,
            TokenCreationError::KeyLoadingError { .. } => 2,
            TokenCreationError::InvalidClaimArgument { .. } => 3,
            TokenCreationError::InvalidClaims(_) => 4,
            TokenCreationError::TokenSigningError(_) => 5,
        }
    }
}
