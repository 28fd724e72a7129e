// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Key material configuration
//!
//! Keys are read either from PEM files or from base64-encoded PEM embedded
//! directly in the configuration file. Embedded keys take precedence.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::auth::{SigningAlgorithm, DEFAULT_MODULUS_BITS};

fn default_algorithm() -> SigningAlgorithm {
    SigningAlgorithm::RS256
}

fn default_modulus_bits() -> usize {
    DEFAULT_MODULUS_BITS
}

fn default_private_key_path() -> Option<PathBuf> {
    Some(PathBuf::from("./keys/private.pem"))
}

fn default_public_key_path() -> PathBuf {
    PathBuf::from("./keys/public.pem")
}

/// Where the key pair lives and which scheme it is bound to
///
/// # Example
///
/// ```
/// use rust_token_auth::config::KeysConfig;
///
/// let keys = KeysConfig::default();
/// assert_eq!(keys.modulus_bits, 2048);
/// assert_eq!(keys.public_key_path.to_str(), Some("./keys/public.pem"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Signature scheme the key pair is bound to
    #[serde(default = "default_algorithm")]
    pub algorithm: SigningAlgorithm,

    /// RSA modulus length used when generating a new pair
    #[serde(default = "default_modulus_bits")]
    pub modulus_bits: usize,

    /// PKCS#8 PEM private key file, only needed on the issuing side
    #[serde(default = "default_private_key_path")]
    pub private_key_path: Option<PathBuf>,

    /// SPKI PEM public key file
    #[serde(default = "default_public_key_path")]
    pub public_key_path: PathBuf,

    /// Base64-encoded private key PEM; overrides `private_key_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_base64: Option<String>,

    /// Base64-encoded public key PEM; overrides `public_key_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_base64: Option<String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            modulus_bits: default_modulus_bits(),
            private_key_path: default_private_key_path(),
            public_key_path: default_public_key_path(),
            private_key_base64: None,
            public_key_base64: None,
        }
    }
}
