// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! Schema output and the validation rules that the JSON schema cannot express.

use anyhow::{Context, Result};
use base64::Engine;
use log::debug;

use super::{Config, CONFIG_SCHEMA};
use crate::auth::keys::SIGNING_MODULUS_BITS;

/// Output the embedded JSON schema to the console.
pub fn output_config_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;
    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;
    println!("{}", formatted_schema);
    Ok(())
}

/// Validates the configuration against rules not covered by the JSON schema.
///
/// - **Key strength**: `keys.modulus_bits` within the signing range
/// - **Inline keys**: base64 that decodes to a PEM armor
/// - **Lifetime**: `issuance.lifetime_secs` strictly positive, so that `exp > iat`
/// - **Issuer**: non-blank
/// - **Required claims**: non-blank names
/// - **Role allow-list**: non-empty when present, with non-blank roles
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    if !SIGNING_MODULUS_BITS.contains(&config.keys.modulus_bits) {
        anyhow::bail!(
            "Invalid modulus length {}: expected {}..={} bits",
            config.keys.modulus_bits,
            SIGNING_MODULUS_BITS.start(),
            SIGNING_MODULUS_BITS.end()
        );
    }

    for (name, value) in [
        ("private", &config.keys.private_key_base64),
        ("public", &config.keys.public_key_base64),
    ] {
        if let Some(encoded) = value {
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .with_context(|| format!("Inline {} key is not valid base64", name))?;
            if !decoded.starts_with(b"-----BEGIN ") {
                anyhow::bail!("Inline {} key does not decode to a PEM armor", name);
            }
        }
    }

    if config.keys.private_key_path.is_none() && config.keys.private_key_base64.is_none() {
        debug!("No private key configured, only verification will be possible");
    }

    if config.issuance.lifetime_secs == 0 {
        anyhow::bail!("Token lifetime must be at least one second");
    }
    if config.issuance.issuer.trim().is_empty() {
        anyhow::bail!("Issuer must not be blank");
    }

    for claim in &config.verification.required_claims {
        if claim.trim().is_empty() {
            anyhow::bail!("Required claim names must not be blank");
        }
    }
    if let Some(roles) = &config.verification.allowed_roles {
        if roles.is_empty() || roles.iter().any(|r| r.trim().is_empty()) {
            anyhow::bail!("allowed_roles must list at least one non-blank role");
        }
    }

    Ok(())
}
