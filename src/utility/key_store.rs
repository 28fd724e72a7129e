// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Key file persistence
//!
//! Reads and writes the PEM files (PKCS#8 private key, SPKI public key) that
//! carry key material between the key generation tool, the issuing side and
//! the verifying side.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;
use log::{debug, info};

use crate::auth::KeyMaterial;
use crate::config::KeysConfig;

/// Writes both halves of `key` as PEM files
///
/// Parent directories are created when missing. On Unix the private key file
/// is only readable by its owner.
///
/// # Arguments
///
/// * `key` - Key material holding a private half
/// * `private_key_path` - Destination of the PKCS#8 PEM private key
/// * `public_key_path` - Destination of the SPKI PEM public key
pub fn write_key_pair(
    key: &KeyMaterial,
    private_key_path: &Path,
    public_key_path: &Path,
) -> Result<()> {
    let private_pem = key
        .private_key_pem()
        .context("Failed to encode private key to PEM")?;
    let public_pem = key
        .public_key_pem()
        .context("Failed to encode public key to PEM")?;

    for path in [private_key_path, public_key_path] {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create key directory {:?}", parent))?;
            }
        }
    }

    let mut private_file = create_private_file(private_key_path).with_context(|| {
        format!("Failed to create private key file at {:?}", private_key_path)
    })?;
    private_file
        .write_all(private_pem.as_bytes())
        .context("Failed to write private key to file")?;

    let mut public_file = File::create(public_key_path)
        .with_context(|| format!("Failed to create public key file at {:?}", public_key_path))?;
    public_file
        .write_all(public_pem.as_bytes())
        .context("Failed to write public key to file")?;

    info!(
        "Key pair written to {:?} and {:?}",
        private_key_path, public_key_path
    );
    Ok(())
}

// `mode` only applies to new files, an existing one is narrowed before the key is written
#[cfg(unix)]
fn create_private_file(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_private_file(path: &Path) -> std::io::Result<File> {
    File::create(path)
}

/// Loads the issuing key pair described by the configuration
///
/// Inline base64 PEM wins over the file path. When the public key is also
/// available the two halves must match.
pub fn load_signing_key(config: &KeysConfig) -> Result<KeyMaterial> {
    let private_pem = match (&config.private_key_base64, &config.private_key_path) {
        (Some(encoded), _) => decode_inline(encoded, "private")?,
        (None, Some(path)) => fs::read(path)
            .with_context(|| format!("Failed to read private key file at {:?}", path))?,
        (None, None) => anyhow::bail!("No private key configured"),
    };

    let public_pem = match &config.public_key_base64 {
        Some(encoded) => Some(decode_inline(encoded, "public")?),
        None if config.public_key_path.exists() => Some(
            fs::read(&config.public_key_path).with_context(|| {
                format!(
                    "Failed to read public key file at {:?}",
                    config.public_key_path
                )
            })?,
        ),
        None => None,
    };

    let key = match public_pem {
        Some(public_pem) => KeyMaterial::from_pem_pair(&private_pem, &public_pem, config.algorithm)
            .context("Failed to import key pair")?,
        None => {
            debug!("No public key found, deriving it from the private key");
            KeyMaterial::import_private(&private_pem, config.algorithm)
                .context("Failed to import private key")?
        }
    };
    info!(
        "Loaded {}-bit signing key for {}",
        key.modulus_bits(),
        key.algorithm()
    );
    Ok(key)
}

/// Loads the verification-only public key described by the configuration
pub fn load_verifying_key(config: &KeysConfig) -> Result<KeyMaterial> {
    let pem = match &config.public_key_base64 {
        Some(encoded) => decode_inline(encoded, "public")?,
        None => fs::read(&config.public_key_path).with_context(|| {
            format!(
                "Failed to read public key file at {:?}",
                config.public_key_path
            )
        })?,
    };
    let key = KeyMaterial::import_public(&pem, config.algorithm)
        .context("Failed to import public key")?;
    info!(
        "Loaded {}-bit verifying key for {}",
        key.modulus_bits(),
        key.algorithm()
    );
    Ok(key)
}

fn decode_inline(encoded: &str, name: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .with_context(|| format!("Inline {} key is not valid base64", name))
}
