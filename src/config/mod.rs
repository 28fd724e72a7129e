// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the token services
//!
//! This module loads, validates and saves the settings consumed around the
//! token lifecycle: where the key pair lives, how tokens are issued, and what
//! the verifier accepts. The configuration is backed by a YAML file and
//! validated against an embedded JSON schema.
//!
//! ## Configuration Structure
//!
//! - `keys`: key file locations, key strength and bound algorithm
//! - `issuance`: issuer name, token lifetime and header type
//! - `verification`: allowed algorithms, expected issuer, required claims
//!
//! ## Usage
//!
//! ```no_run
//! use rust_token_auth::config::Config;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file("config.yaml").unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(Some("Auth-1".to_string()), Some(3600), None, None);
//!
//! let policy = config.verification_policy().unwrap();
//! println!("Trusted issuer: {:?}", policy.issuer());
//! ```

pub mod issuance;
pub mod keys;
pub mod utils;
pub mod verification;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::auth::VerificationPolicy;

pub use issuance::IssuanceConfig;
pub use keys::KeysConfig;
pub use utils::{output_config_schema, validate_specific_rules};
pub use verification::VerificationConfig;

/// Embedded JSON schema for the configuration file
pub(crate) const CONFIG_SCHEMA: &str = include_str!("../../resources/config.schema.json");

/// Root configuration structure
///
/// Every section falls back to its defaults when absent, so an empty file is
/// a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Key pair location and strength
    #[serde(default)]
    pub keys: KeysConfig,

    /// Settings used when minting tokens
    #[serde(default)]
    pub issuance: IssuanceConfig,

    /// Settings used when verifying tokens
    #[serde(default)]
    pub verification: VerificationConfig,
}

impl Config {
    /// Write a default configuration next to `path` for the user to edit
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let sample_path = path.as_ref().with_extension("sample.yaml");
        debug!("Creating sample configuration file at {:?}", sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with default values. A file that fails
    /// schema or rule validation is rejected and a `*.sample.yaml` with
    /// defaults is written next to it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;
        let config = match Self::from_yaml_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration validation error: {:#}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(err.context(format!("Invalid configuration in {}", path.display())));
            }
        };

        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let yaml_value: serde_yml::Value =
            serde_yml::from_str(contents).context("Failed to parse YAML configuration")?;
        let json_value = serde_json::to_value(&yaml_value)
            .context("Failed to convert YAML to JSON for validation")?;

        let schema: serde_json::Value =
            serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;
        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating configuration against schema");
        if let Err(error) = validator.validate(&json_value) {
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config =
            serde_yml::from_str(contents).context("Failed to deserialize configuration")?;

        validate_specific_rules(&config)?;
        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Override configuration values from the command line
    ///
    /// Only the provided values replace what was loaded.
    ///
    /// # Parameters
    ///
    /// * `issuer` - Issuer name written into tokens (and expected by the verifier
    ///   when no explicit verification issuer is configured)
    /// * `lifetime_secs` - Token lifetime in seconds
    /// * `private_key_path` - PKCS#8 PEM private key file
    /// * `public_key_path` - SPKI PEM public key file
    pub fn apply_args(
        &mut self,
        issuer: Option<String>,
        lifetime_secs: Option<u64>,
        private_key_path: Option<PathBuf>,
        public_key_path: Option<PathBuf>,
    ) {
        if let Some(issuer) = issuer {
            debug!("Overriding issuer from command line: {}", issuer);
            self.issuance.issuer = issuer;
        }
        if let Some(lifetime) = lifetime_secs {
            debug!("Overriding token lifetime from command line: {}s", lifetime);
            self.issuance.lifetime_secs = lifetime;
        }
        if let Some(path) = private_key_path {
            debug!("Overriding private key path from command line: {:?}", path);
            self.keys.private_key_path = Some(path);
            self.keys.private_key_base64 = None;
        }
        if let Some(path) = public_key_path {
            debug!("Overriding public key path from command line: {:?}", path);
            self.keys.public_key_path = path;
            self.keys.public_key_base64 = None;
        }
    }

    /// Verification policy described by this configuration
    pub fn verification_policy(&self) -> Result<VerificationPolicy> {
        self.verification
            .to_policy(&self.issuance.issuer)
            .context("Invalid verification policy")
    }
}
