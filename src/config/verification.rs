// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Verification policy settings

use serde::{Deserialize, Serialize};

use crate::auth::{PolicyError, SigningAlgorithm, VerificationPolicy};

fn default_allowed_algorithms() -> Vec<SigningAlgorithm> {
    vec![SigningAlgorithm::RS256]
}

fn default_required_claims() -> Vec<String> {
    vec!["iss".to_string(), "exp".to_string(), "role".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Algorithms a token header may declare
    #[serde(default = "default_allowed_algorithms")]
    pub allowed_algorithms: Vec<SigningAlgorithm>,

    /// Expected `iss`; `None` falls back to the issuance issuer
    #[serde(default)]
    pub issuer: Option<String>,

    /// Claims every token must carry (`exp` is always added)
    #[serde(default = "default_required_claims")]
    pub required_claims: Vec<String>,

    /// Tolerated clock skew in seconds
    #[serde(default)]
    pub leeway_secs: u64,

    /// Optional allow-list for the `role` claim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_roles: Option<Vec<String>>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            allowed_algorithms: default_allowed_algorithms(),
            issuer: None,
            required_claims: default_required_claims(),
            leeway_secs: 0,
            allowed_roles: None,
        }
    }
}

impl VerificationConfig {
    /// Build the policy, using `fallback_issuer` when no issuer is configured here
    pub fn to_policy(&self, fallback_issuer: &str) -> Result<VerificationPolicy, PolicyError> {
        let issuer = self.issuer.as_deref().unwrap_or(fallback_issuer);
        let mut builder = VerificationPolicy::builder()
            .allow_all(self.allowed_algorithms.iter().copied())
            .issuer(issuer)
            .require_all(self.required_claims.iter().cloned())
            .leeway_secs(self.leeway_secs);
        if let Some(roles) = &self.allowed_roles {
            builder = builder.allowed_roles(roles.iter().cloned());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_falls_back_to_issuance() {
        let policy = VerificationConfig::default().to_policy("Auth-1").unwrap();
        assert_eq!(policy.issuer(), Some("Auth-1"));
        assert!(policy.allows(SigningAlgorithm::RS256));
        assert!(policy.required_claims().contains("role"));
    }

    #[test]
    fn test_explicit_issuer_wins() {
        let config = VerificationConfig {
            issuer: Some("Auth-2".to_string()),
            ..VerificationConfig::default()
        };
        assert_eq!(config.to_policy("Auth-1").unwrap().issuer(), Some("Auth-2"));
    }

    #[test]
    fn test_empty_algorithm_list_is_an_error() {
        let config = VerificationConfig {
            allowed_algorithms: Vec::new(),
            ..VerificationConfig::default()
        };
        assert_eq!(
            config.to_policy("Auth-1").unwrap_err(),
            PolicyError::NoAllowedAlgorithms
        );
    }
}
