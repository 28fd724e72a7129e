// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Verification policy
//!
//! A policy is a pure input to verification: built once, never mutated.
//! Whatever the caller asks for, `exp` is always a required claim, and an
//! expected issuer makes `iss` required as well.

use std::collections::BTreeSet;

use super::algorithm::SigningAlgorithm;
use super::error::PolicyError;

/// Which tokens a verifier is willing to trust
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationPolicy {
    allowed_algorithms: BTreeSet<SigningAlgorithm>,
    issuer: Option<String>,
    required_claims: BTreeSet<String>,
    leeway_secs: u64,
    allowed_roles: Option<BTreeSet<String>>,
}

impl VerificationPolicy {
    pub fn builder() -> VerificationPolicyBuilder {
        VerificationPolicyBuilder::default()
    }

    pub fn allows(&self, algorithm: SigningAlgorithm) -> bool {
        self.allowed_algorithms.contains(&algorithm)
    }

    pub fn allowed_algorithms(&self) -> &BTreeSet<SigningAlgorithm> {
        &self.allowed_algorithms
    }

    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// Required claim names, in a stable order
    pub fn required_claims(&self) -> &BTreeSet<String> {
        &self.required_claims
    }

    /// Tolerated clock skew for `exp` and `nbf`
    pub fn leeway_secs(&self) -> u64 {
        self.leeway_secs
    }

    pub fn allowed_roles(&self) -> Option<&BTreeSet<String>> {
        self.allowed_roles.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct VerificationPolicyBuilder {
    allowed_algorithms: BTreeSet<SigningAlgorithm>,
    issuer: Option<String>,
    required_claims: BTreeSet<String>,
    leeway_secs: u64,
    allowed_roles: Option<BTreeSet<String>>,
}

impl VerificationPolicyBuilder {
    pub fn allow(mut self, algorithm: SigningAlgorithm) -> Self {
        self.allowed_algorithms.insert(algorithm);
        self
    }

    pub fn allow_all(mut self, algorithms: impl IntoIterator<Item = SigningAlgorithm>) -> Self {
        self.allowed_algorithms.extend(algorithms);
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn require(mut self, claim: impl Into<String>) -> Self {
        self.required_claims.insert(claim.into());
        self
    }

    pub fn require_all<I, S>(mut self, claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_claims.extend(claims.into_iter().map(Into::into));
        self
    }

    pub fn leeway_secs(mut self, seconds: u64) -> Self {
        self.leeway_secs = seconds;
        self
    }

    /// Restrict the `role` claim to the given values; `role` becomes required
    pub fn allowed_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(mut self) -> Result<VerificationPolicy, PolicyError> {
        if self.allowed_algorithms.is_empty() {
            return Err(PolicyError::NoAllowedAlgorithms);
        }
        if self.required_claims.iter().any(|name| name.trim().is_empty()) {
            return Err(PolicyError::EmptyClaimName);
        }

        self.required_claims.insert("exp".to_string());
        if self.issuer.is_some() {
            self.required_claims.insert("iss".to_string());
        }
        if let Some(roles) = &self.allowed_roles {
            if roles.is_empty() {
                return Err(PolicyError::EmptyRoleAllowList);
            }
            self.required_claims.insert("role".to_string());
        }

        Ok(VerificationPolicy {
            allowed_algorithms: self.allowed_algorithms,
            issuer: self.issuer,
            required_claims: self.required_claims,
            leeway_secs: self.leeway_secs,
            allowed_roles: self.allowed_roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_needs_an_algorithm() {
        let err = VerificationPolicy::builder().issuer("Auth-1").build().unwrap_err();
        assert_eq!(err, PolicyError::NoAllowedAlgorithms);
    }

    #[test]
    fn test_exp_and_iss_are_implied() {
        let policy = VerificationPolicy::builder()
            .allow(SigningAlgorithm::RS256)
            .issuer("Auth-1")
            .require("role")
            .build()
            .unwrap();
        let required: Vec<_> = policy.required_claims().iter().map(String::as_str).collect();
        assert_eq!(required, vec!["exp", "iss", "role"]);
        assert!(policy.allows(SigningAlgorithm::RS256));
        assert!(!policy.allows(SigningAlgorithm::PS256));
    }

    #[test]
    fn test_role_allow_list_requires_role() {
        let policy = VerificationPolicy::builder()
            .allow(SigningAlgorithm::RS256)
            .allowed_roles(["EDITOR", "ADMIN"])
            .build()
            .unwrap();
        assert!(policy.required_claims().contains("role"));
        assert_eq!(policy.allowed_roles().map(|r| r.len()), Some(2));

        let err = VerificationPolicy::builder()
            .allow(SigningAlgorithm::RS256)
            .allowed_roles(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert_eq!(err, PolicyError::EmptyRoleAllowList);
    }

    #[test]
    fn test_blank_claim_names_are_rejected() {
        let err = VerificationPolicy::builder()
            .allow(SigningAlgorithm::RS256)
            .require(" ")
            .build()
            .unwrap_err();
        assert_eq!(err, PolicyError::EmptyClaimName);
    }
}
