// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use clap::{Arg, ArgMatches, Command};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::TokenCreationError;

/// Structure for handling command-line arguments
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config_path: PathBuf,
    pub subject: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub claims: Vec<String>,
    pub issuer_override: Option<String>,
    pub duration_override: Option<u64>,
    pub quiet: bool,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        let matches = Self::build_cli().get_matches();
        Self::from_matches(&matches)
    }

    /// Build the CLI interface
    fn build_cli() -> Command {
        Command::new("create_token")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Create signed bearer tokens manually")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Path to configuration file")
                    .default_value("config.yaml"),
            )
            .arg(
                Arg::new("subject")
                    .short('s')
                    .long("subject")
                    .value_name("SUBJECT")
                    .help("Value of the `sub` claim")
                    .required(true),
            )
            .arg(
                Arg::new("name")
                    .short('n')
                    .long("name")
                    .value_name("NAME")
                    .help("Display name stored in the `name` claim"),
            )
            .arg(
                Arg::new("role")
                    .short('r')
                    .long("role")
                    .value_name("ROLE")
                    .help("Value of the `role` claim"),
            )
            .arg(
                Arg::new("claim")
                    .long("claim")
                    .value_name("NAME=VALUE")
                    .help("Additional claim; VALUE is parsed as JSON, or kept as a string")
                    .action(clap::ArgAction::Append),
            )
            .arg(
                Arg::new("issuer")
                    .short('i')
                    .long("issuer")
                    .value_name("ISSUER")
                    .help("Issuer name (overrides config)"),
            )
            .arg(
                Arg::new("duration")
                    .short('d')
                    .long("duration")
                    .value_name("SECONDS")
                    .help("Token duration in seconds (overrides config)")
                    .value_parser(clap::value_parser!(u64).range(1..)),
            )
            .arg(
                Arg::new("quiet")
                    .short('q')
                    .long("quiet")
                    .help("Suppress output messages, only token is printed")
                    .action(clap::ArgAction::SetTrue),
            )
    }

    /// Extract arguments from matches
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config.yaml")),
            subject: matches
                .get_one::<String>("subject")
                .cloned()
                .unwrap_or_default(),
            name: matches.get_one::<String>("name").cloned(),
            role: matches.get_one::<String>("role").cloned(),
            claims: matches
                .get_many::<String>("claim")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            issuer_override: matches.get_one::<String>("issuer").cloned(),
            duration_override: matches.get_one::<u64>("duration").copied(),
            quiet: matches.get_flag("quiet"),
        }
    }
}

/// Split a `NAME=VALUE` argument
///
/// `VALUE` is taken as JSON when it parses (`level=3`, `admin=true`,
/// `groups=["a","b"]`), otherwise as a plain string.
pub fn parse_claim_argument(argument: &str) -> Result<(String, Value), TokenCreationError> {
    let (name, raw) = argument
        .split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| TokenCreationError::InvalidClaimArgument {
            argument: argument.to_string(),
        })?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.trim().to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_values_are_json_or_strings() {
        assert_eq!(
            parse_claim_argument("level=3").unwrap(),
            ("level".to_string(), Value::from(3))
        );
        assert_eq!(
            parse_claim_argument("team=blue").unwrap(),
            ("team".to_string(), Value::from("blue"))
        );
        assert_eq!(
            parse_claim_argument("note=a=b").unwrap(),
            ("note".to_string(), Value::from("a=b"))
        );
    }

    #[test]
    fn test_claim_without_name_is_rejected() {
        assert!(parse_claim_argument("=3").is_err());
        assert!(parse_claim_argument("level").is_err());
    }

    #[test]
    fn test_cli_collects_repeated_claims() {
        let matches = CliArgs::build_cli()
            .try_get_matches_from([
                "create_token",
                "-s",
                "22334455",
                "--claim",
                "a=1",
                "--claim",
                "b=2",
                "-q",
            ])
            .unwrap();
        let args = CliArgs::from_matches(&matches);
        assert_eq!(args.subject, "22334455");
        assert_eq!(args.claims, vec!["a=1", "b=2"]);
        assert!(args.quiet);
        assert_eq!(args.duration_override, None);
    }
}
