// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Token Verifier
//!
//! Checks a bearer token against the public key and the verification policy
//! of `config.yaml`, then prints its header and claims as JSON.
//!
//! The token is read from, in order: `--authorization` (a full
//! `Authorization` header value), `--query` (a URL query string carrying a
//! `token` parameter), or the positional argument.
//!
//! A rejected token prints `unauthenticated` and exits with status 1. Run
//! with `RUST_LOG=warn` or higher to see which stage rejected it.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use rust_token_auth::auth::{
    extract_bearer_token, token_from_query, unix_now, TokenVerifier, Unauthenticated,
};
use rust_token_auth::config::Config;
use rust_token_auth::utility::load_verifying_key;

/// Verify a signed bearer token
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Public key PEM file (overrides config)
    #[clap(long)]
    public_key: Option<PathBuf>,

    /// Verify at this Unix timestamp instead of the current time
    #[clap(long)]
    at: Option<i64>,

    /// Full `Authorization` header value, e.g. "Bearer eyJ..."
    #[clap(long, conflicts_with_all = ["query", "token"])]
    authorization: Option<String>,

    /// URL query string carrying a `token` parameter
    #[clap(long, conflicts_with = "token")]
    query: Option<String>,

    /// Compact token
    token: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let verifier = match build_verifier(&args) {
        Ok(verifier) => verifier,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    };

    match verify(&args, &verifier) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            println!("{}", e);
            process::exit(1);
        }
    }
}

fn build_verifier(args: &Args) -> Result<TokenVerifier> {
    let mut config = Config::from_file(&args.config)?;
    config.apply_args(None, None, None, args.public_key.clone());

    let key = load_verifying_key(&config.keys)?;
    let policy = config.verification_policy()?;
    Ok(TokenVerifier::new(Arc::new(key), policy))
}

fn verify(args: &Args, verifier: &TokenVerifier) -> Result<String, Unauthenticated> {
    let token = match (&args.authorization, &args.query, &args.token) {
        (Some(header), _, _) => extract_bearer_token(header).map(str::to_string),
        (None, Some(query), _) => token_from_query(query),
        (None, None, token) => token.clone(),
    }
    .ok_or_else(|| {
        warn!("No bearer token supplied");
        Unauthenticated
    })?;

    let verified = verifier
        .verify_detailed_at(&token, args.at.unwrap_or_else(unix_now))
        .map_err(|e| {
            warn!(
                "Token rejected at {} stage [{}]: {}",
                e.stage(),
                e.kind(),
                e
            );
            Unauthenticated
        })?;

    render(&verified.header, &verified.claims).map_err(|e| {
        warn!("Cannot render verified token: {:#}", e);
        Unauthenticated
    })
}

fn render(
    header: &impl serde::Serialize,
    claims: &impl serde::Serialize,
) -> Result<String> {
    let document = serde_json::json!({
        "header": header,
        "claims": claims,
    });
    serde_json::to_string_pretty(&document).context("Failed to format token as JSON")
}
