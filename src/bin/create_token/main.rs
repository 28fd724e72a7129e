// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

mod cli;
mod error;

use std::process;
use std::sync::Arc;

use cli::{parse_claim_argument, CliArgs};
use error::TokenCreationError;
use log::debug;
use rust_token_auth::auth::{unix_now, ClaimSet, Token, TokenSigner};
use rust_token_auth::config::Config;
use rust_token_auth::utility::load_signing_key;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run() -> Result<(), TokenCreationError> {
    let args = CliArgs::parse();

    let mut config = Config::from_file(&args.config_path)
        .map_err(|source| TokenCreationError::ConfigError { source })?;
    config.apply_args(
        args.issuer_override.clone(),
        args.duration_override,
        None,
        None,
    );

    let key = load_signing_key(&config.keys)
        .map_err(|source| TokenCreationError::KeyLoadingError { source })?;
    let signer = TokenSigner::new(Arc::new(key))?.with_token_type(config.issuance.token_type.clone());

    let mut builder = config.issuance.claims_for(args.subject.clone(), unix_now());
    if let Some(name) = &args.name {
        builder = builder.claim("name", name.clone());
    }
    if let Some(role) = &args.role {
        builder = builder.claim("role", role.clone());
    }
    for argument in &args.claims {
        let (name, value) = parse_claim_argument(argument)?;
        builder = builder.claim(name, value);
    }
    let claims = builder.build()?;
    debug!("Signing claims for subject {}", args.subject);

    let token = signer.sign(&claims)?;

    if args.quiet {
        print!("{}", token);
    } else {
        print_full_results(&claims, &token, signer.header().alg.as_str());
    }

    Ok(())
}

fn print_full_results(claims: &ClaimSet, token: &Token, algorithm: &str) {
    println!("✅ Token created successfully!");
    println!("👤 Subject: {}", claims.sub.as_deref().unwrap_or_default());
    println!("🏢 Issuer: {}", claims.iss.as_deref().unwrap_or_default());
    println!("🔐 Algorithm: {}", algorithm);
    if let (Some(iat), Some(exp)) = (claims.iat, claims.exp) {
        println!("⏱️  Duration: {} seconds", exp - iat);
    }
    if let Some(role) = claims.role() {
        println!("🔑 Role: {}", role);
    }
    println!("🎫 Token: {}", token);
}
