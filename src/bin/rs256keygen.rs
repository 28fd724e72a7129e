// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Key Pair Generator
//!
//! Generates an RSA key pair bound to one signature scheme and writes it as
//! PEM files: PKCS#8 for the private key (owner-only permissions on Unix) and
//! SubjectPublicKeyInfo for the public key.
//!
//! ## Usage
//!
//! ```text
//! rs256keygen [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `--out-pub-key <PATH>`: public key PEM file (default: "./keys/public.pem")
//! - `--out-private-key <PATH>`: private key PEM file (default: "./keys/private.pem")
//! - `--length <BITS>`: RSA modulus length, 2048 to 4096 (default: 2048)
//! - `--algorithm <ALG>`: RS256, RS384, RS512, PS256, PS384 or PS512 (default: RS256)
//!
//! The algorithm only matters for the self-check performed after generation;
//! the PEM files themselves do not record it. Configure the same algorithm in
//! `keys.algorithm` of `config.yaml`.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use rust_token_auth::auth::{
    unix_now, ClaimSet, KeyMaterial, SigningAlgorithm, TokenSigner, TokenVerifier,
    VerificationPolicy, DEFAULT_MODULUS_BITS,
};
use rust_token_auth::utility::write_key_pair;

/// Generate an RSA key pair for signing bearer tokens
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Output path for the public key PEM file (SubjectPublicKeyInfo)
    #[clap(long, default_value = "./keys/public.pem")]
    out_pub_key: PathBuf,

    /// Output path for the private key PEM file (PKCS#8)
    #[clap(long, default_value = "./keys/private.pem")]
    out_private_key: PathBuf,

    /// RSA key length in bits
    #[clap(long, default_value_t = DEFAULT_MODULUS_BITS)]
    length: usize,

    /// Signature scheme the pair will be used with
    #[clap(long, default_value = "RS256")]
    algorithm: SigningAlgorithm,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    println!(
        "Generating RSA key pair with {} bits for {}...",
        args.length, args.algorithm
    );

    let generating = Arc::new(AtomicBool::new(true));
    let generating_clone = generating.clone();

    let spinner_handle = thread::spawn(move || {
        let spinner_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        let mut i = 0;
        while generating_clone.load(Ordering::Relaxed) {
            print!("\r{} Generating RSA key... ", spinner_chars[i]);
            io::stdout().flush().ok();
            i = (i + 1) % spinner_chars.len();
            thread::sleep(Duration::from_millis(100));
        }
        print!("\r                                  \r");
        io::stdout().flush().ok();
    });

    let generated = KeyMaterial::generate(args.length, args.algorithm);

    generating.store(false, Ordering::Relaxed);
    spinner_handle.join().ok();

    let key = Arc::new(generated.context("Failed to generate RSA key pair")?);
    println!("RSA key pair generation completed successfully.");

    self_check(&key).context("Generated key pair failed its sign/verify self-check")?;

    write_key_pair(&key, &args.out_private_key, &args.out_pub_key)?;

    println!("Private key written to: {:?}", args.out_private_key);
    println!("Public key written to: {:?}", args.out_pub_key);
    println!();
    println!("To embed them in config.yaml instead of using the files, Base64 encode them with:");
    println!("cat {} | base64 -w0", args.out_private_key.display());
    println!("cat {} | base64 -w0", args.out_pub_key.display());

    Ok(())
}

/// Sign a throwaway token and verify it with the public half only
fn self_check(key: &Arc<KeyMaterial>) -> Result<()> {
    let now = unix_now();
    let claims = ClaimSet::builder()
        .subject("rs256keygen")
        .issued_at(now)
        .expires_in(60)
        .build()?;
    let token = TokenSigner::new(key.clone())?.sign(&claims)?;

    let policy = VerificationPolicy::builder()
        .allow(key.algorithm())
        .build()?;
    TokenVerifier::new(Arc::new(key.public_only()), policy).verify_at(token.as_str(), now)?;
    debug!("Self-check token verified");
    Ok(())
}
