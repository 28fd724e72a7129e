// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-token-auth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

mod common;

use common::*;
use rust_token_auth::auth::{unix_now, Authenticator, Unauthenticated};

#[test]
fn test_header_and_query_carry_the_same_token() {
    setup();
    let token = signer().sign(&editor_claims(unix_now())).unwrap();
    let authenticator = Authenticator::new(verifier());

    let header = format!("Bearer {}", token);
    let from_header = authenticator
        .authenticate_request(Some(&header), None)
        .unwrap();
    assert_eq!(from_header.role(), Some("EDITOR"));

    let query = format!("page=1&token={}", token);
    let from_query = authenticator.authenticate_request(None, Some(&query)).unwrap();
    assert_eq!(from_query, from_header);
}

#[test]
fn test_header_wins_over_query() {
    setup();
    let token = signer().sign(&editor_claims(unix_now())).unwrap();
    let authenticator = Authenticator::new(verifier());

    let query = format!("token={}", token);
    assert_eq!(
        authenticator.authenticate_request(Some("Basic dXNlcjpwYXNz"), Some(&query)),
        Err(Unauthenticated)
    );
}

#[test]
fn test_every_failure_looks_the_same() {
    setup();
    let authenticator = Authenticator::new(verifier());

    let expired = signer().sign(&editor_claims(NOW)).unwrap();
    let foreign = rust_token_auth::auth::TokenSigner::new(key_b())
        .unwrap()
        .sign(&editor_claims(unix_now()))
        .unwrap();

    for token in [expired.as_str(), foreign.as_str(), "not-a-token"] {
        let err = authenticator.authenticate(token).unwrap_err();
        assert_eq!(err.to_string(), "unauthenticated");
    }
    assert_eq!(
        authenticator.authenticate_request(None, None),
        Err(Unauthenticated)
    );
}
