//! Tests for column mapping helpers that need no database

use crate::database::mysql::refresh_token_hash;

#[test]
fn test_refresh_token_hash_is_hex_sha256() {
    let hash = refresh_token_hash("abc");
    assert_eq!(
        hash,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(hash.len(), 64);
}

#[test]
fn test_refresh_token_hash_differs_per_token() {
    assert_ne!(refresh_token_hash("token-a"), refresh_token_hash("token-b"));
    assert_eq!(refresh_token_hash("token-a"), refresh_token_hash("token-a"));
}
