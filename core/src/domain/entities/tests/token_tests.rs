//! Unit tests for token claims

use chrono::Duration;

use crate::domain::entities::{Claims, Role, TokenType};
use crate::errors::TokenError;

#[test]
fn test_claims_new() {
    let claims = Claims::new(42, vec![Role::User], TokenType::Access, Duration::minutes(15), "keystone");

    assert_eq!(claims.sub, "42");
    assert_eq!(claims.iss, "keystone");
    assert_eq!(claims.typ, TokenType::Access);
    assert_eq!(claims.exp - claims.iat, 15 * 60);
    assert_eq!(claims.account_id().unwrap(), 42);
}

#[test]
fn test_claims_have_unique_ids() {
    let a = Claims::new(1, vec![], TokenType::Refresh, Duration::days(1), "keystone");
    let b = Claims::new(1, vec![], TokenType::Refresh, Duration::days(1), "keystone");
    assert_ne!(a.jti, b.jti);
}

#[test]
fn test_claims_bad_subject() {
    let mut claims = Claims::new(1, vec![], TokenType::Access, Duration::minutes(1), "keystone");
    claims.sub = "not-a-number".to_string();
    assert!(matches!(claims.account_id(), Err(TokenError::Malformed)));
}

#[test]
fn test_claims_roles() {
    let claims = Claims::new(
        1,
        vec![Role::User, Role::Moderator],
        TokenType::Access,
        Duration::minutes(1),
        "keystone",
    );
    assert!(claims.has_role(Role::Moderator));
    assert!(!claims.has_role(Role::Admin));
}

#[test]
fn test_claims_serialize_lowercase_enums() {
    let claims = Claims::new(1, vec![Role::Admin], TokenType::Refresh, Duration::minutes(1), "keystone");
    let json = serde_json::to_value(&claims).unwrap();
    assert_eq!(json["typ"], "refresh");
    assert_eq!(json["roles"][0], "admin");
}
