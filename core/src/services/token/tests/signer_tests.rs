//! Unit tests for JWT signing and validation

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use ca_shared::config::JwtConfig;

use super::mocks::{jwt_config, signer, ISSUER, SECRET};
use crate::domain::entities::token::{Claims, TokenType};
use crate::errors::{DomainError, TokenError};
use crate::services::token::JwtSigner;

fn claims_expiring_in(seconds: i64) -> Claims {
    let mut claims = Claims::new_access_token(
        "u1",
        "a@b.com",
        "admin",
        None,
        ISSUER,
        Utc::now() - Duration::minutes(30),
        Duration::minutes(15),
    );
    claims.exp = Utc::now().timestamp() + seconds;
    claims
}

#[test]
fn test_generate_then_validate_round_trip() {
    let signer = signer();
    let issued = signer
        .generate_access_token("u1", "a@b.com", "admin", Some(""))
        .unwrap();

    let claims = signer.validate_token(&issued.token).unwrap();
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.email, "a@b.com");
    assert_eq!(claims.role, "admin");
    assert_eq!(claims.school_id, None);
    assert_eq!(claims.iss, ISSUER);
    assert_eq!(claims.jti, issued.jti);
    assert_eq!(claims.expires_at(), issued.expires_at);
    assert!(claims.exp > claims.iat);
    assert_eq!(claims.exp - claims.iat, 15 * 60);
}

#[test]
fn test_school_claim_is_carried() {
    let signer = signer();
    let issued = signer
        .generate_access_token("u1", "a@b.com", "staff", Some("school-7"))
        .unwrap();
    let claims = signer.validate_token(&issued.token).unwrap();
    assert_eq!(claims.school_id.as_deref(), Some("school-7"));
}

#[test]
fn test_issuer_mismatch() {
    let issued = signer()
        .generate_access_token("u1", "a@b.com", "admin", None)
        .unwrap();

    let other = JwtSigner::new(&JwtConfig::new(SECRET, "other")).unwrap();
    assert_eq!(other.validate_token(&issued.token), Err(TokenError::IssuerMismatch));
}

#[test]
fn test_wrong_secret_is_invalid_signature() {
    let issued = signer()
        .generate_access_token("u1", "a@b.com", "admin", None)
        .unwrap();

    let other = JwtSigner::new(&JwtConfig::new("ffffffffffffffffffffffffffffffff", ISSUER)).unwrap();
    assert_eq!(other.validate_token(&issued.token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_expiry_boundary() {
    let signer = signer();

    let still_valid = signer.sign(&claims_expiring_in(5)).unwrap();
    assert!(signer.validate_token(&still_valid).is_ok());

    let just_expired = signer.sign(&claims_expiring_in(-5)).unwrap();
    assert_eq!(signer.validate_token(&just_expired), Err(TokenError::Expired));
}

#[test]
fn test_not_yet_valid() {
    let signer = signer();
    let mut claims = claims_expiring_in(600);
    claims.nbf = Utc::now().timestamp() + 120;

    let token = signer.sign(&claims).unwrap();
    assert_eq!(signer.validate_token(&token), Err(TokenError::NotYetValid));
}

#[test]
fn test_none_algorithm_is_rejected() {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims_expiring_in(600)).unwrap());
    let token = format!("{}.{}.", header, payload);

    assert_eq!(signer().validate_token(&token), Err(TokenError::AlgorithmMismatch));
}

#[test]
fn test_other_hmac_algorithm_is_rejected() {
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims_expiring_in(600),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(signer().validate_token(&token), Err(TokenError::AlgorithmMismatch));
}

#[test]
fn test_garbage_is_malformed() {
    let signer = signer();
    assert_eq!(signer.validate_token("not-a-token"), Err(TokenError::Malformed));
    assert_eq!(signer.validate_token(""), Err(TokenError::Malformed));
    assert_eq!(signer.validate_token("a.b.c"), Err(TokenError::Malformed));
}

#[test]
fn test_metadata_survives_expiry() {
    let signer = signer();
    let claims = claims_expiring_in(-3600);
    let token = signer.sign(&claims).unwrap();

    assert_eq!(signer.validate_token(&token), Err(TokenError::Expired));
    assert_eq!(signer.token_id(&token).unwrap(), claims.jti);
    assert_eq!(signer.expiration_time(&token).unwrap(), claims.expires_at());
}

#[test]
fn test_metadata_of_garbage_fails() {
    assert!(signer().token_id("garbage").is_err());
}

#[test]
fn test_refresh_token_is_minimal() {
    let signer = signer();
    let issued = signer.generate_refresh_token("u1").unwrap();
    let claims = signer.validate_token(&issued.token).unwrap();

    assert_eq!(claims.typ, TokenType::Refresh);
    assert_eq!(claims.sub, "u1");
    assert!(claims.email.is_empty());
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
}

#[test]
fn test_short_secret_fails_at_construction() {
    let result = JwtSigner::new(&JwtConfig::new("too-short", ISSUER));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_empty_issuer_fails_at_construction() {
    let result = JwtSigner::new(&JwtConfig::new(SECRET, "  "));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_asymmetric_algorithm_fails_at_construction() {
    let mut config = jwt_config();
    config.algorithm = "RS256".to_string();
    assert!(matches!(JwtSigner::new(&config), Err(DomainError::Configuration { .. })));

    config.algorithm = "none".to_string();
    assert!(JwtSigner::new(&config).is_err());
}
