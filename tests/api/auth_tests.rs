//! Authentication Tests
//!
//! Request validation and token shape tests that run without backing
//! services. End-to-end register/login flows need a live database.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use validator::Validate;

use wellness_server::application::dto::request::{LoginRequest, RegisterRequest};
use wellness_server::application::services::Claims;

fn valid_register() -> RegisterRequest {
    RegisterRequest {
        username: "calmuser".into(),
        email: "calm@example.com".into(),
        password: "ValidPassword123!".into(),
        timezone: Some("Europe/Dublin".into()),
    }
}

#[test]
fn test_register_request_accepts_valid_data() {
    assert!(valid_register().validate().is_ok());
}

#[test]
fn test_register_request_rejects_invalid_email() {
    let mut request = valid_register();
    request.email = "not-an-email".into();
    assert!(request.validate().is_err());
}

#[test]
fn test_register_request_rejects_short_password() {
    let mut request = valid_register();
    request.password = "short".into();
    assert!(request.validate().is_err());
}

#[test]
fn test_register_request_rejects_short_username() {
    let mut request = valid_register();
    request.username = "a".into();
    assert!(request.validate().is_err());
}

#[test]
fn test_login_request_rejects_empty_password() {
    let request = LoginRequest {
        email: "calm@example.com".into(),
        password: "".into(),
    };
    assert!(request.validate().is_err());
}

/// Access token claims survive an encode/decode roundtrip with the
/// same secret, and fail with a different one.
#[test]
fn test_jwt_claims_roundtrip() {
    let secret = b"test-secret-that-is-long-enough!";
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "123456789".to_string(),
        exp: now + 900,
        iat: now,
        jti: Some(uuid::Uuid::new_v4().to_string()),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap();

    let decoded = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .unwrap();
    assert_eq!(decoded.claims.sub, "123456789");

    let wrong = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(b"another-secret-entirely-wrong!!!"),
        &Validation::default(),
    );
    assert!(wrong.is_err());
}
