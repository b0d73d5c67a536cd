use super::*;
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";

fn make_token(secret: &str, claims: &SessionClaims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn test_validate_session_jwt_success() {
    let my_claims = SessionClaims {
        sub: "user_2abc".to_string(),
        email: Some("test@example.com".to_string()),
        plan: Some("elite".to_string()),
        exp: 9999999999, // far future
    };

    let token = make_token(SECRET, &my_claims);

    let claims = validate_session_jwt(&token, SECRET).expect("Valid token should pass");
    assert_eq!(claims.sub, my_claims.sub);
    assert_eq!(claims.email, my_claims.email);
    assert_eq!(claims.plan.as_deref(), Some("elite"));
}

#[test]
fn test_validate_session_jwt_expired() {
    let my_claims = SessionClaims {
        sub: "user_2abc".to_string(),
        email: Some("test@example.com".to_string()),
        plan: None,
        exp: 1, // past
    };

    let token = make_token(SECRET, &my_claims);

    let result = validate_session_jwt(&token, SECRET);
    assert!(result.is_err());
}

#[test]
fn test_validate_session_jwt_invalid_signature() {
    let my_claims = SessionClaims {
        sub: "user_2abc".to_string(),
        email: Some("test@example.com".to_string()),
        plan: Some("gold".to_string()),
        exp: 9999999999,
    };

    let token = make_token("wrongsecret", &my_claims);

    let result = validate_session_jwt(&token, SECRET);
    assert!(result.is_err());
}

#[test]
fn test_plan_claim_is_optional() {
    let my_claims = SessionClaims {
        sub: "user_2abc".to_string(),
        email: None,
        plan: None,
        exp: 9999999999,
    };

    let token = make_token(SECRET, &my_claims);

    let claims = validate_session_jwt(&token, SECRET).expect("Valid token should pass");
    assert_eq!(claims.plan, None);
}
