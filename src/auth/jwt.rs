use crate::models::Claims;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Signs a fresh session token for the employee; the returned claims carry the new `jti`.
pub fn generate_session_token(
    employee_id: i64,
    name: String,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    let claims = Claims {
        sub: name,
        employee_id,
        exp: now() as usize + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-session-secret-0123456789";

    #[test]
    fn issued_tokens_verify_with_the_same_secret() {
        let (token, claims) = generate_session_token(7, "john_doe".into(), SECRET, 60).unwrap();
        let decoded = verify_token(&token, SECRET).unwrap();

        assert_eq!(decoded.employee_id, 7);
        assert_eq!(decoded.sub, "john_doe");
        assert_eq!(decoded.jti, claims.jti);
        assert!(verify_token(&token, "another-secret-entirely-000").is_err());
    }

    #[test]
    fn every_token_gets_its_own_jti() {
        let (_, a) = generate_session_token(1, "a".into(), SECRET, 60).unwrap();
        let (_, b) = generate_session_token(1, "a".into(), SECRET, 60).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let claims = Claims {
            sub: "old".into(),
            employee_id: 1,
            exp: (now() - 3600) as usize,
            jti: "expired".into(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let (token, _) = generate_session_token(1, "a".into(), SECRET, 60).unwrap();
        let mut forged = token.clone();
        forged.push('x');
        assert!(verify_token(&forged, SECRET).is_err());
    }
}
