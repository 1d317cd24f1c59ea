use axum::http::StatusCode;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorMessage, HttpError};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn create_token(
    user_id: &str,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if user_id.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::minutes(expires_in_minutes)).timestamp() as usize;
    let claims = TokenClaims {
        sub: user_id.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<String, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    );

    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(_) => Err(HttpError::new(
            ErrorMessage::InvalidToken.to_string(),
            StatusCode::UNAUTHORIZED,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn token_round_trip_returns_subject() {
        let user_id = uuid::Uuid::new_v4().to_string();
        let token = create_token(&user_id, SECRET, 60).unwrap();
        let sub = decode_token(token, SECRET).unwrap();
        assert_eq!(sub, user_id);
    }

    #[test]
    fn empty_subject_is_rejected() {
        assert!(create_token("", SECRET, 60).is_err());
    }

    #[test]
    fn wrong_secret_fails_decode() {
        let token = create_token("some-user", SECRET, 60).unwrap();
        let result = decode_token(token, b"other-secret");
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn expired_token_fails_decode() {
        let token = create_token("some-user", SECRET, -5).unwrap();
        assert!(decode_token(token, SECRET).is_err());
    }
}
