//! HS256 JWT validation and issuance

use crate::auth::models::JwtClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tubely_core::AppError;
use uuid::Uuid;

/// Issuer written into access tokens. Tokens without `iss` are accepted.
pub const TOKEN_ISSUER: &str = "tubely-access";

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Mint an access token for `user_id`.
    pub fn issue_token(&self, user_id: Uuid, expires_in: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            iss: Some(TOKEN_ISSUER.to_string()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Token has expired".to_string())
                }
                _ => {
                    tracing::debug!(error = %e, "JWT validation failed");
                    AppError::Unauthorized("Invalid token".to_string())
                }
            },
        )?;

        if let Some(issuer) = data.claims.iss.as_deref() {
            if issuer != TOKEN_ISSUER {
                return Err(AppError::Unauthorized("Invalid token issuer".to_string()));
            }
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-at-least-32-characters";

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let service = JwtService::new(SECRET);
        let user_id = Uuid::new_v4();

        let token = service.issue_token(user_id, Duration::hours(1)).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss.as_deref(), Some(TOKEN_ISSUER));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(SECRET);
        let token = service
            .issue_token(Uuid::new_v4(), Duration::hours(-2))
            .unwrap();

        match service.validate_token(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token has expired"),
            other => panic!("expected expiry error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtService::new(SECRET);
        let verifier = JwtService::new("a-completely-different-secret-of-32-chars");
        let token = issuer.issue_token(Uuid::new_v4(), Duration::hours(1)).unwrap();

        assert!(matches!(
            verifier.validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let service = JwtService::new(SECRET);
        let now = Utc::now();
        let claims = JwtClaims {
            sub: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            iss: Some("someone-else".to_string()),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let service = JwtService::new(SECRET);
        assert!(service.validate_token("not.a.jwt").is_err());
    }
}
