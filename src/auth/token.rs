//! Admin access tokens
//!
//! HS256 JWTs carrying the account id as `sub` plus a fixed `role` claim.
//! Tokens are stateless: there is no server-side revocation.

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Role claim embedded in every admin token
pub const ADMIN_ROLE: &str = "admin";

/// Claims carried by an admin token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Account id
    pub sub: String,
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl AdminClaims {
    /// Account id carried in `sub`
    pub fn admin_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Token error types
#[derive(Debug)]
pub enum TokenError {
    /// Signing failed
    Encode(jsonwebtoken::errors::Error),

    /// Signature, issuer or time window rejected
    Invalid(jsonwebtoken::errors::Error),

    /// Token verified but does not carry the admin role
    WrongRole(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Encode(e) => write!(f, "Failed to sign token: {}", e),
            TokenError::Invalid(e) => write!(f, "Invalid token: {}", e),
            TokenError::WrongRole(role) => write!(f, "Token role is not admin: {}", role),
        }
    }
}

impl std::error::Error for TokenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TokenError::Encode(e) | TokenError::Invalid(e) => Some(e),
            TokenError::WrongRole(_) => None,
        }
    }
}

/// Issues and verifies admin tokens
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, issuer: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Sign a token for the given account
    pub fn issue(&self, admin_id: i64) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = AdminClaims {
            sub: admin_id.to_string(),
            role: ADMIN_ROLE.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now.saturating_add(self.ttl_secs),
            jti: uuid::Uuid::new_v4().simple().to_string(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)
    }

    /// Verify signature, issuer, time window and role
    pub fn verify(&self, token: &str) -> Result<AdminClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.validate_nbf = true;
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<AdminClaims>(token, &self.decoding_key, &validation)
            .map_err(TokenError::Invalid)?;

        if data.claims.role != ADMIN_ROLE {
            return Err(TokenError::WrongRole(data.claims.role));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", "admin-api", 3600)
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer();
        let token = issuer.issue(42).unwrap();
        assert!(!token.is_empty());

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.admin_id(), Some(42));
        assert_eq!(claims.role, ADMIN_ROLE);
        assert_eq!(claims.iss, "admin-api");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.jti.len(), 32);
    }

    #[test]
    fn test_each_token_has_unique_id() {
        let issuer = issuer();
        let a = issuer.verify(&issuer.issue(1).unwrap()).unwrap();
        let b = issuer.verify(&issuer.issue(1).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issuer().issue(1).unwrap();
        let other = TokenIssuer::new("other-secret", "admin-api", 3600);
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = issuer().issue(1).unwrap();
        let other = TokenIssuer::new("test-secret", "someone-else", 3600);
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let now = Utc::now().timestamp();
        let claims = AdminClaims {
            sub: "1".to_string(),
            role: ADMIN_ROLE.to_string(),
            iss: "admin-api".to_string(),
            iat: now - 7200,
            nbf: now - 7200,
            exp: now - 3600,
            jti: "expired".to_string(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(issuer.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_non_admin_role_rejected() {
        let now = Utc::now().timestamp();
        let claims = AdminClaims {
            sub: "1".to_string(),
            role: "user".to_string(),
            iss: "admin-api".to_string(),
            iat: now,
            nbf: now,
            exp: now + 60,
            jti: "user".to_string(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(issuer().verify(&token), Err(TokenError::WrongRole(role)) if role == "user"));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(issuer().verify("not-a-token").is_err());
    }
}
