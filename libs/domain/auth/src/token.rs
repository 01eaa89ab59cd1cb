// [libs/domain/auth/src/token.rs]
use crate::errors::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims carried by both access and refresh tokens. `kind` distinguishes
/// the two so a refresh token cannot be replayed as a bearer access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id, stringified (JWT `sub` is conventionally a string).
    pub sub: String,
    /// Expiration, seconds since epoch.
    pub exp: i64,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// `"access"` or `"refresh"`.
    pub kind: String,
}

/// An issued access/refresh pair, returned by `POST /token/pair`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and verifies HS256-signed bearer tokens. Holds the signing secret
/// and the two token lifetimes; one instance is constructed at startup from
/// `JWT_SIGNING_SECRET`, `JWT_ACCESS_TOKEN_TTL_MINUTES`, `JWT_REFRESH_TOKEN_TTL_DAYS`
/// and shared across request handlers.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(signing_secret: &str, access_ttl_minutes: i64, refresh_ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(signing_secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(refresh_ttl_days),
        }
    }

    /// Issues a fresh access/refresh pair for `user_id`.
    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue(user_id, "access", self.access_ttl)?,
            refresh_token: self.issue(user_id, "refresh", self.refresh_ttl)?,
        })
    }

    /// Issues a new access token from a previously verified refresh token's subject.
    pub fn issue_access_token(&self, user_id: i64) -> Result<String, AuthError> {
        self.issue(user_id, "access", self.access_ttl)
    }

    fn issue(&self, user_id: i64, kind: &str, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            kind: kind.to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|_| AuthError::InvalidToken)
    }

    /// Verifies a bearer token of either kind and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verifies an access token specifically, rejecting a refresh token presented
    /// at the bearer-auth boundary.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.verify(token)?;
        if claims.kind != "access" {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    /// Verifies a refresh token specifically, for `POST /token/refresh`.
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.verify(token)?;
        if claims.kind != "refresh" {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-signing-secret", 30, 7)
    }

    #[test]
    fn issues_and_verifies_an_access_token() {
        let svc = service();
        let pair = svc.issue_pair(42).unwrap();
        let claims = svc.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.kind, "access");
    }

    #[test]
    fn rejects_a_refresh_token_presented_as_access() {
        let svc = service();
        let pair = svc.issue_pair(1).unwrap();
        assert!(svc.verify_access_token(&pair.refresh_token).is_err());
    }

    #[test]
    fn refresh_token_can_mint_a_new_access_token() {
        let svc = service();
        let pair = svc.issue_pair(7).unwrap();
        let refresh_claims = svc.verify_refresh_token(&pair.refresh_token).unwrap();
        let user_id: i64 = refresh_claims.sub.parse().unwrap();
        let new_access = svc.issue_access_token(user_id).unwrap();
        assert_eq!(svc.verify_access_token(&new_access).unwrap().sub, "7");
    }

    #[test]
    fn rejects_a_token_signed_with_a_different_secret() {
        let svc_a = TokenService::new("secret-a", 30, 7);
        let svc_b = TokenService::new("secret-b", 30, 7);
        let pair = svc_a.issue_pair(1).unwrap();
        assert!(svc_b.verify_access_token(&pair.access_token).is_err());
    }
}
