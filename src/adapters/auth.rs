use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::state::AppState, application::error::ApplicationError,
    domain::models::account::Account,
};

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub tier: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn issue_token(account: &Account, secret: &str) -> Result<String, ApplicationError> {
    let now = Utc::now();
    let claims = Claims {
        sub: account.id,
        tier: account.tier.as_str().to_string(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApplicationError::InternalError(format!("Failed to sign token: {}", e)))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApplicationError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| ApplicationError::Unauthorized)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn account_from_parts(
    parts: &Parts,
    state: &AppState,
) -> Result<Account, ApplicationError> {
    let token = bearer_token(&parts.headers).ok_or(ApplicationError::Unauthorized)?;
    let claims = verify_token(token, &state.config.jwt_secret)?;

    state
        .account_repository
        .find_by_id(claims.sub)
        .await?
        .ok_or(ApplicationError::Unauthorized)
}

/// Rejects the request with 401 unless a valid bearer token resolves to an
/// existing account.
pub struct AuthAccount(pub Account);

impl FromRequestParts<AppState> for AuthAccount {
    type Rejection = ApplicationError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        account_from_parts(parts, state).await.map(AuthAccount)
    }
}

/// Anonymous-friendly variant: a missing, malformed or stale token yields
/// `None` instead of failing the request. Upload accepts both kinds of
/// caller.
pub struct MaybeAuthAccount(pub Option<Account>);

impl FromRequestParts<AppState> for MaybeAuthAccount {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthAccount(
            account_from_parts(parts, state).await.ok(),
        ))
    }
}
