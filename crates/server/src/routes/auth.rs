use std::sync::Arc;

use axum::{extract::FromRequestParts, http::{header, request::Parts}};
use axum_extra::extract::cookie::CookieJar;
use catalog::repo::SeaOrmCatalogRepository;
use catalog::repository::CatalogRepository;
use catalog::{CatalogService, ProviderKind, ServiceKind};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::JsonApiError;

/// Cookie consulted when no `Authorization` header is sent.
pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub providers: CatalogService<ProviderKind>,
    pub services: CatalogService<ServiceKind>,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    pub fn new(
        providers: Arc<dyn CatalogRepository<ProviderKind>>,
        services: Arc<dyn CatalogRepository<ServiceKind>>,
        auth: ServerAuthConfig,
    ) -> Self {
        Self { providers: CatalogService::new(providers), services: CatalogService::new(services), auth }
    }

    /// Both catalogs backed by the same SQL store.
    pub fn from_db(db: DatabaseConnection, auth: ServerAuthConfig) -> Self {
        let repo = Arc::new(SeaOrmCatalogRepository::new(db));
        Self::new(repo.clone(), repo, auth)
    }
}

/// JWT payload identifying the authenticated reseller.
#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerClaims {
    pub uid: Uuid,
    pub exp: usize,
}

/// Authenticated owner of the catalog records touched by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerId(pub Uuid);

fn bearer_token(parts: &Parts) -> Result<Option<String>, JsonApiError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else { return Ok(None) };
    let value = value.to_str().map_err(|_| JsonApiError::unauthorized("malformed Authorization header"))?;
    match value.strip_prefix("Bearer ") {
        Some(token) => Ok(Some(token.trim().to_string())),
        None => {
            tracing::warn!(path = %parts.uri.path(), "invalid Authorization format (expect Bearer)");
            Err(JsonApiError::unauthorized("expected a Bearer token"))
        }
    }
}

/// Resolve the owner from `token`, verifying signature and expiry.
pub fn decode_owner(token: &str, secret: &str) -> Result<Uuid, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    decode::<OwnerClaims>(token, &key, &validation).map(|data| data.claims.uid)
}

#[axum::async_trait]
impl FromRequestParts<ServerState> for OwnerId {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts)? {
            Some(t) => t,
            None => CookieJar::from_headers(&parts.headers)
                .get(AUTH_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    tracing::warn!(path = %parts.uri.path(), "missing Authorization header and auth_token cookie");
                    JsonApiError::unauthorized("missing credentials")
                })?,
        };
        decode_owner(&token, &state.auth.jwt_secret).map(OwnerId).map_err(|e| {
            tracing::warn!(path = %parts.uri.path(), err = %e, "token validation failed");
            JsonApiError::unauthorized("invalid or expired token")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(uid: Uuid, exp: usize, secret: &str) -> String {
        encode(&Header::default(), &OwnerClaims { uid, exp }, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn in_an_hour() -> usize { (chrono::Utc::now().timestamp() + 3600) as usize }

    #[test]
    fn decodes_owner_from_valid_token() {
        let uid = Uuid::new_v4();
        assert_eq!(decode_owner(&token(uid, in_an_hour(), "s3cret"), "s3cret").unwrap(), uid);
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let uid = Uuid::new_v4();
        assert!(decode_owner(&token(uid, in_an_hour(), "other"), "s3cret").is_err());
        let expired = (chrono::Utc::now().timestamp() - 3600) as usize;
        assert!(decode_owner(&token(uid, expired, "s3cret"), "s3cret").is_err());
    }
}
