use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::{
    config::AppConfig,
    identity::{Identity, IdentityResolver},
};

/// Cookie holding the persisted credential token.
pub const TOKEN_COOKIE: &str = "token";
/// Cookie holding the persisted profile record (percent-encoded JSON).
pub const PROFILE_COOKIE: &str = "user";
/// Header carrying the persisted profile record (JSON) for non-browser clients.
pub const PROFILE_HEADER: &str = "x-user-profile";

/// Claims
///
/// The payload embedded in the credential token issued by the authentication service.
/// Only `role` drives access decisions; the remaining claims are surfaced on the
/// resolved identity for display.
///
/// The token is decoded locally WITHOUT signature verification. The trust boundary is
/// the server that issued it, which verifies the signature on every business API call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Expiration Time (exp), seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// StoredProfile
///
/// The profile record persisted next to the token at login time. It can go stale
/// relative to the token (e.g. after a role change), which is why it is only the
/// second source in the resolution order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredProfile {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// decode_claims
///
/// Decodes the claims segment of a JWT-shaped token. Signature, expiry, audience and
/// required-claim checks are all disabled: this is a read of the embedded payload,
/// not an authentication step.
///
/// The token must still be a well-formed three-segment JWT whose header names an
/// algorithm `jsonwebtoken` knows. A two-segment token or an `alg: none` header is an
/// error here even though its payload is readable, and resolution falls back to the
/// profile or the default role.
pub fn decode_claims(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// CredentialStore
///
/// Read-only access to the locally persisted credential and profile record. Identity
/// resolution only ever goes through this capability, so it can be driven from request
/// headers in the server and from plain values in tests.
pub trait CredentialStore {
    /// The raw credential token, if one is persisted.
    fn token(&self) -> Option<String>;
    /// The raw (JSON) profile record, if one is persisted.
    fn profile(&self) -> Option<String>;
}

/// MemoryCredentialStore
///
/// A `CredentialStore` holding plain values.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    token: Option<String>,
    profile: Option<String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn set_profile(&mut self, profile: Option<String>) {
        self.profile = profile;
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    fn profile(&self) -> Option<String> {
        self.profile.clone()
    }
}

/// RequestCredentials
///
/// The credentials carried by an incoming request. The token is read from the
/// `Authorization: Bearer` header first and from the `token` cookie second; the
/// profile from the `x-user-profile` header first and from the `user` cookie second.
/// Empty values count as absent.
///
/// Extraction never fails: a request without credentials simply yields an empty store,
/// and the decision about what that means belongs to the guard.
#[derive(Debug, Clone, Default)]
pub struct RequestCredentials {
    token: Option<String>,
    profile: Option<String>,
}

impl RequestCredentials {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let jar = CookieJar::from_headers(headers);

        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);
        let token = bearer
            .or_else(|| jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()))
            .filter(|t| !t.trim().is_empty());

        let profile = headers
            .get(PROFILE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| jar.get(PROFILE_COOKIE).map(|c| c.value().to_string()))
            .filter(|p| !p.trim().is_empty());

        Self { token, profile }
    }
}

impl CredentialStore for RequestCredentials {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    fn profile(&self) -> Option<String> {
        self.profile.clone()
    }
}

impl<S> FromRequestParts<S> for RequestCredentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestCredentials::from_headers(&parts.headers))
    }
}

/// CurrentIdentity Extractor
///
/// Resolves the identity of the caller for the JSON API. Unlike dashboard navigation,
/// which redirects, an API call without a credential is rejected with
/// StatusCode::UNAUTHORIZED (401).
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        let credentials = RequestCredentials::from_headers(&parts.headers);

        IdentityResolver::new(config.role_aliases)
            .resolve(&credentials)
            .map(CurrentIdentity)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
