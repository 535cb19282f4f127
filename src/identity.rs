use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    auth::{Claims, CredentialStore, StoredProfile, decode_claims},
    roles::{AliasPolicy, Role},
};

/// Display name used when neither the profile nor the credential carries one.
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// Where the resolved role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RoleSource {
    Credential,
    Profile,
    Default,
}

/// Identity
///
/// The resolved current-session principal. Identities are rebuilt from the persisted
/// credential on every resolution and never cached, so a re-login is reflected on the
/// very next navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Identity {
    pub role: Role,
    pub display_name: String,
    pub role_source: RoleSource,
    pub user_id: Option<u64>,
    pub org_id: Option<u64>,
    #[ts(type = "string | null")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// IdentityResolver
///
/// Turns the contents of a `CredentialStore` into a role (and an `Identity`).
///
/// Role resolution order, first success wins:
/// 1. the `role` claim of the credential token,
/// 2. the `role` field of the profile record,
/// 3. `Role::GeneralUser`.
///
/// A source that is missing, cannot be decoded, or carries an unrecognised role is
/// skipped. Resolution never fails and never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver {
    aliases: AliasPolicy,
}

impl IdentityResolver {
    pub fn new(aliases: AliasPolicy) -> Self {
        Self { aliases }
    }

    pub fn resolve_role<S>(&self, store: &S) -> Role
    where
        S: CredentialStore + ?Sized,
    {
        let claims = store.token().and_then(|t| read_claims(&t));
        let profile = store.profile().and_then(|p| read_profile(&p));
        self.pick_role(claims.as_ref(), profile.as_ref()).0
    }

    /// resolve
    ///
    /// Builds the full identity. Returns `None` when no credential token is persisted at
    /// all, which is the only condition treated as "not logged in". A token whose
    /// payload cannot be decoded still counts as a session; its role falls back to the
    /// profile or the default.
    pub fn resolve<S>(&self, store: &S) -> Option<Identity>
    where
        S: CredentialStore + ?Sized,
    {
        let token = store.token()?;
        let claims = read_claims(&token);
        let profile = store.profile().and_then(|p| read_profile(&p));

        let (role, role_source) = self.pick_role(claims.as_ref(), profile.as_ref());

        let display_name = profile
            .as_ref()
            .and_then(|p| p.username.clone())
            .or_else(|| claims.as_ref().and_then(|c| c.username.clone()))
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());

        Some(Identity {
            role,
            display_name,
            role_source,
            user_id: claims
                .as_ref()
                .and_then(|c| c.user_id)
                .or_else(|| profile.as_ref().and_then(|p| p.id)),
            org_id: claims.as_ref().and_then(|c| c.org_id),
            expires_at: claims
                .as_ref()
                .and_then(|c| c.exp)
                .and_then(|exp| DateTime::from_timestamp(exp, 0)),
        })
    }

    fn pick_role(
        &self,
        claims: Option<&Claims>,
        profile: Option<&StoredProfile>,
    ) -> (Role, RoleSource) {
        if let Some(role) = claims
            .and_then(|c| c.role.as_deref())
            .and_then(|raw| self.parse(raw, "credential"))
        {
            return (role, RoleSource::Credential);
        }

        if let Some(role) = profile
            .and_then(|p| p.role.as_deref())
            .and_then(|raw| self.parse(raw, "profile"))
        {
            return (role, RoleSource::Profile);
        }

        (Role::LEAST_PRIVILEGED, RoleSource::Default)
    }

    fn parse(&self, raw: &str, source: &'static str) -> Option<Role> {
        let role = self.aliases.parse(raw);
        if role.is_none() {
            tracing::debug!(source, role = raw, "ignoring unrecognised role");
        }
        role
    }
}

fn read_claims(token: &str) -> Option<Claims> {
    match decode_claims(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "credential payload could not be decoded");
            None
        }
    }
}

fn read_profile(raw: &str) -> Option<StoredProfile> {
    match serde_json::from_str::<StoredProfile>(raw) {
        Ok(profile) => Some(profile),
        Err(e) => {
            tracing::debug!(error = %e, "profile record could not be parsed");
            None
        }
    }
}
