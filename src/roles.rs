use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;

/// Role
///
/// The closed set of user categories known to the portal. This enumeration is the
/// single canonical source of role spellings: the policy table, the menu, the overview
/// fan-out and the credential parser all reference roles by value through this type.
///
/// The wire spelling (JWT claim, profile record, JSON responses) is the snake_case
/// variant name, e.g. `general_user` or `org_admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    /// Patients and walk-in users. The least privileged role and the resolution fallback.
    GeneralUser,
    Registration,
    Doctor,
    Finance,
    Storekeeper,
    OrgAdmin,
    GlobalAdmin,
}

/// A set of roles permitted to reach a resource. Ordered so that serialized output is stable.
pub type RoleSet = BTreeSet<Role>;

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 7] = [
        Role::GeneralUser,
        Role::Registration,
        Role::Doctor,
        Role::Finance,
        Role::Storekeeper,
        Role::OrgAdmin,
        Role::GlobalAdmin,
    ];

    /// The role assumed when no credential source yields one.
    pub const LEAST_PRIVILEGED: Role = Role::GeneralUser;

    pub fn as_str(self) -> &'static str {
        match self {
            Role::GeneralUser => "general_user",
            Role::Registration => "registration",
            Role::Doctor => "doctor",
            Role::Finance => "finance",
            Role::Storekeeper => "storekeeper",
            Role::OrgAdmin => "org_admin",
            Role::GlobalAdmin => "global_admin",
        }
    }

    /// label
    ///
    /// Human readable name shown in the account management table and the session badge.
    pub fn label(self) -> &'static str {
        match self {
            Role::GeneralUser => "Patient",
            Role::Registration => "Registration Clerk",
            Role::Doctor => "Doctor",
            Role::Finance => "Finance",
            Role::Storekeeper => "Storekeeper",
            Role::OrgAdmin => "Organization Administrator",
            Role::GlobalAdmin => "Global Administrator",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::OrgAdmin | Role::GlobalAdmin)
    }

    /// Convenience constructor for a role set containing every role.
    pub fn all() -> RoleSet {
        Role::ALL.into_iter().collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

/// Strict parsing: only canonical spellings are accepted. Legacy spellings go through
/// [`AliasPolicy`] instead.
impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// AliasPolicy
///
/// Controls whether historical role spellings found in old credentials and profile
/// records are mapped onto canonical roles. Under `Strict` an unrecognised spelling is
/// simply "no role from this source". Under `Legacy` the known aliases are accepted and
/// every mapping is logged at warn level so that the stale data can be tracked down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasPolicy {
    #[default]
    Strict,
    Legacy,
}

/// Historical spellings observed in issued credentials, mapped to their canonical role.
const LEGACY_ALIASES: &[(&str, Role)] = &[
    ("doc", Role::Doctor),
    ("fin", Role::Finance),
    ("money", Role::Finance),
    ("store", Role::Storekeeper),
    ("sto", Role::Storekeeper),
];

impl AliasPolicy {
    /// parse
    ///
    /// Resolves a raw role string into a canonical `Role`, applying the alias step when
    /// the policy allows it. Returns `None` for anything unrecognised.
    pub fn parse(self, raw: &str) -> Option<Role> {
        let raw = raw.trim();
        if let Ok(role) = raw.parse::<Role>() {
            return Some(role);
        }

        match self {
            AliasPolicy::Strict => None,
            AliasPolicy::Legacy => {
                let role = LEGACY_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == raw)
                    .map(|(_, role)| *role)?;
                tracing::warn!(alias = raw, canonical = %role, "legacy role alias applied");
                Some(role)
            }
        }
    }
}

impl FromStr for AliasPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(AliasPolicy::Strict),
            "legacy" => Ok(AliasPolicy::Legacy),
            other => Err(format!("unknown alias policy `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_spellings_round_trip_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn serde_spelling_matches_as_str() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn strict_policy_rejects_aliases() {
        assert_eq!(AliasPolicy::Strict.parse("doc"), None);
        assert_eq!(AliasPolicy::Strict.parse("nurse"), None);
        assert_eq!(AliasPolicy::Strict.parse("doctor"), Some(Role::Doctor));
    }

    #[test]
    fn legacy_policy_maps_known_aliases_only() {
        assert_eq!(AliasPolicy::Legacy.parse("doc"), Some(Role::Doctor));
        assert_eq!(AliasPolicy::Legacy.parse("money"), Some(Role::Finance));
        assert_eq!(AliasPolicy::Legacy.parse("sto"), Some(Role::Storekeeper));
        assert_eq!(AliasPolicy::Legacy.parse("nurse"), None);
    }
}
