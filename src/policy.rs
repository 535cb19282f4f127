use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::LazyLock};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::roles::{Role, RoleSet};

/// Icon
///
/// Decorative icon reference rendered next to a menu entry. Carries no behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Icon {
    Home,
    UserPlus,
    Stethoscope,
    CreditCard,
    History,
    Package,
    FileText,
    Settings,
}

/// ProtectedResource
///
/// A dashboard route segment (and, when `in_menu` is set, the menu entry pointing at
/// it) together with the roles allowed to reach it. The `key` is the path relative to
/// the dashboard root, e.g. `doctor` for `/dashboard/doctor`.
///
/// `data_path` is the business API path, relative to the API base, that the view lists
/// its data from once admitted. It defaults to `dashboard/{key}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedResource {
    pub key: String,
    pub label: String,
    pub icon: Icon,
    pub allowed_roles: RoleSet,
    pub in_menu: bool,
    pub data_path: String,
}

impl ProtectedResource {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        icon: Icon,
        allowed_roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        let key = key.into();
        Self {
            data_path: format!("dashboard/{key}"),
            key,
            label: label.into(),
            icon,
            allowed_roles: allowed_roles.into_iter().collect(),
            in_menu: true,
        }
    }

    /// Overrides the API path the view lists its data from.
    pub fn fetches_from(mut self, data_path: impl Into<String>) -> Self {
        self.data_path = data_path.into();
        self
    }

    /// Keeps the resource routable and gated but out of the navigation menu.
    pub fn hidden_from_menu(mut self) -> Self {
        self.in_menu = false;
        self
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("resource `{0}` has an empty allowed-role set")]
    EmptyRoleSet(String),
    #[error("resource `{0}` is declared more than once")]
    DuplicateKey(String),
    #[error("resource key `{0}` must be a non-empty relative path")]
    InvalidKey(String),
}

/// AccessPolicyTable
///
/// Ordered mapping from resource key to its allowed roles. The declaration order is
/// also the menu order.
///
/// Invariants enforced at construction:
/// - keys are unique, non-empty and relative (no leading or trailing `/`),
/// - every allowed-role set is non-empty.
///
/// Absence of a key means the resource is not gated beyond authentication. The table
/// offers no mutation after construction.
#[derive(Debug, Clone)]
pub struct AccessPolicyTable {
    resources: Vec<ProtectedResource>,
    index: HashMap<String, usize>,
}

impl AccessPolicyTable {
    pub fn new(resources: Vec<ProtectedResource>) -> Result<Self, PolicyError> {
        let mut index = HashMap::with_capacity(resources.len());

        for (position, resource) in resources.iter().enumerate() {
            let key = resource.key.as_str();
            if key.is_empty() || key.starts_with('/') || key.ends_with('/') {
                return Err(PolicyError::InvalidKey(resource.key.clone()));
            }
            if resource.allowed_roles.is_empty() {
                return Err(PolicyError::EmptyRoleSet(resource.key.clone()));
            }
            if index.insert(resource.key.clone(), position).is_some() {
                return Err(PolicyError::DuplicateKey(resource.key.clone()));
            }
        }

        Ok(Self { resources, index })
    }

    /// The canonical policy of the hospital portal, built once per process.
    pub fn hospital() -> &'static AccessPolicyTable {
        &HOSPITAL_POLICY
    }

    /// rolesFor: the allowed roles of `key`, or `None` if the key is not gated.
    pub fn roles_for(&self, key: &str) -> Option<&RoleSet> {
        self.get(key).map(|resource| &resource.allowed_roles)
    }

    pub fn get(&self, key: &str) -> Option<&ProtectedResource> {
        self.index.get(key).map(|&position| &self.resources[position])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtectedResource> + Clone {
        self.resources.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|resource| resource.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

static HOSPITAL_POLICY: LazyLock<AccessPolicyTable> = LazyLock::new(|| {
    AccessPolicyTable::new(hospital_resources())
        .expect("the built-in hospital policy table must be valid")
});

/// hospital_resources
///
/// The portal's resources in menu order.
///
/// Billing: payment and its history are open to patients, registration clerks,
/// finance and administrators, matching what the billing API accepts.
pub fn hospital_resources() -> Vec<ProtectedResource> {
    use Role::*;

    let billing = [GeneralUser, Registration, Finance, OrgAdmin, GlobalAdmin];

    vec![
        ProtectedResource::new("overview", "Overview", Icon::Home, Role::ALL)
            .fetches_from("dashboard/stats"),
        ProtectedResource::new(
            "bookings",
            "Bookings",
            Icon::UserPlus,
            [GeneralUser, Registration, OrgAdmin, GlobalAdmin],
        ),
        ProtectedResource::new(
            "doctor",
            "Doctor Workstation",
            Icon::Stethoscope,
            [Doctor, OrgAdmin, GlobalAdmin],
        )
        .fetches_from("dashboard/doctor/patients"),
        ProtectedResource::new("payment", "Payment Center", Icon::CreditCard, billing),
        ProtectedResource::new("payment/history", "Payment History", Icon::History, billing)
            .hidden_from_menu(),
        ProtectedResource::new(
            "storehouse",
            "Storehouse",
            Icon::Package,
            [Storekeeper, OrgAdmin, GlobalAdmin],
        ),
        ProtectedResource::new("medical_record", "Medical Records", Icon::FileText, Role::ALL),
        ProtectedResource::new(
            "users",
            "Account Management",
            Icon::Settings,
            [OrgAdmin, GlobalAdmin],
        ),
    ]
}
