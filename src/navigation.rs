use std::{collections::HashSet, sync::LazyLock};

use crate::policy::AccessPolicyTable;

/// How a protected leaf is gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Any authenticated identity may render the leaf.
    Authenticated,
    /// The leaf is gated by its entry in the access policy table.
    Policy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLeaf {
    pub segment: String,
    pub gate: Gate,
}

/// Result of matching a request path against the navigation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    Public,
    /// The protected root itself (the dashboard layout).
    ProtectedRoot,
    Leaf(&'a NavLeaf),
    /// Under the protected root, but not a declared leaf.
    UnknownProtected,
    /// Outside both subtrees.
    Unknown,
}

/// NavigationTree
///
/// The declared route structure of the portal: a public subtree that needs no
/// identity, and a protected subtree rooted at `protected_root` whose leaves are
/// gated either by authentication alone or by the access policy table.
#[derive(Debug, Clone)]
pub struct NavigationTree {
    login: String,
    landing: String,
    protected_root: String,
    public: Vec<String>,
    leaves: Vec<NavLeaf>,
}

impl NavigationTree {
    /// Creates a tree whose public subtree already contains `landing` and `login`.
    pub fn new(
        landing: impl Into<String>,
        login: impl Into<String>,
        protected_root: impl Into<String>,
    ) -> Self {
        let landing = landing.into();
        let login = login.into();
        Self {
            public: vec![landing.clone(), login.clone()],
            login,
            landing,
            protected_root: protected_root.into(),
            leaves: Vec::new(),
        }
    }

    pub fn public(mut self, path: impl Into<String>) -> Self {
        self.public.push(path.into());
        self
    }

    pub fn leaf(mut self, segment: impl Into<String>, gate: Gate) -> Self {
        self.leaves.push(NavLeaf {
            segment: segment.into(),
            gate,
        });
        self
    }

    /// The hospital portal's navigation tree, built once per process.
    pub fn hospital() -> &'static NavigationTree {
        &HOSPITAL_NAVIGATION
    }

    pub fn login_path(&self) -> &str {
        &self.login
    }

    pub fn landing_path(&self) -> &str {
        &self.landing
    }

    pub fn protected_root(&self) -> &str {
        &self.protected_root
    }

    pub fn public_paths(&self) -> impl Iterator<Item = &str> {
        self.public.iter().map(String::as_str)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &NavLeaf> {
        self.leaves.iter()
    }

    pub fn leaf_for(&self, segment: &str) -> Option<&NavLeaf> {
        self.leaves.iter().find(|leaf| leaf.segment == segment)
    }

    /// Full path of a protected leaf, e.g. `/dashboard/doctor`.
    pub fn path_of(&self, segment: &str) -> String {
        format!("{}/{}", self.protected_root, segment)
    }

    /// classify
    ///
    /// Matches a request path (no query string) against the tree. Trailing slashes are
    /// ignored, except for the root path `/` itself.
    pub fn classify(&self, path: &str) -> RouteMatch<'_> {
        let path = normalize(path);

        if path == self.protected_root {
            return RouteMatch::ProtectedRoot;
        }

        if let Some(segment) = path
            .strip_prefix(self.protected_root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
        {
            return match self.leaf_for(segment) {
                Some(leaf) => RouteMatch::Leaf(leaf),
                None => RouteMatch::UnknownProtected,
            };
        }

        if self.public.iter().any(|p| p == path) {
            return RouteMatch::Public;
        }

        RouteMatch::Unknown
    }
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

static HOSPITAL_NAVIGATION: LazyLock<NavigationTree> = LazyLock::new(|| {
    NavigationTree::new("/", "/login", "/dashboard")
        .public("/register")
        .leaf("overview", Gate::Policy)
        .leaf("medical_record", Gate::Policy)
        .leaf("bookings", Gate::Policy)
        .leaf("doctor", Gate::Policy)
        .leaf("payment", Gate::Policy)
        .leaf("payment/history", Gate::Policy)
        .leaf("storehouse", Gate::Policy)
        .leaf("users", Gate::Policy)
});

/// A drift between the access policy table and the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyIssue {
    #[error("policy entry `{0}` has no route in the navigation tree")]
    UnroutedPolicyEntry(String),
    #[error("policy-gated route `{0}` has no policy entry")]
    MissingPolicyEntry(String),
    #[error("route `{0}` is open to any authenticated user but also has a policy entry")]
    OpenLeafWithPolicy(String),
    #[error("route `{0}` is declared more than once")]
    DuplicateLeaf(String),
}

/// check_consistency
///
/// Compares the policy table keys with the protected leaves of the navigation tree.
/// Every policy entry must be routed, every policy-gated leaf must have an entry, and a
/// leaf declared open must not also carry an entry (route and menu would disagree).
pub fn check_consistency(
    table: &AccessPolicyTable,
    tree: &NavigationTree,
) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for leaf in tree.leaves() {
        if !seen.insert(leaf.segment.as_str()) {
            issues.push(ConsistencyIssue::DuplicateLeaf(leaf.segment.clone()));
            continue;
        }
        match (leaf.gate, table.contains(&leaf.segment)) {
            (Gate::Policy, false) => {
                issues.push(ConsistencyIssue::MissingPolicyEntry(leaf.segment.clone()))
            }
            (Gate::Authenticated, true) => {
                issues.push(ConsistencyIssue::OpenLeafWithPolicy(leaf.segment.clone()))
            }
            _ => {}
        }
    }

    for key in table.keys() {
        if !seen.contains(key) {
            issues.push(ConsistencyIssue::UnroutedPolicyEntry(key.to_string()));
        }
    }

    issues
}
