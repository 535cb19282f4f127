use crate::{
    auth::CredentialStore,
    identity::{Identity, IdentityResolver},
    navigation::{Gate, NavigationTree, RouteMatch},
    policy::AccessPolicyTable,
    roles::RoleSet,
};

/// Outcome of a guarded navigation.
///
/// The denied outcomes are distinct: `Unauthenticated` sends the user to
/// the login entry point, `Forbidden` and `NotFound` send them to the landing route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The target is in the public subtree; no identity is needed.
    Public,
    /// The destination may render for this identity.
    Granted(Identity),
    /// No credential at all.
    Unauthenticated,
    /// Logged in, but the role is not allowed on the target.
    Forbidden(Identity),
    /// The target is not part of the navigation tree.
    NotFound,
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted(_) | Access::Public)
    }
}

/// RouteGuard
///
/// The navigation-time enforcement point. Evaluation is a synchronous, pure decision:
/// it resolves the identity from the credential store, looks up the required roles of
/// the target and returns an `Access`. It never mutates the identity or the policy, and
/// it runs before the destination view is invoked, so a denied view never fetches data.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard<'a> {
    resolver: IdentityResolver,
    policy: &'a AccessPolicyTable,
    tree: &'a NavigationTree,
}

impl<'a> RouteGuard<'a> {
    pub fn new(
        resolver: IdentityResolver,
        policy: &'a AccessPolicyTable,
        tree: &'a NavigationTree,
    ) -> Self {
        Self {
            resolver,
            policy,
            tree,
        }
    }

    /// check
    ///
    /// The two gates of a protected destination. Without a required-role set, any
    /// identity is admitted; with one, the identity's role must be a member.
    pub fn check(identity: Option<Identity>, required: Option<&RoleSet>) -> Access {
        let Some(identity) = identity else {
            return Access::Unauthenticated;
        };

        match required {
            Some(roles) if !roles.contains(&identity.role) => Access::Forbidden(identity),
            _ => Access::Granted(identity),
        }
    }

    /// The role set a protected leaf requires, or `None` when authentication suffices.
    pub fn required_roles(&self, segment: &str) -> Option<&'a RoleSet> {
        match self.tree.leaf_for(segment).map(|leaf| leaf.gate) {
            Some(Gate::Authenticated) => None,
            _ => self.policy.roles_for(segment),
        }
    }

    /// evaluate
    ///
    /// Decides a navigation to `path` for the session held by `store`.
    pub fn evaluate<S>(&self, path: &str, store: &S) -> Access
    where
        S: CredentialStore + ?Sized,
    {
        let access = match self.tree.classify(path) {
            RouteMatch::Public => Access::Public,
            RouteMatch::Unknown => Access::NotFound,
            RouteMatch::ProtectedRoot => Self::check(self.resolver.resolve(store), None),
            RouteMatch::Leaf(leaf) => Self::check(
                self.resolver.resolve(store),
                self.required_roles(&leaf.segment),
            ),
            RouteMatch::UnknownProtected => match self.resolver.resolve(store) {
                Some(_) => Access::NotFound,
                None => Access::Unauthenticated,
            },
        };

        match &access {
            Access::Unauthenticated => tracing::debug!(path, "navigation without credential"),
            Access::Forbidden(identity) => {
                tracing::debug!(path, role = %identity.role, "navigation denied for role")
            }
            Access::NotFound => tracing::debug!(path, "navigation to undeclared route"),
            Access::Public | Access::Granted(_) => {}
        }

        access
    }

    /// Where a denied navigation is sent. `None` for admitted navigations.
    pub fn redirect_target(&self, access: &Access) -> Option<&'a str> {
        match access {
            Access::Unauthenticated => Some(self.tree.login_path()),
            Access::Forbidden(_) | Access::NotFound => Some(self.tree.landing_path()),
            Access::Public | Access::Granted(_) => None,
        }
    }
}
