use hospital_portal::{
    Access, AccessPolicyTable, AliasPolicy, IdentityResolver, MemoryCredentialStore,
    NavigationTree, Role, RoleSet, RouteGuard,
    auth::Claims,
    check_consistency,
    navigation::{ConsistencyIssue, Gate},
    policy::{Icon, PolicyError, ProtectedResource, hospital_resources},
};
use jsonwebtoken::{EncodingKey, Header, encode};

fn session(role: Role) -> MemoryCredentialStore {
    let claims = Claims {
        role: Some(role.as_str().to_string()),
        ..Claims::default()
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"issuer-secret"),
    )
    .unwrap();
    MemoryCredentialStore::new().with_token(token)
}

// --- Table Invariants ---

#[test]
fn test_every_policy_entry_has_a_non_empty_role_set() {
    let table = AccessPolicyTable::hospital();
    assert!(!table.is_empty());
    for key in table.keys() {
        let roles = table.roles_for(key).unwrap();
        assert!(!roles.is_empty(), "{key} has no allowed roles");
    }
}

#[test]
fn test_unlisted_resource_is_not_gated() {
    assert!(AccessPolicyTable::hospital().roles_for("lobby").is_none());
}

#[test]
fn test_billing_policy_is_canonical() {
    let table = AccessPolicyTable::hospital();
    let expected: RoleSet = [
        Role::GeneralUser,
        Role::Registration,
        Role::Finance,
        Role::OrgAdmin,
        Role::GlobalAdmin,
    ]
    .into_iter()
    .collect();

    assert_eq!(table.roles_for("payment"), Some(&expected));
    assert_eq!(table.roles_for("payment/history"), Some(&expected));
}

#[test]
fn test_construction_rejects_empty_role_sets() {
    let result = AccessPolicyTable::new(vec![ProtectedResource::new(
        "audit",
        "Audit",
        Icon::FileText,
        Vec::<Role>::new(),
    )]);
    assert_eq!(result.unwrap_err(), PolicyError::EmptyRoleSet("audit".into()));
}

#[test]
fn test_construction_rejects_duplicate_and_invalid_keys() {
    let mut resources = hospital_resources();
    resources.push(ProtectedResource::new(
        "doctor",
        "Doctor Again",
        Icon::Stethoscope,
        [Role::Doctor],
    ));
    assert_eq!(
        AccessPolicyTable::new(resources).unwrap_err(),
        PolicyError::DuplicateKey("doctor".into())
    );

    let result = AccessPolicyTable::new(vec![ProtectedResource::new(
        "/users",
        "Users",
        Icon::Settings,
        [Role::OrgAdmin],
    )]);
    assert_eq!(result.unwrap_err(), PolicyError::InvalidKey("/users".into()));
}

// --- Guard Agreement ---

#[test]
fn test_membership_exactly_determines_admission() {
    let table = AccessPolicyTable::hospital();
    let tree = NavigationTree::hospital();
    let guard = RouteGuard::new(IdentityResolver::new(AliasPolicy::Strict), table, tree);

    for resource in table.iter() {
        let path = tree.path_of(&resource.key);
        for role in Role::ALL {
            let access = guard.evaluate(&path, &session(role));
            let admitted = matches!(access, Access::Granted(_));
            assert_eq!(
                admitted,
                resource.allowed_roles.contains(&role),
                "{role} on {path}: {access:?}"
            );
            if !admitted {
                assert!(matches!(access, Access::Forbidden(_)));
            }
        }
    }
}

// --- Consistency Check ---

#[test]
fn test_hospital_policy_and_navigation_agree() {
    let issues = check_consistency(AccessPolicyTable::hospital(), NavigationTree::hospital());
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn test_new_resource_without_route_is_flagged() {
    let mut resources = hospital_resources();
    resources.push(ProtectedResource::new(
        "audit",
        "Audit Trail",
        Icon::FileText,
        [Role::GlobalAdmin],
    ));
    let table = AccessPolicyTable::new(resources).unwrap();

    let issues = check_consistency(&table, NavigationTree::hospital());
    assert_eq!(
        issues,
        vec![ConsistencyIssue::UnroutedPolicyEntry("audit".into())]
    );
}

#[test]
fn test_gated_route_without_policy_and_open_route_with_policy_are_flagged() {
    let table = AccessPolicyTable::new(vec![
        ProtectedResource::new("overview", "Overview", Icon::Home, Role::ALL),
        ProtectedResource::new("users", "Users", Icon::Settings, [Role::GlobalAdmin]),
    ])
    .unwrap();

    let tree = NavigationTree::new("/", "/login", "/dashboard")
        .leaf("overview", Gate::Authenticated)
        .leaf("users", Gate::Policy)
        .leaf("reports", Gate::Policy);

    let issues = check_consistency(&table, &tree);
    assert_eq!(
        issues,
        vec![
            ConsistencyIssue::OpenLeafWithPolicy("overview".into()),
            ConsistencyIssue::MissingPolicyEntry("reports".into()),
        ]
    );
}

#[test]
fn test_duplicate_leaf_is_flagged() {
    let table = AccessPolicyTable::new(vec![ProtectedResource::new(
        "users",
        "Users",
        Icon::Settings,
        [Role::GlobalAdmin],
    )])
    .unwrap();
    let tree = NavigationTree::new("/", "/login", "/dashboard")
        .leaf("users", Gate::Policy)
        .leaf("users", Gate::Policy);

    assert_eq!(
        check_consistency(&table, &tree),
        vec![ConsistencyIssue::DuplicateLeaf("users".into())]
    );
}
