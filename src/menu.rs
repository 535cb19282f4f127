use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    navigation::NavigationTree,
    policy::{AccessPolicyTable, Icon, ProtectedResource},
    roles::Role,
};

/// project_menu
///
/// The menu entries visible to `role`: a stable filter over the table's menu entries,
/// in declaration order. The returned iterator is cheap to clone, so the projection can
/// be walked more than once. Nothing is memoised; a role change after re-login is
/// reflected by the next call.
pub fn project_menu(
    table: &AccessPolicyTable,
    role: Role,
) -> impl Iterator<Item = &ProtectedResource> + Clone {
    table
        .iter()
        .filter(move |resource| resource.in_menu && resource.allows(role))
}

/// MenuItem
///
/// A menu entry as sent to the frontend sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MenuItem {
    pub key: String,
    pub path: String,
    pub label: String,
    pub icon: Icon,
}

pub fn menu_items(table: &AccessPolicyTable, tree: &NavigationTree, role: Role) -> Vec<MenuItem> {
    project_menu(table, role)
        .map(|resource| MenuItem {
            key: resource.key.clone(),
            path: tree.path_of(&resource.key),
            label: resource.label.clone(),
            icon: resource.icon,
        })
        .collect()
}
