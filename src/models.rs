use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{identity::Identity, menu::MenuItem, overview::Widget, roles::Role};

// --- Response Schemas (Output) ---

/// SessionResponse
///
/// Output schema for the current session (GET /api/v1/session): the resolved identity
/// plus the human label of its role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionResponse {
    pub identity: Identity,
    pub role_label: String,
}

/// OverviewResponse
///
/// Output schema for the overview fan-out (GET /api/v1/overview).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct OverviewResponse {
    pub role: Role,
    pub widgets: Vec<Widget>,
    /// Statistics endpoint of the business API; absent for roles without statistics.
    pub stats_endpoint: Option<String>,
}

/// DashboardView
///
/// What an admitted dashboard navigation renders: the layout (identity and projected
/// menu) and the view itself. `data_endpoint` is the downstream list endpoint the view
/// fetches from; it is only ever handed out after the guard has approved.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DashboardView {
    pub path: String,
    pub title: String,
    pub identity: Identity,
    pub menu: Vec<MenuItem>,
    /// Overview cards; empty for every other view.
    pub widgets: Vec<Widget>,
    pub data_endpoint: Option<String>,
}

/// PublicPage
///
/// Descriptor of a page in the public subtree (landing, login, registration).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PublicPage {
    pub path: String,
    pub title: String,
}
