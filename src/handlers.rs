use axum::{
    Extension, Json,
    extract::{Path, State},
    http::Uri,
    response::{IntoResponse, Redirect},
};

use crate::{
    AppState,
    auth::CurrentIdentity,
    identity::Identity,
    menu::{MenuItem, menu_items},
    models::{DashboardView, OverviewResponse, PublicPage, SessionResponse},
    overview::{needs_stats, widgets_for},
    policy::AccessPolicyTable,
    roles::Role,
};

/// Key of the overview view, whose data comes from the statistics endpoint.
const OVERVIEW_KEY: &str = "overview";

/// data_endpoint
///
/// The downstream endpoint a dashboard view fetches from once admitted, taken from the
/// view's policy entry. The overview only reads statistics for roles that display them,
/// and a view without a policy entry has no data endpoint.
pub fn data_endpoint(
    api_base: &str,
    policy: &AccessPolicyTable,
    key: &str,
    role: Role,
) -> Option<String> {
    if key == OVERVIEW_KEY && !needs_stats(role) {
        return None;
    }
    policy
        .get(key)
        .map(|resource| format!("{api_base}/{}", resource.data_path))
}

// --- Public Handlers ---

/// public_page
///
/// [Public Route] Describes a page of the public subtree. No identity is resolved.
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Public page", body = PublicPage))
)]
pub async fn public_page(uri: Uri) -> Json<PublicPage> {
    let path = uri.path().to_string();
    let title = match path.as_str() {
        "/login" => "Sign in",
        "/register" => "Register",
        _ => "Hospital Portal",
    };
    Json(PublicPage {
        path,
        title: title.to_string(),
    })
}

/// fallback
///
/// Any path outside the navigation tree goes back to the landing route.
pub async fn fallback(State(state): State<AppState>) -> impl IntoResponse {
    Redirect::to(state.navigation.landing_path())
}

// --- Authenticated API Handlers ---

/// get_session
///
/// [Authenticated Route] The identity resolved from the caller's credentials.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "No credential")
    )
)]
pub async fn get_session(CurrentIdentity(identity): CurrentIdentity) -> Json<SessionResponse> {
    let role_label = identity.role.label().to_string();
    Json(SessionResponse {
        identity,
        role_label,
    })
}

/// get_menu
///
/// [Authenticated Route] The navigation menu projected for the caller's role.
#[utoipa::path(
    get,
    path = "/api/v1/menu",
    responses(
        (status = 200, description = "Visible menu entries", body = [MenuItem]),
        (status = 401, description = "No credential")
    )
)]
pub async fn get_menu(
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
) -> Json<Vec<MenuItem>> {
    Json(menu_items(state.policy, state.navigation, identity.role))
}

/// get_overview
///
/// [Authenticated Route] The overview cards for the caller's role.
#[utoipa::path(
    get,
    path = "/api/v1/overview",
    responses(
        (status = 200, description = "Overview widgets", body = OverviewResponse),
        (status = 401, description = "No credential")
    )
)]
pub async fn get_overview(
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
) -> Json<OverviewResponse> {
    let role = identity.role;
    Json(OverviewResponse {
        role,
        widgets: widgets_for(role).to_vec(),
        stats_endpoint: data_endpoint(
            &state.config.api_base,
            state.policy,
            OVERVIEW_KEY,
            role,
        ),
    })
}

// --- Guarded Dashboard Handlers ---

/// dashboard_home
///
/// [Guarded Route] The dashboard layout without a selected view. Only reached after
/// the guard middleware admitted the navigation and stored the identity.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard layout", body = DashboardView),
        (status = 303, description = "Redirect to login")
    )
)]
pub async fn dashboard_home(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Json<DashboardView> {
    Json(DashboardView {
        path: state.navigation.protected_root().to_string(),
        title: "Dashboard".to_string(),
        menu: menu_items(state.policy, state.navigation, identity.role),
        identity,
        widgets: Vec::new(),
        data_endpoint: None,
    })
}

/// dashboard_view
///
/// [Guarded Route] A dashboard view. The guard middleware has already checked the
/// identity against the view's allowed roles.
#[utoipa::path(
    get,
    path = "/dashboard/{segment}",
    params(("segment" = String, Path, description = "View key, e.g. `doctor`")),
    responses(
        (status = 200, description = "Admitted view", body = DashboardView),
        (status = 303, description = "Redirect to login or landing")
    )
)]
pub async fn dashboard_view(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(segment): Path<String>,
) -> Json<DashboardView> {
    let key = segment.trim_end_matches('/');
    let role = identity.role;

    let title = state
        .policy
        .get(key)
        .map(|resource| resource.label.clone())
        .unwrap_or_else(|| key.to_string());

    let widgets = if key == OVERVIEW_KEY {
        widgets_for(role).to_vec()
    } else {
        Vec::new()
    };

    Json(DashboardView {
        path: state.navigation.path_of(key),
        title,
        menu: menu_items(state.policy, state.navigation, role),
        widgets,
        data_endpoint: data_endpoint(&state.config.api_base, state.policy, key, role),
        identity,
    })
}
