use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use hospital_portal::{
    AccessPolicyTable, AppConfig, AppState, Role, auth::Claims, create_router,
    handlers::data_endpoint,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tower::ServiceExt;

// --- Helper Functions ---

fn token(role: Role) -> String {
    let claims = Claims {
        role: Some(role.as_str().to_string()),
        ..Claims::default()
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"issuer-secret"),
    )
    .unwrap()
}

fn get(uri: &str, token: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Option<String>) {
    let router = create_router(AppState::hospital(AppConfig::default()));
    let response = router.oneshot(request).await.unwrap();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    (response.status(), location)
}

// --- Dashboard Root ---

#[tokio::test]
async fn test_dashboard_root_with_trailing_slash_requires_login() {
    let (status, location) = send(get("/dashboard/", None)).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_dashboard_root_with_trailing_slash_renders_for_session() {
    let (status, location) = send(get("/dashboard/", Some(token(Role::Doctor)))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
}

#[tokio::test]
async fn test_every_dashboard_view_requires_login() {
    for key in AccessPolicyTable::hospital().keys() {
        let (status, location) = send(get(&format!("/dashboard/{key}"), None)).await;

        assert_eq!(status, StatusCode::SEE_OTHER, "{key}");
        assert_eq!(location.as_deref(), Some("/login"), "{key}");
    }
}

#[tokio::test]
async fn test_every_dashboard_view_renders_for_admin() {
    for key in AccessPolicyTable::hospital().keys() {
        let request = get(&format!("/dashboard/{key}"), Some(token(Role::GlobalAdmin)));
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::OK, "{key}");
    }
}

// --- Data Endpoints ---

#[test]
fn test_data_endpoints_match_business_api() {
    let policy = AccessPolicyTable::hospital();
    let expected = [
        ("overview", "/api/v1/dashboard/stats"),
        ("bookings", "/api/v1/dashboard/bookings"),
        ("doctor", "/api/v1/dashboard/doctor/patients"),
        ("payment", "/api/v1/dashboard/payment"),
        ("payment/history", "/api/v1/dashboard/payment/history"),
        ("storehouse", "/api/v1/dashboard/storehouse"),
        ("medical_record", "/api/v1/dashboard/medical_record"),
        ("users", "/api/v1/dashboard/users"),
    ];

    assert_eq!(policy.len(), expected.len());
    for (key, endpoint) in expected {
        assert_eq!(
            data_endpoint("/api/v1", policy, key, Role::GlobalAdmin).as_deref(),
            Some(endpoint),
            "{key}"
        );
    }
}

#[test]
fn test_overview_has_no_endpoint_without_statistics() {
    let policy = AccessPolicyTable::hospital();

    assert!(data_endpoint("/api/v1", policy, "overview", Role::GeneralUser).is_none());
    assert_eq!(
        data_endpoint("/api/v1", policy, "overview", Role::Finance).as_deref(),
        Some("/api/v1/dashboard/stats")
    );
}

#[test]
fn test_undeclared_view_has_no_endpoint() {
    let policy = AccessPolicyTable::hospital();
    assert!(data_endpoint("/api/v1", policy, "pharmacy", Role::GlobalAdmin).is_none());
}
