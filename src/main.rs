use anyhow::Context;
use hospital_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    navigation::check_consistency,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: loads the configuration, initialises logging, verifies that the access
/// policy and the navigation tree agree, and serves the portal.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load().context("invalid configuration")?;

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise sensible defaults for local development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hospital_portal=debug,tower_http=info".into());

    // 3. Logging format follows the environment: pretty locally, JSON in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Policy / Navigation Consistency
    // A policy entry without a route, or a gated route without a policy entry, is a
    // latent authorization bug. Refuse to start.
    let state = AppState::hospital(config);
    let issues = check_consistency(state.policy, state.navigation);
    if !issues.is_empty() {
        for issue in &issues {
            tracing::error!(%issue, "access policy drift");
        }
        anyhow::bail!("access policy and navigation tree disagree ({} issues)", issues.len());
    }
    tracing::info!(
        resources = state.policy.len(),
        aliases = ?state.config.role_aliases,
        "access policy loaded"
    );

    // 5. Router and Server Startup
    let bind_addr = state.config.bind_addr;
    let app = create_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{bind_addr}/swagger-ui");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
