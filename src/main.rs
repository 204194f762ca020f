use swipe_recs::{
    api::{create_router, AppState},
    Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("swipe_recs=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Initialize application state with the built-in catalog
    let state = AppState::new();

    // Create the router with all routes
    let app = create_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Reference backend listening");

    axum::serve(listener, app).await?;
    Ok(())
}
