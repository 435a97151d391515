use std::sync::Arc;

use notion_mcp_gateway::{
    backend::notion::NotionBackendFactory, build_app, config::Config, logging,
    tools::ToolRegistry, AppState,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    if config.notion_api_key.is_none() {
        warn!("NOTION_API_KEY is not set; /messages and REST tool routes will answer HTTP 500");
    }

    let registry = Arc::new(ToolRegistry::notion()?);
    let factory = Arc::new(NotionBackendFactory::new(
        config.notion_api_base_url.clone(),
        config.notion_version.clone(),
        config.backend_timeout,
    ));
    let bind_socket = config.bind_socket()?;
    let state = AppState::from_config(&config, registry.clone(), factory);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        tools = registry.len(),
        keepalive_secs = config.keepalive_interval.as_secs(),
        backend_timeout_secs = config.backend_timeout.as_secs(),
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
