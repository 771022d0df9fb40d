//! Service wiring: provider, analyzer and HTTP server.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::llm::create_llm_provider;
use crate::quiz::ProfileAnalyzer;
use crate::web::{AppState, start_server};

/// Build the service from `config` and serve until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let llm = create_llm_provider(&config.llm)?;
    let state = Arc::new(AppState::new(ProfileAnalyzer::new(llm), config.cors));
    let addr = config.server.socket_addr()?;
    let (bound_addr, server) = start_server(addr, state.clone()).await?;
    tracing::info!("Fun Fortune API available at http://{}", bound_addr);

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
    }
    state.request_shutdown().await;

    server
        .await
        .map_err(|e| ServerError::Serve(format!("server task failed: {e}")))??;

    tracing::info!("Shutdown complete");
    Ok(())
}
