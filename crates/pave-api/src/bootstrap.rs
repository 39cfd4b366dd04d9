// SPDX-License-Identifier: Apache-2.0
//! Server bootstrap: wire the ledger, the processor client, and the
//! orchestrators, then serve the router.

use std::sync::Arc;

use anyhow::Context;

use pave_core::fees::SplitPercentFeePolicy;
use pave_core::profile::OnboardingDefaults;
use pave_ledger::AccountLedger;
use pave_processor::HttpProcessorClient;

use crate::config::ApiConfig;
use crate::state::AppState;

/// Run the HTTP server until it fails or is shut down externally.
pub async fn serve(config: ApiConfig) -> anyhow::Result<()> {
    let ledger = AccountLedger::connect(&config.db_path)
        .await
        .with_context(|| format!("opening account ledger at {}", config.db_path.display()))?;

    let client = Arc::new(
        HttpProcessorClient::new(config.processor.clone())
            .context("building processor client")?,
    );

    let state = AppState::new(
        ledger,
        client,
        Arc::new(SplitPercentFeePolicy::default()),
        OnboardingDefaults::default(),
    );
    let app = crate::app(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!("pave-api listening on {}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;
    Ok(())
}
