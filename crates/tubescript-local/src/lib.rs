use std::sync::Arc;
use tubescript_core::{Error, LookupOrchestrator, Result};

pub mod config;
pub mod metadata;
pub mod transcript;

pub use config::{ConfigReport, ProxyCredentials, Settings};
pub use metadata::YouTubeDataClient;
pub use transcript::YtTranscriptBackend;

pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("tubescript/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::NotConfigured(format!("http client: {e}")))
}

/// Wire the network backends from process settings.
pub fn build_orchestrator(settings: &Settings) -> Result<LookupOrchestrator> {
    let transcripts = YtTranscriptBackend::new(settings.proxy.as_ref())?;
    let metadata = YouTubeDataClient::from_settings(http_client()?, settings);
    tracing::info!(
        languages = ?settings.languages,
        proxied = transcripts.is_proxied(),
        "lookup pipeline ready"
    );
    Ok(LookupOrchestrator::new(
        Arc::new(transcripts),
        Arc::new(metadata),
        settings.languages.clone(),
    ))
}
