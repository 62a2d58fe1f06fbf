//! Serve command handler.

use clap::Args;
use semsearch_core::{AppConfig, AppResult};
use semsearch_embeddings::create_provider;
use semsearch_server::SearchService;

/// Run the HTTP search service
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(&self, mut config: AppConfig) -> AppResult<()> {
        if let Some(bind) = &self.bind {
            config.bind = bind.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config.validate()?;

        let addr = config.socket_addr()?;

        // The provider is a hard dependency: fail startup if it is unusable
        let provider = create_provider(&config.embedding).await?;
        let service = SearchService::new(provider, config.default_top_k);

        semsearch_server::serve(addr, service).await
    }
}
