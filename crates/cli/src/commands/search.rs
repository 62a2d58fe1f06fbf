//! Search command handler.
//!
//! Loads a directory into a fresh in-memory index and runs one query.
//! Nothing is persisted between runs.

use crate::documents::load_documents;
use clap::Args;
use semsearch_core::{AppConfig, AppResult};
use semsearch_embeddings::create_provider;
use semsearch_index::SearchHit;
use semsearch_server::SearchService;
use std::path::PathBuf;

/// Index a directory in memory and run one query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Directory of documents to search
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// File extensions to include (repeatable)
    #[arg(long = "ext", default_values_t = vec!["md".to_string(), "txt".to_string()])]
    pub extensions: Vec<String>,

    /// Number of results (default from config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        config.validate()?;
        tracing::info!("Searching {:?} for '{}'", self.dir, self.query);

        let documents = load_documents(&self.dir, &self.extensions)?;
        let loaded = documents.len();

        let provider = create_provider(&config.embedding).await?;
        let service = SearchService::new(provider, config.default_top_k);

        service.index_documents(documents).await?;
        let hits = service.search(&self.query, self.top_k).await?;

        if self.json {
            let output = serde_json::json!({
                "query": self.query,
                "documents": loaded,
                "results": hits,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print!("{}", render_table(&hits, loaded));
        }

        Ok(())
    }
}

fn render_table(hits: &[SearchHit], loaded: usize) -> String {
    if hits.is_empty() {
        return format!("No results ({} documents searched)\n", loaded);
    }

    let mut out = String::new();
    for (rank, hit) in hits.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:.4}  {}",
            rank + 1,
            hit.score,
            hit.id
        ));
        if let Some(path) = &hit.path {
            out.push_str(&format!("  ({})", path));
        }
        out.push('\n');
    }
    out
}
