//! Load text files from a directory as documents.

use semsearch_core::{AppError, AppResult};
use semsearch_index::Metadata;
use semsearch_server::Document;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Walk `root` and load every UTF-8 file whose extension is in `extensions`
/// (case-insensitive; empty means all files). Hidden files and directories
/// are skipped. Documents come back in file-name order.
///
/// Each document gets `id` = path relative to `root`, `name` = file name,
/// `path` = full path, and `meta.bytes` = file size.
pub fn load_documents(root: &Path, extensions: &[String]) -> AppResult<Vec<Document>> {
    if !root.is_dir() {
        return Err(AppError::InvalidArgument(format!(
            "{:?} is not a directory",
            root
        )));
    }

    let mut documents = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }

        let text = match std::fs::read_to_string(entry.path()) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Skipping {:?}: {}", entry.path(), e);
                continue;
            }
        };

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let mut meta = Metadata::new();
        meta.insert("bytes".to_string(), serde_json::json!(text.len()));

        documents.push(Document {
            name: Some(entry.file_name().to_string_lossy().to_string()),
            path: Some(entry.path().display().to_string()),
            meta: Some(meta),
            ..Document::new(relative, text)
        });
    }

    tracing::info!("Loaded {} documents from {:?}", documents.len(), root);
    Ok(documents)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
