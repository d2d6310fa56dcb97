//! Context strings built from files on disk.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Read `paths` into context strings, one `"<path>\n<content>"` entry per
/// readable file, in input order. Unreadable files are skipped.
pub async fn load_context_files(paths: &[PathBuf]) -> Vec<String> {
    let mut context = Vec::with_capacity(paths.len());
    for path in paths {
        if let Some(entry) = read_entry(path).await {
            context.push(entry);
        }
    }
    context
}

async fn read_entry(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            debug!(path = %path.display(), bytes = content.len(), "Loaded context file");
            Some(format!("{}\n{}", path.display(), content))
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Skipping unreadable context file");
            None
        }
    }
}
