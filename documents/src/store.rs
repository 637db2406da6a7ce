//! Document storage and persistence.
//!
//! Documents are stored as JSON files in a single directory; the file name
//! is the document id. The full corpus is reloaded on every retrieval call
//! (no incremental sync), which keeps the store trivially consistent for a
//! corpus of this size.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::Result;

/// Storage backend for the example-document corpus.
pub struct DocumentStore {
    /// Root directory holding one JSON file per document.
    root: PathBuf,
}

impl DocumentStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path a given file name would be stored at.
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Load every document in the corpus.
    ///
    /// Files are visited in file-name order, so corpus enumeration order
    /// (and therefore ranking tie-breaks downstream) is deterministic.
    /// Unreadable files are skipped with a warning.
    pub async fn load_all(&self) -> Result<Vec<Document>> {
        let mut paths = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            match self.load_file(&path).await {
                Ok(document) => {
                    debug!("loaded document {}", document.id);
                    documents.push(document);
                }
                Err(err) => {
                    warn!("skipping unreadable document {}: {err}", path.display());
                }
            }
        }

        info!("loaded {} documents from corpus", documents.len());
        Ok(documents)
    }

    /// Load a single document, assigning the file name as its id.
    async fn load_file(&self, path: &Path) -> Result<Document> {
        let content = fs::read_to_string(path).await?;
        let mut document: Document = serde_json::from_str(&content)?;
        document.id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(document)
    }

    /// Save a document, returning the path written.
    ///
    /// Without an explicit file name, one is derived from the title. The
    /// write goes through a temp file and rename so readers never observe a
    /// half-written document.
    pub async fn save(&self, document: &Document, file_name: Option<&str>) -> Result<PathBuf> {
        let name = match file_name {
            Some(name) => name.to_string(),
            None => default_file_name(&document.title),
        };
        let path = self.root.join(&name);

        let content = serde_json::to_string_pretty(document)?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &path).await?;

        debug!("saved document {}", path.display());
        Ok(path)
    }
}

/// Default JSON file name derived from the title.
fn default_file_name(title: &str) -> String {
    let base = if title.is_empty() {
        "untitled_document"
    } else {
        title
    };
    let slug: String = base
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .take(50)
        .collect();
    format!("{slug}.json")
}
