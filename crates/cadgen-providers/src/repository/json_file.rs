//! JSON file reference repository
//!
//! The whole library lives in one document:
//!
//! ```json
//! { "version": 1, "references": [ { "name": "simple_box", ... } ] }
//! ```
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! original, so readers never observe a half-written library.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use cadgen_domain::entities::ReferenceExample;
use cadgen_domain::error::{Error, Result};
use cadgen_domain::repositories::ReferenceRepository;

/// Current document format
pub const LIBRARY_FORMAT_VERSION: u32 = 1;

/// On-disk library document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub references: Vec<ReferenceExample>,
}

fn default_version() -> u32 {
    LIBRARY_FORMAT_VERSION
}

impl Default for LibraryDocument {
    fn default() -> Self {
        Self {
            version: LIBRARY_FORMAT_VERSION,
            references: Vec::new(),
        }
    }
}

/// Repository backed by a JSON document on disk
#[derive(Debug)]
pub struct JsonFileReferenceRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileReferenceRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<LibraryDocument> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Reference library not found, starting empty");
                return Ok(LibraryDocument::default());
            }
            Err(e) => {
                return Err(Error::io_with_source(
                    format!("Failed to read {}", self.path.display()),
                    e,
                ));
            }
        };
        let document: LibraryDocument = serde_json::from_str(&raw)?;
        if document.version > LIBRARY_FORMAT_VERSION {
            return Err(Error::invalid_argument(format!(
                "{} uses library format {}, newer than supported {}",
                self.path.display(),
                document.version,
                LIBRARY_FORMAT_VERSION
            )));
        }
        Ok(document)
    }

    async fn write_document(&self, document: &LibraryDocument) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::io_with_source(format!("Failed to create {}", parent.display()), e)
            })?;
        }
        let body = serde_json::to_string_pretty(document)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, body).await.map_err(|e| {
            Error::io_with_source(format!("Failed to write {}", staging.display()), e)
        })?;
        tokio::fs::rename(&staging, &self.path).await.map_err(|e| {
            Error::io_with_source(format!("Failed to replace {}", self.path.display()), e)
        })?;
        Ok(())
    }
}

#[async_trait]
impl ReferenceRepository for JsonFileReferenceRepository {
    async fn load_all(&self) -> Result<Vec<ReferenceExample>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_document().await?.references)
    }

    async fn append(&self, example: &ReferenceExample) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        if document.references.iter().any(|e| e.name == example.name) {
            return Err(Error::duplicate_reference(&example.name));
        }
        document.references.push(example.clone());
        self.write_document(&document).await?;
        info!(name = %example.name, path = %self.path.display(), "Reference appended");
        Ok(())
    }

    async fn update_embeddings(&self, refreshed: &[ReferenceExample]) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        let mut changed = 0usize;
        for update in refreshed {
            if let Some(stored) = document.references.iter_mut().find(|e| e.name == update.name)
                && stored.embedding != update.embedding
            {
                stored.embedding = update.embedding.clone();
                changed += 1;
            }
        }
        if changed > 0 {
            self.write_document(&document).await?;
            debug!(changed, "Embedding caches persisted");
        }
        Ok(())
    }

    fn repository_name(&self) -> &str {
        "json-file"
    }
}
