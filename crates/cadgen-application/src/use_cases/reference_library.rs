//! Reference Library Use Case
//!
//! Process-wide pair of [`ReferenceStore`] and [`EmbeddingIndex`] with an
//! explicit lifecycle: `initialize` loads embeddings for the stored corpus,
//! `rebuild` recomputes them, `add_reference_example` appends and reindexes.

use std::sync::Arc;

use async_trait::async_trait;
use cadgen_domain::entities::ReferenceExample;
use cadgen_domain::error::Result;
use cadgen_domain::value_objects::SimilarityMatch;
use tracing::{info, warn};

use super::embedding_index::{EmbeddingIndex, IndexReport};
use super::reference_store::{NewReference, ReferenceStore};
use crate::ports::services::SimilaritySearchInterface;

/// Shared retrieval service handed to every session
pub struct ReferenceLibrary {
    store: Arc<ReferenceStore>,
    index: Arc<EmbeddingIndex>,
}

impl ReferenceLibrary {
    pub fn new(store: Arc<ReferenceStore>, index: Arc<EmbeddingIndex>) -> Self {
        Self { store, index }
    }

    /// Build the index for the loaded corpus
    pub async fn initialize(&self) -> Result<IndexReport> {
        self.rebuild().await
    }

    /// Recompute the index from the current store contents
    pub async fn rebuild(&self) -> Result<IndexReport> {
        let report = self.index.index(&self.store.all()).await?;
        if report.computed > 0 {
            let refreshed: Vec<ReferenceExample> = report
                .examples
                .iter()
                .filter(|example| example.embedding.is_some())
                .cloned()
                .collect();
            // Write-back failure is not fatal
            if let Err(e) = self.store.replace_embeddings(&refreshed).await {
                warn!(error = %e, "Failed to persist embedding caches");
            }
        }
        Ok(report)
    }

    /// Append a reference and make it searchable
    ///
    /// The record is stored even when reindexing fails; it becomes
    /// searchable with the next successful rebuild.
    pub async fn add_reference_example(&self, new: NewReference) -> Result<Arc<ReferenceExample>> {
        let example = self.store.add_reference_example(new).await?;
        match self.rebuild().await {
            Ok(_) => info!(name = %example.name, "Reference indexed"),
            Err(e) => warn!(name = %example.name, error = %e, "Reference stored but not indexed"),
        }
        Ok(example)
    }

    pub async fn search(&self, text: &str, k: usize) -> Result<Vec<SimilarityMatch>> {
        self.index.query(text, k).await
    }

    pub fn store(&self) -> &Arc<ReferenceStore> {
        &self.store
    }

    pub fn index(&self) -> &Arc<EmbeddingIndex> {
        &self.index
    }
}

#[async_trait]
impl SimilaritySearchInterface for ReferenceLibrary {
    async fn search(&self, text: &str, k: usize) -> Result<Vec<SimilarityMatch>> {
        self.index.query(text, k).await
    }
}
