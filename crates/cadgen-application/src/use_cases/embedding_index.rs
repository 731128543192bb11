//! Embedding Index Use Case
//!
//! Brute-force cosine index over the reference corpus. The searchable
//! state is one immutable [`IndexSnapshot`] behind an [`ArcSwap`]: a
//! rebuild computes a complete new snapshot and swaps the pointer, so a
//! query sees either the old corpus or the new one, never a mix.

use std::cmp::Ordering;
use std::sync::Arc;

use arc_swap::ArcSwap;
use cadgen_domain::constants::DEFAULT_EMBEDDING_ATTEMPTS;
use cadgen_domain::entities::ReferenceExample;
use cadgen_domain::error::{Error, Result};
use cadgen_domain::ports::providers::EmbeddingProvider;
use cadgen_domain::value_objects::{CachedEmbedding, Embedding, SimilarityMatch};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct IndexEntry {
    example: Arc<ReferenceExample>,
    vector: Embedding,
}

/// Immutable searchable state
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    model: String,
    dimensions: usize,
    generation: u64,
    entries: Vec<IndexEntry>,
}

impl IndexSnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Increments on every rebuild
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Names of the indexed examples
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.example.name.clone()).collect()
    }
}

/// Outcome of an indexing pass
#[derive(Debug, Clone)]
pub struct IndexReport {
    /// Entries in the new snapshot
    pub indexed: usize,
    /// Embeddings computed rather than taken from the cache
    pub computed: usize,
    /// Corpus with up-to-date caches, for write-back
    pub examples: Vec<ReferenceExample>,
}

/// Nearest-neighbour index over reference examples
pub struct EmbeddingIndex {
    provider: Arc<dyn EmbeddingProvider>,
    snapshot: ArcSwap<IndexSnapshot>,
    rebuild_lock: Mutex<()>,
    query_attempts: usize,
}

impl EmbeddingIndex {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            snapshot: ArcSwap::from_pointee(IndexSnapshot::default()),
            rebuild_lock: Mutex::new(()),
            query_attempts: DEFAULT_EMBEDDING_ATTEMPTS,
        }
    }

    /// Number of embedding attempts per query before giving up
    pub fn with_query_attempts(mut self, attempts: usize) -> Self {
        self.query_attempts = attempts.max(1);
        self
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.snapshot.load_full()
    }

    /// Rebuild the index from `corpus`
    ///
    /// Cached embeddings are reused when they were computed from the same
    /// text by the active model; the rest are computed in one batch.
    /// Concurrent rebuilds run one after the other.
    pub async fn index(&self, corpus: &[Arc<ReferenceExample>]) -> Result<IndexReport> {
        let _guard = self.rebuild_lock.lock().await;
        let model = self.provider.model().to_string();
        let dimensions = self.provider.dimensions();

        let mut vectors: Vec<Option<Embedding>> = Vec::with_capacity(corpus.len());
        let mut stale_texts = Vec::new();
        let mut stale_positions = Vec::new();
        for (position, example) in corpus.iter().enumerate() {
            let text = example.embedding_text();
            match &example.embedding {
                Some(cached) if cached.is_current(&text, &model, dimensions) => {
                    vectors.push(Some(cached.embedding.clone()));
                }
                _ => {
                    vectors.push(None);
                    stale_texts.push(text);
                    stale_positions.push(position);
                }
            }
        }

        let computed = if stale_texts.is_empty() {
            Vec::new()
        } else {
            self.provider
                .embed_batch(&stale_texts)
                .await
                .map_err(|e| unavailable("Failed to embed reference corpus", e))?
        };
        if computed.len() != stale_texts.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                stale_texts.len(),
                computed.len()
            )));
        }

        let mut updated = Vec::with_capacity(corpus.len());
        for ((position, embedding), text) in stale_positions.iter().zip(computed).zip(&stale_texts) {
            if embedding.vector.len() != dimensions {
                return Err(Error::DimensionMismatch {
                    expected: dimensions,
                    actual: embedding.vector.len(),
                });
            }
            let refreshed = corpus[*position].with_embedding(CachedEmbedding::new(embedding.clone(), text));
            updated.push((*position, refreshed));
            vectors[*position] = Some(embedding);
        }

        let mut examples: Vec<ReferenceExample> =
            corpus.iter().map(|example| example.as_ref().clone()).collect();
        let mut shared: Vec<Arc<ReferenceExample>> = corpus.to_vec();
        for (position, refreshed) in &updated {
            examples[*position] = refreshed.clone();
            shared[*position] = Arc::new(refreshed.clone());
        }

        let entries: Vec<IndexEntry> = shared
            .into_iter()
            .zip(vectors)
            .filter_map(|(example, vector)| vector.map(|vector| IndexEntry { example, vector }))
            .collect();

        let previous = self.snapshot.load();
        let snapshot = IndexSnapshot {
            model,
            dimensions,
            generation: previous.generation + 1,
            entries,
        };
        let indexed = snapshot.entries.len();
        info!(
            indexed,
            computed = updated.len(),
            generation = snapshot.generation,
            "Embedding index rebuilt"
        );
        self.snapshot.store(Arc::new(snapshot));

        Ok(IndexReport {
            indexed,
            computed: updated.len(),
            examples,
        })
    }

    /// Top `k` examples by cosine similarity to `text`
    ///
    /// Ties go to the lower complexity tier, then to the name.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<SimilarityMatch>> {
        let snapshot = self.snapshot.load_full();
        if snapshot.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query = self.embed_query(text).await?;
        if query.vector.len() != snapshot.dimensions {
            return Err(Error::DimensionMismatch {
                expected: snapshot.dimensions,
                actual: query.vector.len(),
            });
        }

        let mut scored: Vec<(f64, &IndexEntry)> = snapshot
            .entries
            .iter()
            .filter_map(|entry| {
                entry
                    .vector
                    .cosine_similarity(&query.vector)
                    .map(|score| (score, entry))
            })
            .collect();
        scored.sort_by(|(left_score, left), (right_score, right)| {
            right_score
                .partial_cmp(left_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| left.example.complexity.cmp(&right.example.complexity))
                .then_with(|| left.example.name.cmp(&right.example.name))
        });

        let matches: Vec<SimilarityMatch> = scored
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(position, (score, entry))| SimilarityMatch {
                example: Arc::clone(&entry.example),
                score,
                rank: position + 1,
            })
            .collect();
        debug!(
            query = text,
            best = matches.first().map(|m| m.score),
            generation = snapshot.generation,
            "Similarity query"
        );
        Ok(matches)
    }

    async fn embed_query(&self, text: &str) -> Result<Embedding> {
        let mut last_error = None;
        for attempt in 1..=self.query_attempts {
            match self.provider.embed(text).await {
                Ok(embedding) => return Ok(embedding),
                Err(e) => {
                    warn!(attempt, error = %e, "Query embedding failed");
                    last_error = Some(e);
                }
            }
        }
        let message = format!(
            "{} did not answer after {} attempt(s)",
            self.provider.provider_name(),
            self.query_attempts
        );
        Err(match last_error {
            Some(e) => unavailable(&message, e),
            None => Error::embedding_unavailable(message),
        })
    }
}

fn unavailable(message: &str, error: Error) -> Error {
    match error {
        Error::EmbeddingUnavailable { .. } | Error::DimensionMismatch { .. } => error,
        other => Error::embedding_unavailable_with_source(message, other),
    }
}
