//! Search Result Value Objects

use std::sync::Arc;

use crate::entities::ReferenceExample;

/// Value Object: Similarity Match
///
/// One entry of a top-k retrieval. The example is shared with the index
/// snapshot that produced it, so holding a match keeps that snapshot's
/// record alive even after a rebuild. Matches are recomputed per query and
/// never persisted.
#[derive(Debug, Clone)]
pub struct SimilarityMatch {
    /// The matched reference
    pub example: Arc<ReferenceExample>,
    /// Cosine similarity in [-1, 1]
    pub score: f64,
    /// 1-based position in the returned top-k
    pub rank: usize,
}
