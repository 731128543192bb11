//! Reference Repository Port

use async_trait::async_trait;

use crate::entities::ReferenceExample;
use crate::error::Result;

/// Persistence of reference examples, keyed by name
///
/// The engine only reads the corpus and appends to it. Implementations
/// must reject an append whose name already exists with
/// `Error::DuplicateReferenceName` and leave the stored corpus untouched.
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    /// Load every stored example
    async fn load_all(&self) -> Result<Vec<ReferenceExample>>;

    /// Append one example
    async fn append(&self, example: &ReferenceExample) -> Result<()>;

    /// Write refreshed embedding caches back to storage
    ///
    /// Storage without an embedding cache can ignore this.
    async fn update_embeddings(&self, _examples: &[ReferenceExample]) -> Result<()> {
        Ok(())
    }

    /// Identifier of the implementation
    fn repository_name(&self) -> &str;
}
