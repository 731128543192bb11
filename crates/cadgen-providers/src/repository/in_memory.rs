//! In-memory reference repository

use async_trait::async_trait;
use tokio::sync::RwLock;

use cadgen_domain::entities::ReferenceExample;
use cadgen_domain::error::{Error, Result};
use cadgen_domain::repositories::ReferenceRepository;

/// Repository that keeps the corpus in process memory
#[derive(Debug, Default)]
pub struct InMemoryReferenceRepository {
    examples: RwLock<Vec<ReferenceExample>>,
}

impl InMemoryReferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with `examples`
    pub fn with_examples(examples: Vec<ReferenceExample>) -> Self {
        Self {
            examples: RwLock::new(examples),
        }
    }
}

#[async_trait]
impl ReferenceRepository for InMemoryReferenceRepository {
    async fn load_all(&self) -> Result<Vec<ReferenceExample>> {
        Ok(self.examples.read().await.clone())
    }

    async fn append(&self, example: &ReferenceExample) -> Result<()> {
        let mut examples = self.examples.write().await;
        if examples.iter().any(|e| e.name == example.name) {
            return Err(Error::duplicate_reference(&example.name));
        }
        examples.push(example.clone());
        Ok(())
    }

    async fn update_embeddings(&self, refreshed: &[ReferenceExample]) -> Result<()> {
        let mut examples = self.examples.write().await;
        for update in refreshed {
            if let Some(stored) = examples.iter_mut().find(|e| e.name == update.name) {
                stored.embedding = update.embedding.clone();
            }
        }
        Ok(())
    }

    fn repository_name(&self) -> &str {
        "memory"
    }
}
