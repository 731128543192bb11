//! Test doubles and fixtures shared by the unit tests

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cadgen_application::domain_services::StrategySelector;
use cadgen_application::use_cases::{
    CodeSynthesizer, ConversationEngine, EmbeddingIndex, ExecutionValidator, NewReference,
    ReferenceLibrary, ReferenceStore,
};
use cadgen_domain::error::{Error, Result};
use cadgen_domain::ports::providers::{
    EmbeddingProvider, GenerationRequest, TextGenerationProvider,
};
use cadgen_domain::value_objects::{ComplexityTier, Embedding, PerformanceMode};
use cadgen_providers::generation::NullGenerationProvider;
use cadgen_providers::repository::InMemoryReferenceRepository;
use cadgen_providers::sandbox::NullSandbox;
use cadgen_providers::syntax::PythonSyntaxChecker;
use tokio::sync::Mutex;

// ============================================================================
// Fixture Scripts
// ============================================================================

pub const MUG_SCRIPT: &str = r#"import cadquery as cq

radius = 40
height = 90
wall_thickness = 3
handle_width = 10
handle_height = 50

body = cq.Workplane("XY").circle(radius).extrude(height)
inner = (
    cq.Workplane("XY")
    .workplane(offset=wall_thickness)
    .circle(radius - wall_thickness)
    .extrude(height)
)
cup = body.cut(inner)

# Handle on the side
handle = (
    cq.Workplane("XZ")
    .center(radius + handle_width / 2, height / 2)
    .rect(handle_width, handle_height)
    .extrude(5)
)
result = cup.union(handle)
"#;

pub const BOX_SCRIPT: &str = r#"import cadquery as cq

width = 50
depth = 30
height = 20

result = cq.Workplane("XY").box(width, depth, height)
"#;

pub const CYLINDER_SCRIPT: &str = r#"import cadquery as cq

radius = 15
height = 40

result = cq.Workplane("XY").circle(radius).extrude(height)
"#;

pub fn new_reference(name: &str, description: &str, script: &str, tier: ComplexityTier) -> NewReference {
    NewReference {
        name: name.to_string(),
        description: description.to_string(),
        script: script.to_string(),
        complexity: tier,
        category: if tier == ComplexityTier::Primitive {
            "primitive".to_string()
        } else {
            "kitchenware".to_string()
        },
    }
}

// ============================================================================
// Scripted Embedding Provider
// ============================================================================

/// Embedder answering from a rule table: the first rule whose needle the
/// lowercased text starts with (`^needle`) or contains (`needle`) wins;
/// anything else embeds to the zero vector
pub struct ScriptedEmbedding {
    rules: Vec<(String, Vec<f32>)>,
    dimensions: usize,
    delay: Duration,
    failures_left: AtomicUsize,
    pub batch_calls: AtomicUsize,
    pub embedded_texts: AtomicUsize,
}

impl ScriptedEmbedding {
    pub fn new(dimensions: usize, rules: &[(&str, &[f32])]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|(needle, vector)| (needle.to_string(), vector.to_vec()))
                .collect(),
            dimensions,
            delay: Duration::ZERO,
            failures_left: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
            embedded_texts: AtomicUsize::new(0),
        }
    }

    /// Pause inside every batch, to interleave concurrent callers
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the next `count` calls
    pub fn failing(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|(needle, _)| match needle.strip_prefix('^') {
                Some(prefix) => lowered.starts_with(prefix),
                None => lowered.contains(needle.as_str()),
            })
            .map_or_else(|| vec![0.0; self.dimensions], |(_, vector)| vector.clone())
    }
}

/// Corpus of three references and a query that scores 0.534 against the mug
pub fn mug_embedding() -> ScriptedEmbedding {
    ScriptedEmbedding::new(
        3,
        &[
            ("^coffee mug", &[1.0, 0.0, 0.0]),
            ("^simple box", &[0.0, 0.0, 1.0]),
            ("^simple cylinder", &[0.0, 0.28, 0.96]),
            ("mug", &[0.534, 0.8455, 0.0]),
            ("cube", &[0.0, 0.0, 1.0]),
        ],
    )
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(Error::embedding("scripted failure"));
        }
        self.embedded_texts.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| Embedding::new(self.vector_for(text), "scripted"))
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

// ============================================================================
// Scripted Generation Provider
// ============================================================================

/// Generator replaying canned replies; the last reply repeats forever
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    delay: Duration,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerationProvider for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(request.prompt.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let mut replies = self.replies.lock().await;
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.ok_or_else(|| Error::generation("no scripted reply"))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// Library holding the mug, box and cylinder references, already indexed
pub async fn mug_library(embedding: Arc<dyn EmbeddingProvider>) -> Arc<ReferenceLibrary> {
    let repository = Arc::new(InMemoryReferenceRepository::new());
    let store = Arc::new(ReferenceStore::load(repository).await.unwrap());
    store
        .add_reference_example(new_reference(
            "coffee_mug",
            "Cylindrical cup with a side handle",
            MUG_SCRIPT,
            ComplexityTier::Functional,
        ))
        .await
        .unwrap();
    store
        .add_reference_example(new_reference(
            "simple_box",
            "Rectangular block",
            BOX_SCRIPT,
            ComplexityTier::Primitive,
        ))
        .await
        .unwrap();
    store
        .add_reference_example(new_reference(
            "simple_cylinder",
            "Solid round cylinder",
            CYLINDER_SCRIPT,
            ComplexityTier::Primitive,
        ))
        .await
        .unwrap();
    let index = Arc::new(EmbeddingIndex::new(embedding));
    let library = Arc::new(ReferenceLibrary::new(store, index));
    library.initialize().await.unwrap();
    library
}

pub fn synthesizer(generator: Arc<dyn TextGenerationProvider>) -> CodeSynthesizer {
    CodeSynthesizer::new(
        generator,
        Arc::new(PythonSyntaxChecker::new()),
        PerformanceMode::Fast.budget(),
    )
}

/// Engine over the mug library with the echoing generator and no-op sandbox
pub async fn offline_engine() -> ConversationEngine {
    engine_with(Arc::new(NullGenerationProvider::new())).await
}

pub async fn engine_with(generator: Arc<dyn TextGenerationProvider>) -> ConversationEngine {
    let library = mug_library(Arc::new(mug_embedding())).await;
    ConversationEngine::new(
        library,
        StrategySelector::default(),
        Arc::new(synthesizer(generator)),
        Arc::new(ExecutionValidator::new(Arc::new(NullSandbox::new()))),
    )
}
