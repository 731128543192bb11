//! Composition root
//!
//! Builds every collaborator from [`AppConfig`] and hands out the three
//! process-wide services: the reference library, the conversation engine
//! and the session registry.
//!
//! ```rust,ignore
//! let context = init_app(ConfigLoader::new().load()?).await?;
//! context.initialize().await?;
//! let session = context.sessions().start();
//! ```

use std::fmt;
use std::sync::Arc;

use cadgen_application::domain_services::strategy::StrategySelector;
use cadgen_application::ports::services::SimilaritySearchInterface;
use cadgen_application::use_cases::{
    CodeSynthesizer, ConversationEngine, ConversationSettings, EmbeddingIndex, ExecutionValidator,
    IndexReport, ReferenceLibrary, ReferenceStore, SessionRegistry,
};
use cadgen_domain::error::Result;
use cadgen_domain::ports::providers::{
    EmbeddingProvider, ScriptSandbox, ScriptSyntaxChecker, TextGenerationProvider,
};
use cadgen_domain::repositories::ReferenceRepository;
use cadgen_providers::repository::JsonFileReferenceRepository;
use cadgen_providers::syntax::PythonSyntaxChecker;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::di::factory::{
    EmbeddingProviderFactory, GenerationProviderFactory, SandboxFactory, http_client,
};

/// Collaborators the engine is assembled from
#[derive(Clone)]
pub struct ProviderSet {
    pub embedding: Arc<dyn EmbeddingProvider>,
    pub generation: Arc<dyn TextGenerationProvider>,
    pub sandbox: Arc<dyn ScriptSandbox>,
    pub syntax: Arc<dyn ScriptSyntaxChecker>,
    pub repository: Arc<dyn ReferenceRepository>,
}

impl ProviderSet {
    /// Resolve every provider named by the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = http_client()?;
        Ok(Self {
            embedding: EmbeddingProviderFactory::create(&config.embedding, &client)?,
            generation: GenerationProviderFactory::create(&config.generation, &client)?,
            sandbox: SandboxFactory::create(&config.sandbox)?,
            syntax: Arc::new(PythonSyntaxChecker::new()),
            repository: Arc::new(JsonFileReferenceRepository::new(config.references.path.clone())),
        })
    }
}

/// Application context holding the shared services
pub struct AppContext {
    /// Effective configuration
    pub config: Arc<AppConfig>,

    library: Arc<ReferenceLibrary>,
    engine: Arc<ConversationEngine>,
    sessions: Arc<SessionRegistry>,
}

impl AppContext {
    /// Build the embedding index for the stored corpus
    ///
    /// An unreachable embedding service is not fatal here: the index stays
    /// empty, so every request falls back to reasoning from scratch until
    /// the next successful rebuild.
    pub async fn initialize(&self) -> Result<Option<IndexReport>> {
        match self.library.initialize().await {
            Ok(report) => Ok(Some(report)),
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "Embedding index not built, retrieval disabled");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn library(&self) -> Arc<ReferenceLibrary> {
        Arc::clone(&self.library)
    }

    pub fn engine(&self) -> Arc<ConversationEngine> {
        Arc::clone(&self.engine)
    }

    pub fn sessions(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.sessions)
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("references", &self.library.store().len())
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

/// Initialize the application context from configuration
pub async fn init_app(config: AppConfig) -> Result<AppContext> {
    let providers = ProviderSet::from_config(&config)?;
    init_app_with(config, providers).await
}

/// Initialize the application context with explicit providers
///
/// Loads the reference store but does not index it; call
/// [`AppContext::initialize`] once the context is built.
pub async fn init_app_with(config: AppConfig, providers: ProviderSet) -> Result<AppContext> {
    info!(
        embedding = providers.embedding.provider_name(),
        generation = providers.generation.provider_name(),
        sandbox = providers.sandbox.sandbox_name(),
        references = providers.repository.repository_name(),
        "Initializing application context"
    );
    let config = Arc::new(config);

    let store = Arc::new(ReferenceStore::load(Arc::clone(&providers.repository)).await?);
    let index = Arc::new(
        EmbeddingIndex::new(Arc::clone(&providers.embedding))
            .with_query_attempts(config.retrieval.attempts),
    );
    let library = Arc::new(ReferenceLibrary::new(store, index));

    let selector = StrategySelector::new(config.strategy)?;
    let synthesizer = CodeSynthesizer::new(
        Arc::clone(&providers.generation),
        Arc::clone(&providers.syntax),
        config.generation.performance_mode.budget(),
    )
    .with_max_retries(config.generation.max_retries);
    let validator =
        ExecutionValidator::new(Arc::clone(&providers.sandbox)).with_timeout(config.sandbox.timeout());

    let search: Arc<dyn SimilaritySearchInterface> = library.clone();
    let engine = Arc::new(
        ConversationEngine::new(
            search,
            selector,
            Arc::new(synthesizer),
            Arc::new(validator),
        )
        .with_settings(ConversationSettings {
            top_k: config.retrieval.top_k,
            max_questions: config.conversation.max_questions,
            repair_attempts: config.conversation.repair_attempts,
        }),
    );
    let sessions = Arc::new(SessionRegistry::new(Arc::clone(&engine)));

    info!(
        references = library.store().len(),
        mode = %config.generation.performance_mode,
        "Application context ready"
    );
    Ok(AppContext {
        config,
        library,
        engine,
        sessions,
    })
}
