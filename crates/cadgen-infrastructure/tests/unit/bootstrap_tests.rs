//! Composition root tests
//!
//! Everything runs offline: the default configuration selects the Null
//! embedding, generation and sandbox providers.

use std::sync::Arc;

use cadgen_application::use_cases::{AssistantResponse, NewReference};
use cadgen_domain::error::Error;
use cadgen_domain::value_objects::ComplexityTier;
use cadgen_infrastructure::config::AppConfig;
use cadgen_infrastructure::di::{
    EmbeddingProviderFactory, GenerationProviderFactory, ProviderSet, SandboxFactory, init_app,
    init_app_with,
};
use cadgen_providers::repository::JsonFileReferenceRepository;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const BOX_SCRIPT: &str = r#"import cadquery as cq

width = 50
depth = 30
height = 20

result = cq.Workplane("XY").box(width, depth, height)
"#;

fn offline_config(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.references.path = dir.path().join("references.json");
    config
}

fn seed_library_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/references.json")
}

// ============================================================================
// Factories
// ============================================================================

#[test]
fn test_factories_follow_configuration() {
    let client = reqwest::Client::new();
    let mut config = AppConfig::default();

    let embedding = EmbeddingProviderFactory::create(&config.embedding, &client).unwrap();
    assert_eq!(embedding.provider_name(), "null");

    config.embedding.provider = "ollama".to_string();
    let embedding = EmbeddingProviderFactory::create(&config.embedding, &client).unwrap();
    assert_eq!(embedding.provider_name(), "ollama");
    assert_eq!(embedding.model(), "all-minilm");

    config.generation.provider = "ollama".to_string();
    config.generation.model = Some("codellama:13b".to_string());
    let generation = GenerationProviderFactory::create(&config.generation, &client).unwrap();
    assert_eq!(generation.model(), "codellama:13b");

    config.sandbox.provider = "python".to_string();
    let sandbox = SandboxFactory::create(&config.sandbox).unwrap();
    assert_eq!(sandbox.sandbox_name(), "python");
}

#[test]
fn test_factories_reject_unknown_names() {
    let client = reqwest::Client::new();
    let mut config = AppConfig::default();
    config.embedding.provider = "openai".to_string();
    assert!(matches!(
        EmbeddingProviderFactory::create(&config.embedding, &client),
        Err(Error::Configuration { .. })
    ));

    config.sandbox.provider = "docker".to_string();
    assert!(SandboxFactory::create(&config.sandbox).is_err());
}

// ============================================================================
// Application Context
// ============================================================================

#[tokio::test]
async fn test_offline_context_with_missing_library() {
    let dir = TempDir::new().unwrap();
    let context = init_app(offline_config(&dir)).await.unwrap();

    let report = context.initialize().await.unwrap().unwrap();
    assert_eq!(report.indexed, 0);
    assert!(context.library().store().is_empty());
    assert!(context.sessions().is_empty());
}

#[tokio::test]
async fn test_added_reference_is_persisted_and_searchable() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(&dir);
    let path = config.references.path.clone();
    let context = init_app(config).await.unwrap();
    context.initialize().await.unwrap();

    context
        .library()
        .add_reference_example(NewReference {
            name: "simple_box".to_string(),
            description: "A rectangular box".to_string(),
            script: BOX_SCRIPT.to_string(),
            complexity: ComplexityTier::Primitive,
            category: "primitive".to_string(),
        })
        .await
        .unwrap();

    assert!(path.exists());
    let matches = context.library().search("a simple box", 3).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].example.name, "simple_box");

    // A fresh context reads the same file back, embedding cache included
    let reloaded = init_app(offline_config(&dir)).await.unwrap();
    let stored = reloaded.library().store().get("simple_box").unwrap();
    assert!(stored.embedding.is_some());
    let report = reloaded.initialize().await.unwrap().unwrap();
    assert_eq!(report.computed, 0);
}

#[tokio::test]
async fn test_session_turn_through_registry() {
    let dir = TempDir::new().unwrap();
    let context = init_app(offline_config(&dir)).await.unwrap();
    context.initialize().await.unwrap();

    let sessions = context.sessions();
    let id = sessions.start();
    let response = sessions
        .advance(id, "I want to make a planter", &CancellationToken::new())
        .await
        .unwrap();
    assert!(matches!(response, AssistantResponse::Question { .. }), "{response:?}");
    assert_eq!(sessions.len(), 1);
}

#[tokio::test]
async fn test_seed_library_loads_with_derived_parameters() {
    let dir = TempDir::new().unwrap();
    let copy = dir.path().join("references.json");
    std::fs::copy(seed_library_path(), &copy).unwrap();

    let mut providers = ProviderSet::from_config(&AppConfig::default()).unwrap();
    providers.repository = Arc::new(JsonFileReferenceRepository::new(copy.clone()));
    let mut config = AppConfig::default();
    config.references.path = copy;
    let context = init_app_with(config, providers).await.unwrap();

    let store = context.library().store().clone();
    assert!(store.len() >= 5);
    let mug = store.get("coffee_mug").unwrap();
    assert!(mug.has_feature("handle"));
    assert!(mug.parameter("radius").is_some_and(|p| p.required));
    let stats = store.stats();
    assert_eq!(stats.total, store.len());

    let report = context.initialize().await.unwrap().unwrap();
    assert_eq!(report.indexed, store.len());
}

#[tokio::test]
async fn test_invalid_thresholds_fail_bootstrap() {
    let dir = TempDir::new().unwrap();
    let mut config = offline_config(&dir);
    config.strategy.pattern_combination = 0.9;
    assert!(matches!(
        init_app(config).await,
        Err(Error::Configuration { .. })
    ));
}
