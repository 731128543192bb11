//! Tests for the reference store, embedding index and library lifecycle

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use cadgen_application::domain_services::StrategySelector;
use cadgen_application::use_cases::{EmbeddingIndex, ReferenceLibrary, ReferenceStore};
use cadgen_domain::entities::ReferenceExample;
use cadgen_domain::error::Error;
use cadgen_domain::value_objects::{ComplexityTier, Strategy};
use cadgen_providers::repository::InMemoryReferenceRepository;

use crate::support::{
    BOX_SCRIPT, CYLINDER_SCRIPT, ScriptedEmbedding, mug_embedding, mug_library, new_reference,
};

async fn empty_store() -> Arc<ReferenceStore> {
    Arc::new(
        ReferenceStore::load(Arc::new(InMemoryReferenceRepository::new()))
            .await
            .unwrap(),
    )
}

// ============================================================================
// Reference Store
// ============================================================================

#[tokio::test]
async fn test_add_derives_parameters_and_features() {
    let library = mug_library(Arc::new(mug_embedding())).await;
    let mug = library.store().get("coffee_mug").unwrap();
    assert!(mug.has_feature("handle"));
    assert_eq!(mug.parameter("radius").map(|p| p.default), Some(40.0));
    assert_eq!(library.store().len(), 3);
}

#[tokio::test]
async fn test_loaded_records_without_parameters_get_derived_ones() {
    let stored = ReferenceExample {
        name: "simple_cylinder".to_string(),
        description: "A plain cylinder".to_string(),
        script: CYLINDER_SCRIPT.to_string(),
        complexity: ComplexityTier::Primitive,
        category: "primitive".to_string(),
        parameters: Vec::new(),
        features: Vec::new(),
        embedding: None,
    };
    let repository = InMemoryReferenceRepository::with_examples(vec![stored]);
    let store = ReferenceStore::load(Arc::new(repository)).await.unwrap();

    let cylinder = store.get("simple_cylinder").unwrap();
    let names: Vec<&str> = cylinder.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["radius", "height"]);
    assert!(cylinder.features.is_empty());
}

#[tokio::test]
async fn test_duplicate_name_rejected_without_mutation() {
    let store = empty_store().await;
    store
        .add_reference_example(new_reference("simple_box", "Block", BOX_SCRIPT, ComplexityTier::Primitive))
        .await
        .unwrap();
    let before = store.get("simple_box").unwrap();

    let duplicate = store
        .add_reference_example(new_reference(
            "simple_box",
            "Another block",
            CYLINDER_SCRIPT,
            ComplexityTier::Functional,
        ))
        .await;

    assert!(matches!(duplicate, Err(Error::DuplicateReferenceName { .. })));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("simple_box").unwrap(), before);
}

#[tokio::test]
async fn test_empty_fields_rejected() {
    let store = empty_store().await;
    let result = store
        .add_reference_example(new_reference("blank", "  ", BOX_SCRIPT, ComplexityTier::Primitive))
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_stats_and_filters() {
    let library = mug_library(Arc::new(mug_embedding())).await;
    let store = library.store();
    let stats = store.stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_complexity.get("primitive"), Some(&2));
    assert_eq!(stats.by_complexity.get("manufacturing"), Some(&0));
    assert_eq!(stats.by_category.get("kitchenware"), Some(&1));
    assert_eq!(store.by_complexity(ComplexityTier::Functional).len(), 1);
    assert_eq!(store.by_category("PRIMITIVE").len(), 2);
}

// ============================================================================
// Embedding Index
// ============================================================================

#[tokio::test]
async fn test_query_scores_and_ranks() {
    let library = mug_library(Arc::new(mug_embedding())).await;
    let matches = library.search("I want a mug", 3).await.unwrap();

    assert_eq!(matches[0].example.name, "coffee_mug");
    assert!((matches[0].score - 0.534).abs() < 1e-3);
    assert_eq!(matches[0].rank, 1);
    assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(
        StrategySelector::default().select(matches[0].score),
        Strategy::DirectAdaptation
    );
}

#[tokio::test]
async fn test_query_limits_and_empty_index() {
    let library = mug_library(Arc::new(mug_embedding())).await;
    assert_eq!(library.search("I want a mug", 1).await.unwrap().len(), 1);
    assert!(library.search("I want a mug", 0).await.unwrap().is_empty());

    let index = EmbeddingIndex::new(Arc::new(mug_embedding()));
    assert!(index.query("I want a mug", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ties_go_to_lower_complexity() {
    let embedding = ScriptedEmbedding::new(2, &[("", &[1.0, 0.0])]);
    let store = empty_store().await;
    store
        .add_reference_example(new_reference("b_functional", "x", BOX_SCRIPT, ComplexityTier::Functional))
        .await
        .unwrap();
    store
        .add_reference_example(new_reference("a_mathematical", "x", BOX_SCRIPT, ComplexityTier::Mathematical))
        .await
        .unwrap();
    store
        .add_reference_example(new_reference("z_primitive", "x", BOX_SCRIPT, ComplexityTier::Primitive))
        .await
        .unwrap();
    let library = ReferenceLibrary::new(store, Arc::new(EmbeddingIndex::new(Arc::new(embedding))));
    library.initialize().await.unwrap();

    let names: Vec<String> = library
        .search("anything", 3)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.example.name.clone())
        .collect();
    assert_eq!(names, ["z_primitive", "b_functional", "a_mathematical"]);
}

#[tokio::test]
async fn test_query_embedding_failure_is_unavailable() {
    let library = mug_library(Arc::new(mug_embedding())).await;
    let failing_queries = Arc::new(mug_embedding().failing(2));
    let index = EmbeddingIndex::new(Arc::clone(&failing_queries) as _).with_query_attempts(2);
    // Cached vectors make indexing free of provider calls
    index.index(&library.store().all()).await.unwrap();
    let result = index.query("I want a mug", 3).await;
    assert!(matches!(result, Err(Error::EmbeddingUnavailable { .. })));
    assert_eq!(failing_queries.batch_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_add_keeps_record_when_reindex_fails() {
    let embedding = Arc::new(mug_embedding().failing(1));
    let index = Arc::new(EmbeddingIndex::new(Arc::clone(&embedding) as _));
    let library = ReferenceLibrary::new(empty_store().await, index);

    let added = library
        .add_reference_example(new_reference(
            "simple_cylinder",
            "Solid round cylinder",
            CYLINDER_SCRIPT,
            ComplexityTier::Primitive,
        ))
        .await
        .unwrap();
    assert_eq!(added.name, "simple_cylinder");
    assert!(library.store().get("simple_cylinder").is_some());
    assert!(library.index().snapshot().is_empty());

    // The stored record is picked up once the provider is back
    let report = library.rebuild().await.unwrap();
    assert_eq!(report.computed, 1);
    let matches = library.search("simple cylinder please", 1).await.unwrap();
    assert_eq!(matches[0].example.name, "simple_cylinder");

    let again = library
        .add_reference_example(new_reference(
            "simple_cylinder",
            "Solid round cylinder",
            CYLINDER_SCRIPT,
            ComplexityTier::Primitive,
        ))
        .await;
    assert!(matches!(again, Err(Error::DuplicateReferenceName { .. })));
}

#[tokio::test]
async fn test_rebuild_reuses_cached_embeddings() {
    let embedding = Arc::new(mug_embedding());
    let library = mug_library(Arc::clone(&embedding) as _).await;
    let embedded = embedding.embedded_texts.load(Ordering::SeqCst);
    assert_eq!(embedded, 3);

    let report = library.rebuild().await.unwrap();
    assert_eq!(report.indexed, 3);
    assert_eq!(report.computed, 0);
    assert_eq!(embedding.embedded_texts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_concurrent_rebuilds_never_expose_mixed_corpora() {
    let embedding = Arc::new(mug_embedding().with_delay(Duration::from_millis(20)));
    let library = mug_library(Arc::clone(&embedding) as _).await;
    let index = Arc::clone(library.index());
    let start_generation = index.snapshot().generation();

    let adds = (0..3).map(|i| {
        let library = Arc::clone(&library);
        async move {
            library
                .add_reference_example(new_reference(
                    &format!("extra_box_{i}"),
                    "Another block",
                    BOX_SCRIPT,
                    ComplexityTier::Primitive,
                ))
                .await
                .unwrap();
        }
    });
    let observer = {
        let index = Arc::clone(&index);
        async move {
            let mut seen = Vec::new();
            for _ in 0..20 {
                seen.push(index.snapshot());
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            seen
        }
    };
    let (_, seen) = tokio::join!(futures::future::join_all(adds), observer);

    for snapshot in &seen {
        let names = snapshot.names();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert!(names.iter().any(|n| n == "coffee_mug"));
        assert_eq!(snapshot.dimensions(), 3);
    }
    let last = index.snapshot();
    assert_eq!(last.len(), 6);
    assert_eq!(last.generation(), start_generation + 3);
}
