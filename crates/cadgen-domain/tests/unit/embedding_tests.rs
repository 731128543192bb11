//! Tests for embedding value objects

use cadgen_domain::value_objects::{CachedEmbedding, Embedding, text_digest};

#[test]
fn test_new_sets_dimensions() {
    let embedding = Embedding::new(vec![0.1, 0.2, 0.3], "test-model");
    assert_eq!(embedding.dimensions, 3);
    assert_eq!(embedding.model, "test-model");
}

#[test]
fn test_cosine_similarity() {
    let embedding = Embedding::new(vec![1.0, 0.0], "m");

    let same = embedding.cosine_similarity(&[2.0, 0.0]).unwrap();
    assert!((same - 1.0).abs() < 1e-9);

    let orthogonal = embedding.cosine_similarity(&[0.0, 3.0]).unwrap();
    assert!(orthogonal.abs() < 1e-9);

    let opposite = embedding.cosine_similarity(&[-1.0, 0.0]).unwrap();
    assert!((opposite + 1.0).abs() < 1e-9);
}

#[test]
fn test_cosine_similarity_dimension_mismatch() {
    let embedding = Embedding::new(vec![1.0, 0.0], "m");
    assert!(embedding.cosine_similarity(&[1.0, 0.0, 0.0]).is_none());
}

#[test]
fn test_cosine_similarity_zero_vector() {
    let embedding = Embedding::new(vec![0.0, 0.0], "m");
    assert_eq!(embedding.cosine_similarity(&[1.0, 1.0]), Some(0.0));
}

#[test]
fn test_cached_embedding_currency() {
    let cached = CachedEmbedding::new(Embedding::new(vec![0.5, 0.5], "nomic"), "mug cup");

    assert!(cached.is_current("mug cup", "nomic", 2));
    assert!(!cached.is_current("mug cup with lid", "nomic", 2));
    assert!(!cached.is_current("mug cup", "minilm", 2));
    assert!(!cached.is_current("mug cup", "nomic", 384));
}

#[test]
fn test_text_digest_is_stable() {
    assert_eq!(text_digest("gear"), text_digest("gear"));
    assert_ne!(text_digest("gear"), text_digest("gears"));
    assert_eq!(text_digest("gear").len(), 64);
}
