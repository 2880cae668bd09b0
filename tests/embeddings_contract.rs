// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use btembed::config::{EmbeddingConfig, EmbeddingProviderType};
use btembed::embedding::{
    create_embedder, BridgeTowerEmbeddings, DummyEmbedder, EmbeddingFunction, Embeddings,
};
use btembed::errors::EmbedError;

fn image(dir: &Path, name: &str, bytes: &[u8]) -> String {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path.to_string_lossy().into_owned()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn pair_vectors_depend_only_on_their_own_pair() {
    let dir = TempDir::new().unwrap();
    let cat = image(dir.path(), "cat.jpg", b"cat");
    let dog = image(dir.path(), "dog.jpg", b"dog");
    let adapter = BridgeTowerEmbeddings::new(DummyEmbedder::new(16));

    let both = adapter
        .embed_image_text_pairs(&strings(&["a cat", "a dog"]), &[cat.clone(), dog.clone()])
        .unwrap();
    let cat_only = adapter
        .embed_image_text_pairs(&strings(&["a cat"]), &[cat])
        .unwrap();
    let dog_only = adapter
        .embed_image_text_pairs(&strings(&["a dog"]), &[dog])
        .unwrap();

    assert_eq!(both.len(), 2);
    assert_eq!(both[0], cat_only[0]);
    assert_eq!(both[1], dog_only[0]);
}

#[test]
fn repeated_calls_are_identical() {
    let dir = TempDir::new().unwrap();
    let cat = image(dir.path(), "cat.jpg", b"cat");
    let adapter = BridgeTowerEmbeddings::new(DummyEmbedder::new(16));
    let texts = strings(&["a cat"]);
    let images = vec![cat];

    let first = adapter.embed_image_text_pairs(&texts, &images).unwrap();
    let second = adapter.embed_image_text_pairs(&texts, &images).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        adapter.embed_documents(&texts).unwrap(),
        adapter.embed_documents(&texts).unwrap()
    );
}

#[test]
fn joint_embedding_differs_from_text_only() {
    let dir = TempDir::new().unwrap();
    let cat = image(dir.path(), "cat.jpg", b"cat");
    let adapter = BridgeTowerEmbeddings::new(DummyEmbedder::new(16));

    let joint = adapter
        .embed_image_text_pairs(&strings(&["a cat"]), &[cat])
        .unwrap();
    let text_only = adapter.embed_query("a cat").unwrap();
    assert_ne!(joint[0], text_only);
}

#[test]
fn mismatch_is_precondition_error() {
    let adapter = BridgeTowerEmbeddings::new(DummyEmbedder::new(4));
    let err = adapter
        .embed_image_text_pairs(&strings(&["a", "b"]), &strings(&["x.jpg"]))
        .unwrap_err();
    assert!(err.is_precondition());
    assert!(matches!(err, EmbedError::LengthMismatch { texts: 2, images: 1 }));
}

#[test]
fn boxed_embedder_from_config_drives_adapter() {
    let config = EmbeddingConfig {
        provider: Some(EmbeddingProviderType::Dummy),
        dimension: Some(32),
        ..Default::default()
    };
    let embedder = create_embedder(&config).unwrap();
    assert_eq!(embedder.model_id(), "dummy");

    let adapter = BridgeTowerEmbeddings::new(embedder);
    let vectors = adapter.embed_documents(&strings(&["one", "two", "three"])).unwrap();
    assert_eq!(vectors.len(), 3);
    assert!(vectors.iter().all(|v| v.len() == 32));
    assert_eq!(adapter.embed_query("two").unwrap(), vectors[1]);
}
