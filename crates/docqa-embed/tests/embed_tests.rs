use docqa_core::config::EmbeddingSettings;
use docqa_embed::{build_embedder, shared_embedder, DualEncoder, FakeEmbedder, E5_DIM};
use std::sync::Arc;

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn encoder() -> DualEncoder {
    DualEncoder::new(Arc::new(FakeEmbedder::new(E5_DIM)))
}

#[test]
fn fake_embedder_shapes_and_determinism() {
    let enc = encoder();
    let v1 = enc.embed_passage("hello world").expect("embed");
    let v2 = enc.embed_passage("hello world").expect("embed");

    assert_eq!(v1.len(), E5_DIM);
    assert!((norm(&v1) - 1.0).abs() <= 1e-3, "vector is L2-normalized");
    assert_eq!(v1, v2);
}

#[test]
fn query_and_passage_modes_differ() {
    let enc = encoder();
    let text = "warranty covers the pump for two years";
    let q = enc.embed_query(text).expect("query");
    let p = enc.embed_passage(text).expect("passage");

    assert_ne!(q, p);
    assert!((norm(&q) - 1.0).abs() <= 1e-3);
    assert!((norm(&p) - 1.0).abs() <= 1e-3);
    // Same content, different mode: still the closest pair.
    let other = enc.embed_passage("invoice totals for march").expect("passage");
    assert!(cosine(&q, &p) > cosine(&q, &other));
}

#[test]
fn batch_matches_single_calls() {
    let enc = encoder();
    let texts = vec!["alpha beta".to_string(), "gamma delta".to_string()];
    let batch = enc.embed_passages(&texts).expect("batch");
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[1], enc.embed_passage("gamma delta").expect("single"));
    assert!(enc.embed_passages(&[]).expect("empty").is_empty());
}

#[test]
fn configured_fake_embedder_is_shared() {
    let settings = EmbeddingSettings { model_dir: None, use_fake: true };
    assert_eq!(build_embedder(&settings).expect("build").dim(), E5_DIM);

    let a = shared_embedder(&settings).expect("shared");
    let b = shared_embedder(&settings).expect("shared");
    assert!(Arc::ptr_eq(&a, &b));
}
