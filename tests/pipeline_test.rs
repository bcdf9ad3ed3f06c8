//! Pipeline tests
//!
//! Exercise the orchestrator's mode dispatch, fallback ladder and error
//! propagation end to end against fake clients.

mod common;

use common::*;
use quotepick::pipeline::PickError;
use quotepick::types::Mode;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_empty_input_never_reaches_embedding() {
    let embedder = Arc::new(FakeEmbedder::default());
    let store = Arc::new(FakeStore::default());
    let generator = Arc::new(FakeGenerator::replying(r#"{ "index": 0 }"#));
    let picker = build_picker(embedder.clone(), store.clone(), generator.clone());

    for input in ["", "   ", "\n\t "] {
        let err = picker.pick(input, Mode::Harsh).await.unwrap_err();
        assert!(matches!(err, PickError::EmptyInput));
        assert_eq!(err.to_string(), "input must be non-empty");
    }

    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.match_calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_zero_candidates_serves_fallback_without_reranking() {
    let embedder = Arc::new(FakeEmbedder::default());
    let store = Arc::new(FakeStore::default()); // no candidates
    let generator = Arc::new(FakeGenerator::replying(r#"{ "index": 0 }"#));
    let picker = build_picker(embedder, store, generator.clone());

    let picked = picker.pick("지쳤다", Mode::Comfort).await.unwrap();
    assert_eq!(picked.quote.author, "system");
    assert_eq!(picked.quote.source, "fallback");
    assert!(picked.quote.id.is_none());
    assert!(picked.degraded);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_comfort_pick_selects_reranked_candidate() {
    let embedder = Arc::new(FakeEmbedder::default());
    let store = Arc::new(FakeStore {
        candidates: three_candidates(),
        ..FakeStore::default()
    });
    let generator = Arc::new(FakeGenerator::replying(
        r#"{ "index": 1, "reason": "위로 톤" }"#,
    ));
    let picker = build_picker(embedder, store, generator.clone());

    let picked = picker.pick("월요일 아침", Mode::Comfort).await.unwrap();
    assert_eq!(picked.quote.id, Some(20));
    assert_eq!(picked.quote.text, "두 번째 후보");
    assert!(!picked.degraded);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unparseable_reply_falls_back_to_first_candidate() {
    for reply in ["", "좋은 질문이네요.", r#"{ "reason": "no index" }"#, "{ broken"] {
        let embedder = Arc::new(FakeEmbedder::default());
        let store = Arc::new(FakeStore {
            candidates: three_candidates(),
            ..FakeStore::default()
        });
        let generator = Arc::new(FakeGenerator::replying(reply));
        let picker = build_picker(embedder, store, generator);

        let picked = picker.pick("입력", Mode::Harsh).await.unwrap();
        assert_eq!(picked.quote.id, Some(10), "reply: {:?}", reply);
        assert!(picked.degraded);
    }
}

#[tokio::test]
async fn test_wild_indices_are_clamped_into_range() {
    let cases = [
        (r#"{ "index": -5 }"#, 10),
        (r#"{ "index": 99 }"#, 30),
        (r#"{ "index": 1.7 }"#, 20),
        (r#"{ "index": "2" }"#, 30),
    ];
    for (reply, expected_id) in cases {
        let embedder = Arc::new(FakeEmbedder::default());
        let store = Arc::new(FakeStore {
            candidates: three_candidates(),
            ..FakeStore::default()
        });
        let generator = Arc::new(FakeGenerator::replying(reply));
        let picker = build_picker(embedder, store, generator);

        let picked = picker.pick("입력", Mode::Comfort).await.unwrap();
        assert_eq!(picked.quote.id, Some(expected_id), "reply: {}", reply);
    }
}

#[tokio::test]
async fn test_embedding_failure_propagates() {
    let embedder = Arc::new(FakeEmbedder {
        fail: true,
        ..FakeEmbedder::default()
    });
    let store = Arc::new(FakeStore::default());
    let generator = Arc::new(FakeGenerator::replying(r#"{ "index": 0 }"#));
    let picker = build_picker(embedder, store.clone(), generator);

    let err = picker.pick("입력", Mode::Comfort).await.unwrap_err();
    assert!(matches!(err, PickError::Embedding(_)));
    assert_eq!(store.match_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_retrieval_rpc_failure_propagates() {
    let embedder = Arc::new(FakeEmbedder::default());
    let store = Arc::new(FakeStore {
        fail_match: true,
        ..FakeStore::default()
    });
    let generator = Arc::new(FakeGenerator::replying(r#"{ "index": 0 }"#));
    let picker = build_picker(embedder, store, generator.clone());

    let err = picker.pick("입력", Mode::Harsh).await.unwrap_err();
    assert!(matches!(err, PickError::Store(_)));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_llm_transport_failure_propagates() {
    let embedder = Arc::new(FakeEmbedder::default());
    let store = Arc::new(FakeStore {
        candidates: three_candidates(),
        ..FakeStore::default()
    });
    let generator = Arc::new(FakeGenerator::failing());
    let picker = build_picker(embedder, store, generator);

    let err = picker.pick("입력", Mode::Comfort).await.unwrap_err();
    assert!(matches!(err, PickError::Llm(_)));
}

#[tokio::test]
async fn test_random_pick_against_corpus_of_one_is_idempotent() {
    let embedder = Arc::new(FakeEmbedder::default());
    let store = Arc::new(FakeStore {
        count: 1,
        row: Some(corpus_quote(42, "유일한 문장")),
        ..FakeStore::default()
    });
    let generator = Arc::new(FakeGenerator::replying(r#"{ "index": 0 }"#));
    let picker = build_picker(embedder.clone(), store, generator.clone());

    for _ in 0..10 {
        let picked = picker.pick("", Mode::Random).await.unwrap();
        assert_eq!(picked.quote.id, Some(42));
        assert!(!picked.degraded);
    }

    // Random mode never embeds or reranks
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_random_pick_against_empty_corpus_is_no_data() {
    let embedder = Arc::new(FakeEmbedder::default());
    let store = Arc::new(FakeStore::default());
    let generator = Arc::new(FakeGenerator::replying(r#"{ "index": 0 }"#));
    let picker = build_picker(embedder.clone(), store.clone(), generator);

    for _ in 0..3 {
        let err = picker.pick("", Mode::Random).await.unwrap_err();
        assert!(matches!(err, PickError::NoData));
    }
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.read_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_random_pick_store_failures_fold_into_no_data() {
    let embedder = Arc::new(FakeEmbedder::default());
    let failing_count = Arc::new(FakeStore {
        fail_count: true,
        ..FakeStore::default()
    });
    let generator = Arc::new(FakeGenerator::replying(r#"{ "index": 0 }"#));
    let picker = build_picker(embedder.clone(), failing_count, generator.clone());
    let err = picker.pick("", Mode::Random).await.unwrap_err();
    assert!(matches!(err, PickError::NoData));

    let failing_read = Arc::new(FakeStore {
        count: 5,
        fail_read: true,
        ..FakeStore::default()
    });
    let picker = build_picker(embedder, failing_read, generator);
    let err = picker.pick("", Mode::Random).await.unwrap_err();
    assert!(matches!(err, PickError::NoData));
}
