use ragkit_core::config::{expand_path, ChunkingConfig, RetrievalConfig};
use ragkit_core::error::Error;
use ragkit_core::types::{SignalKind, Span};

#[test]
fn default_chunking_config_is_valid() {
    let cfg = ChunkingConfig::default();
    cfg.validate().expect("defaults must validate");
}

#[test]
fn overlap_at_least_target_is_rejected_before_chunking() {
    let cfg = ChunkingConfig {
        target_token_size: 100,
        overlap_tokens: 100,
        ..ChunkingConfig::default()
    };
    match cfg.validate() {
        Err(Error::InvalidConfig(msg)) => {
            assert!(msg.contains("overlap_tokens"), "unexpected message: {msg}");
        }
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn target_above_max_is_rejected() {
    // fixed windows of target size would exceed the hard chunk bound
    let cfg = ChunkingConfig {
        target_token_size: 100,
        max_tokens: 50,
        ..ChunkingConfig::default()
    };
    match cfg.validate() {
        Err(Error::InvalidConfig(msg)) => {
            assert!(msg.contains("target_token_size"), "unexpected message: {msg}");
        }
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn min_above_max_is_rejected() {
    let cfg = ChunkingConfig {
        min_tokens: 500,
        max_tokens: 100,
        ..ChunkingConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn retrieval_config_bounds() {
    let cfg = RetrievalConfig::default();
    cfg.validate().expect("defaults must validate");

    let bad = RetrievalConfig {
        overshoot_factor: 0.5,
        ..RetrievalConfig::default()
    };
    assert!(bad.validate().is_err());

    let bad = RetrievalConfig {
        rrf_k: 0.0,
        ..RetrievalConfig::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn span_overlap_semantics() {
    let a = Span::new(0, 10);
    let b = Span::new(10, 20);
    let c = Span::new(5, 15);
    assert!(!a.overlaps(&b), "touching spans do not overlap");
    assert!(a.overlaps(&c));
    assert!(c.overlaps(&b));
    assert_eq!(a.len(), 10);
}

#[test]
fn signal_kind_display_matches_log_wording() {
    assert_eq!(SignalKind::Semantic.to_string(), "semantic");
    assert_eq!(SignalKind::Keyword.to_string(), "keyword");
}

#[test]
fn expand_path_plain_is_untouched() {
    let p = expand_path("data/txt");
    assert_eq!(p, std::path::PathBuf::from("data/txt"));
}
