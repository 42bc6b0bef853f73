use docqa_core::chunker::{chunk_text, Chunker, ChunkingConfig};
use docqa_core::config::{Config, IndexBackend, Settings};
use docqa_core::types::DocumentKind;
use std::path::Path;

fn sample(len: usize) -> String {
    // Distinct-ish characters so overlap checks cannot pass by accident.
    (0..len).map(|i| char::from(b'a' + (i % 26) as u8)).collect()
}

#[test]
fn empty_text_has_no_chunks() {
    assert!(chunk_text("").is_empty());
}

#[test]
fn short_text_is_one_chunk() {
    let chunks = chunk_text("Short text");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Short text");
    assert_eq!(chunks[0].index, 0);
}

#[test]
fn chunk_count_follows_stride() {
    let cfg = ChunkingConfig::default();
    for len in [1usize, 649, 650, 651, 800, 1000, 1300, 2000, 5123] {
        let text = sample(len);
        let chunks = Chunker::new(cfg).chunk(&text);
        let expected = len.div_ceil(cfg.stride());
        assert_eq!(chunks.len(), expected, "len={len}");
    }
}

#[test]
fn consecutive_chunks_share_exactly_the_overlap() {
    let text = sample(3000);
    let chunks = chunk_text(&text);
    assert!(chunks.len() > 2);
    for pair in chunks.windows(2) {
        let (a, b) = (&pair[0].text, &pair[1].text);
        assert_eq!(a.chars().count(), 800);
        let tail: String = a.chars().skip(800 - 150).collect();
        let head: String = b.chars().take(150).collect();
        assert_eq!(tail, head);
    }
}

#[test]
fn chunks_cover_every_character() {
    let text = sample(2345);
    let chunks = chunk_text(&text);
    let stride = ChunkingConfig::default().stride();
    let mut rebuilt = String::new();
    for (i, c) in chunks.iter().enumerate() {
        if i + 1 == chunks.len() {
            rebuilt.push_str(&c.text);
        } else {
            rebuilt.extend(c.text.chars().take(stride));
        }
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn windows_are_counted_in_characters() {
    let text: String = std::iter::repeat('ж').take(1000).collect();
    let chunks = chunk_text(&text);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text.chars().count(), 800);
    assert_eq!(chunks[1].text.chars().count(), 350);
}

#[test]
fn degenerate_overlap_clamps_stride_to_one() {
    let cfg = ChunkingConfig::new(5, 10);
    assert_eq!(cfg.stride(), 1);
    let chunks = Chunker::new(cfg).chunk("abcdefgh");
    assert_eq!(chunks.len(), 8);
    assert_eq!(chunks[0].text, "abcde");
    assert_eq!(chunks[7].text, "h");
}

#[test]
fn chunking_is_deterministic() {
    let text = sample(4000);
    assert_eq!(chunk_text(&text), chunk_text(&text));
}

#[test]
fn kind_dispatch_uses_extension_with_text_default() {
    assert_eq!(DocumentKind::from_path(Path::new("a.TXT")), DocumentKind::Text);
    assert_eq!(DocumentKind::from_path(Path::new("notes.md")), DocumentKind::Text);
    assert_eq!(DocumentKind::from_path(Path::new("data.json")), DocumentKind::Text);
    assert_eq!(DocumentKind::from_path(Path::new("t.csv")), DocumentKind::Tabular);
    assert_eq!(DocumentKind::from_path(Path::new("r.pdf")), DocumentKind::Pdf);
    assert_eq!(DocumentKind::from_path(Path::new("w.docx")), DocumentKind::Docx);
    assert_eq!(DocumentKind::from_path(Path::new("archive.xyz")), DocumentKind::Text);
    assert_eq!(DocumentKind::from_path(Path::new("no_extension")), DocumentKind::Text);
    assert_eq!(DocumentKind::Pdf.to_string(), "pdf");
}

#[test]
fn defaults_match_reference_deployment() {
    let s = Settings::default();
    assert_eq!(s.llm.base_url, "http://127.0.0.1:11434");
    assert_eq!(s.llm.model, "qwen2.5:7b-instruct");
    assert_eq!(s.index.backend, IndexBackend::Qdrant);
    assert_eq!(s.index.url, "http://127.0.0.1:6333");
    assert_eq!(s.index.collection, "docs_auto");
    assert_eq!(s.index.scan_limit, 1000);
    assert_eq!(s.storage.upload_dir, "./uploads");
    assert_eq!(s.chunking, ChunkingConfig::default());
    assert!(s.validate().is_ok());
}

#[test]
fn toml_and_env_layers_override_defaults() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("RUST_ENV", "test");
        jail.create_file(
            "config.toml",
            r#"
                [index]
                backend = "lancedb"
                url = "./data/lance"

                [chunking]
                size = 400
                overlap = 50
            "#,
        )?;
        jail.create_file("config.test.toml", "[llm]\nmodel = \"llama3\"\n")?;
        jail.set_env("APP_INDEX__COLLECTION", "handbook");
        jail.set_env("APP_INDEX__API_KEY", "secret");

        let config = Config::load().map_err(|e| figment::Error::from(e.to_string()))?;
        let s = config.settings().map_err(|e| figment::Error::from(e.to_string()))?;
        assert_eq!(s.index.backend, IndexBackend::Lancedb);
        assert_eq!(s.index.url, "./data/lance");
        assert_eq!(s.index.collection, "handbook");
        assert_eq!(s.index.api_key.as_deref(), Some("secret"));
        assert_eq!(s.llm.model, "llama3");
        assert_eq!(s.llm.base_url, "http://127.0.0.1:11434");
        assert_eq!(s.chunking, ChunkingConfig::new(400, 50));
        Ok(())
    });
}

#[test]
fn invalid_settings_are_rejected() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("APP_CHUNKING__SIZE", "0");
        assert!(Config::load().is_err());
        Ok(())
    });
}
