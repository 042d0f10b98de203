use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use unibot_core::config::{Config, CorpusSettings, LogFormat};
use unibot_core::corpus::CorpusLoader;
use unibot_core::kind::DocumentKind;
use unibot_core::snapshot::Snapshot;
use unibot_core::text::{fold_case, humanize_key, truncate_chars};
use unibot_core::types::{Content, Document, Intent};
use unibot_core::Error;

fn write(dir: &std::path::Path, rel: &str, body: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

#[test]
fn load_parses_json_jsonl_and_text() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    write(dir, "holiday.json", r#"[{"date": "2025-01-26", "day": "Sunday", "event": "Republic Day"}]"#);
    write(dir, "rules/hostel.jsonl", "{\"rule\": \"no cooking\"}\nnot json at all\n\n{\"rule\": \"gate closes at 9\"}\n");
    write(dir, "notes/about.txt", "Brainware University\nBarasat campus");

    let corpus = CorpusLoader::default().load(dir).expect("load");

    assert_eq!(corpus.len(), 3);
    assert!(corpus.failures().is_empty());
    let lines = corpus.get("rules/hostel.jsonl").expect("jsonl doc");
    match &lines.content {
        Content::List(items) => {
            assert_eq!(items.len(), 3, "blank lines are skipped, bad lines kept");
            assert_eq!(items[1], serde_json::Value::String("not json at all".into()));
        }
        other => panic!("expected list, got {other:?}"),
    }
    assert_eq!(corpus.get("notes/about.txt").unwrap().content, Content::Text("Brainware University\nBarasat campus".into()));
}

#[test]
fn broken_file_is_recorded_and_load_continues() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    write(dir, "a.json", r#"{"name": "ok"}"#);
    write(dir, "b.json", r#"{"name": "#);

    let corpus = CorpusLoader::default().load(dir).expect("load");

    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.failures().len(), 1);
    assert_eq!(corpus.failures()[0].path, "b.json");
    assert!(corpus.get("b.json").is_none(), "failed documents are not scoreable");
}

#[test]
fn skipped_dirs_and_unknown_extensions_are_ignored() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    write(dir, ".git/config.json", r#"{"x": 1}"#);
    write(dir, "venv/lib/site.json", r#"{"x": 1}"#);
    write(dir, "notice/circular.pdf", "%PDF-1.4");
    write(dir, "keep/data.json", r#"{"x": 1}"#);

    let corpus = CorpusLoader::default().load(dir).expect("load");

    let paths: Vec<&str> = corpus.documents().iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["keep/data.json"]);
}

#[test]
fn load_order_is_deterministic_and_reported() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    for name in ["c.json", "a.json", "b/z.json", "b/a.txt"] {
        write(dir, name, "{}");
    }

    let mut seen = Vec::new();
    let corpus = CorpusLoader::new(CorpusSettings::default()).load_with(dir, |p| seen.push(p.to_string())).expect("load");

    let paths: Vec<String> = corpus.documents().iter().map(|d| d.path.clone()).collect();
    assert_eq!(paths, vec!["a.json", "b/a.txt", "b/z.json", "c.json"]);
    assert_eq!(seen, paths);
}

#[test]
fn missing_root_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let err = CorpusLoader::default().load(&tmp.path().join("nope")).unwrap_err();
    assert!(matches!(err, Error::CorpusRoot { .. }));
}

#[test]
fn kind_is_sniffed_from_top_level_keys() {
    let kind = |json: &str| DocumentKind::of(&Content::from_value(serde_json::from_str(json).unwrap()));
    assert_eq!(kind(r#"{"scholarship_name": "Kanyashree", "benefits": []}"#), DocumentKind::NamedEntity);
    assert_eq!(kind(r#"{"title": "Oasis", "eligibility": "SC/ST"}"#), DocumentKind::NamedEntity);
    assert_eq!(kind(r#"{"name": "Dr. Roy", "designation": "HOD"}"#), DocumentKind::PersonRecord);
    assert_eq!(kind(r#"{"course_code": "BSCM101"}"#), DocumentKind::CourseRecord);
    assert_eq!(kind(r#"{"date": "2025-08-15", "day": "Friday"}"#), DocumentKind::EventRecord);
    assert_eq!(kind(r#"{"hostel": "A"}"#), DocumentKind::GenericMap);
    assert_eq!(kind(r#"[1, 2]"#), DocumentKind::ListDoc);
    assert_eq!(kind(r#""plain""#), DocumentKind::PlainText);
}

#[test]
fn document_caches_folded_text_and_stem() {
    let doc = Document::new("Scholarship/Kanyashree.json", Content::Text("Kanyashree K2".into())).unwrap();
    assert_eq!(doc.folded_text(), "kanyashree k2");
    assert_eq!(doc.folded_stem(), "kanyashree");
    assert_eq!(doc.kind(), DocumentKind::PlainText);
}

#[test]
fn text_helpers() {
    let s = "Straße İstanbul";
    assert_eq!(fold_case(s).len(), s.len(), "folding keeps byte offsets");
    assert_eq!(truncate_chars("héllo", 2), "hé");
    assert_eq!(truncate_chars("hi", 10), "hi");
    assert_eq!(humanize_key("eligibility_criteria"), "Eligibility Criteria");
}

#[test]
fn intent_round_trips_through_strings() {
    for intent in Intent::ALL {
        assert_eq!(intent.as_str().parse::<Intent>().unwrap(), intent);
    }
    assert!("weather".parse::<Intent>().is_err());
}

#[test]
fn config_defaults_and_overrides() {
    let config = Config::from_toml_str(
        r#"
        [corpus]
        root = "/srv/knowledge"

        [rank]
        top_k = 8

        [rank.boosts]
        intent_factor = 4.0

        [logging]
        format = "json"
        "#,
    )
    .expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.corpus.root, "/srv/knowledge");
    assert_eq!(settings.rank.top_k, 8);
    assert_eq!(settings.rank.boosts.intent_factor, 4.0);
    assert_eq!(settings.rank.boosts.exact_entity_bonus, 50.0, "untouched weights keep defaults");
    assert_eq!(settings.context.max_documents, 3);
    assert_eq!(settings.logging.format, LogFormat::Json);
    assert_eq!(config.get::<usize>("rank.top_k").unwrap(), 8);
}

#[test]
fn config_rejects_zero_top_k() {
    assert!(Config::from_toml_str("[rank]\ntop_k = 0\n").is_err());
}

#[test]
fn config_rejects_negative_or_non_finite_boosts() {
    assert!(Config::from_toml_str("[rank.boosts]\nintent_factor = -1.0\n").is_err());
    assert!(Config::from_toml_str("[rank.boosts]\nexact_entity_bonus = nan\n").is_err());
    assert!(Config::from_toml_str("[rank.boosts]\npath_token_multiplier = inf\n").is_err());
    assert!(Config::from_toml_str("[rank.boosts]\nintent_factor = 0.0\n").is_ok());
}

#[test]
fn snapshot_swap_keeps_old_readers_valid() {
    let snapshot = Snapshot::new(vec![1, 2, 3]);
    let before = snapshot.load();
    let replaced = snapshot.swap(vec![4]);
    assert!(Arc::ptr_eq(&before, &replaced));
    assert_eq!(*before, vec![1, 2, 3]);
    assert_eq!(*snapshot.load(), vec![4]);
}
