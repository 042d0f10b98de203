use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

use unibot_core::config::{expand_path, Config};
use unibot_core::corpus::CorpusLoader;
use unibot_core::logging::init_logging;
use unibot_core::types::{Content, Document};

const SHOWN_KEYS: usize = 8;

/// List every document the loader accepts, with its kind and shape, plus the
/// files it rejected.
#[derive(Parser, Debug)]
#[command(name = "unibot-manifest", version, long_about = None)]
struct Args {
    /// Corpus directory (defaults to `corpus.root` from config)
    root: Option<PathBuf>,

    /// Emit the manifest as JSON
    #[arg(long)]
    json: bool,
}

fn shape(doc: &Document) -> String {
    match &doc.content {
        Content::Map(map) => {
            let keys: Vec<&str> = map.keys().take(SHOWN_KEYS).map(String::as_str).collect();
            let more = map.len().saturating_sub(SHOWN_KEYS);
            if more > 0 {
                format!("keys: {} (+{more} more)", keys.join(", "))
            } else {
                format!("keys: {}", keys.join(", "))
            }
        }
        Content::List(items) => format!("{} items", items.len()),
        Content::Text(text) => format!("{} chars", text.chars().count()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    init_logging(&settings.logging);
    let root = args.root.unwrap_or_else(|| expand_path(&settings.corpus.root));

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} files {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    let corpus = CorpusLoader::new(settings.corpus.clone()).load_with(&root, |path| {
        pb.inc(1);
        pb.set_message(path.to_string());
    })?;
    pb.finish_with_message(format!("loaded {} documents, {} failed", corpus.len(), corpus.failures().len()));

    if args.json {
        let manifest = json!({
            "root": corpus.root().display().to_string(),
            "documents": corpus.documents().iter().map(|d| json!({
                "path": d.path,
                "kind": d.kind(),
                "shape": shape(d),
            })).collect::<Vec<_>>(),
            "failures": corpus.failures().iter().map(|f| json!({"path": f.path, "error": f.error})).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }

    println!("Corpus: {}", corpus.root().display());
    for doc in corpus.documents() {
        println!("  {:<60} {:<14} {}", doc.path, format!("{:?}", doc.kind()), shape(doc));
    }
    if !corpus.failures().is_empty() {
        println!("\nFailed to load:");
        for failure in corpus.failures() {
            println!("  {}: {}", failure.path, failure.error);
        }
    }
    Ok(())
}
