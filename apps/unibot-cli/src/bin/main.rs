use async_trait::async_trait;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use unibot_answer::{Assistant, GeminiClient, Knowledge};
use unibot_core::config::{expand_path, Config, Settings};
use unibot_core::logging::init_logging;
use unibot_core::text::truncate_chars;
use unibot_core::traits::Generator;
use unibot_core::types::Intent;
use unibot_core::GenerateError;
use unibot_rank::{classify, IntentClassifier, KeywordRanker};

#[derive(Parser, Debug)]
#[command(name = "unibot", version, about = "Ask the university knowledge base", long_about = None)]
struct Cli {
    /// Corpus directory (defaults to `corpus.root` from config)
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the intent a query is classified as
    Classify { query: String },
    /// List the best matching documents with scores and snippets
    Rank {
        query: String,
        /// Rank as if the query had this intent
        #[arg(short, long)]
        intent: Option<Intent>,
        /// Number of documents (defaults to `rank.top_k`)
        #[arg(short)]
        k: Option<usize>,
    },
    /// Print the context block the generator would receive
    Context { query: String },
    /// Answer a query end to end
    Ask {
        query: String,
        /// Print the answer, intent and sources as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Used when no generator endpoint is configured: every answer is built from
/// the retrieved documents.
struct Unconfigured(String);

#[async_trait]
impl Generator for Unconfigured {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> { Err(GenerateError::NotConfigured(self.0.clone())) }
}

fn generator(settings: &Settings) -> Arc<dyn Generator> {
    match GeminiClient::from_settings(&settings.generator) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!(error = %e, "generator unavailable, answers come from retrieved documents only");
            Arc::new(Unconfigured(e.to_string()))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    init_logging(&settings.logging);
    let root = cli.corpus.clone().unwrap_or_else(|| expand_path(&settings.corpus.root));

    match cli.command {
        Command::Classify { query } => println!("{}", classify(&query)),
        Command::Rank { query, intent, k } => {
            let knowledge = Knowledge::load_from(&root, &settings)?;
            let ranker = KeywordRanker::new(settings.rank.clone());
            let intent = intent.unwrap_or_else(|| classify(&query));
            let ranked = ranker.rank(&query, intent, knowledge.corpus(), k.unwrap_or(settings.rank.top_k));
            println!("intent: {intent}");
            if ranked.is_empty() {
                println!("no matching documents");
            }
            for (i, scored) in ranked.iter().enumerate() {
                println!("{:>2}. {:>10.2}  {}", i + 1, scored.score, scored.document.path);
                println!("    {}", truncate_chars(&scored.snippet, 160));
            }
        }
        Command::Context { query } => {
            let assistant = assistant(&settings, &root)?;
            let (intent, block) = assistant.context_for(&query)?;
            println!("intent: {intent}\n");
            println!("{}", block.text);
        }
        Command::Ask { query, json } => {
            let assistant = assistant(&settings, &root)?;
            let answer = tokio::runtime::Runtime::new()?.block_on(assistant.answer(&query))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}", answer.text);
                if !answer.sources.is_empty() {
                    println!("\nSources:");
                    for source in &answer.sources {
                        println!("  {} ({:.2})", source.path, source.score);
                    }
                }
            }
        }
    }
    Ok(())
}

fn assistant(settings: &Settings, root: &std::path::Path) -> anyhow::Result<Assistant<IntentClassifier, KeywordRanker, Arc<dyn Generator>>> {
    let knowledge = Knowledge::load_from(root, settings)?;
    Ok(Assistant::new(knowledge, IntentClassifier::default(), KeywordRanker::new(settings.rank.clone()), generator(settings), settings))
}
