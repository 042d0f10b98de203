//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_RANK__TOP_K=8`). Provides helpers to expand `~` and `${VAR}` and to
//! resolve relative paths against a known base directory.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with an inline TOML document; used by tests and tools
    /// that carry their configuration in memory.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(toml));
        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.rank.top_k == 0 {
            anyhow::bail!(crate::Error::InvalidConfig("rank.top_k must be at least 1".into()));
        }
        let boosts = &settings.rank.boosts;
        for (name, weight) in [
            ("intent_factor", boosts.intent_factor),
            ("exact_entity_bonus", boosts.exact_entity_bonus),
            ("exact_entity_multiplier", boosts.exact_entity_multiplier),
            ("entity_folder_multiplier", boosts.entity_folder_multiplier),
            ("entity_related_multiplier", boosts.entity_related_multiplier),
            ("path_token_multiplier", boosts.path_token_multiplier),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                anyhow::bail!(crate::Error::InvalidConfig(format!(
                    "rank.boosts.{name} must be a finite non-negative number, got {weight}"
                )));
            }
        }
        let threshold = boosts.path_similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!(crate::Error::InvalidConfig(format!(
                "rank.boosts.path_similarity_threshold must be within 0..=1, got {threshold}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub rank: RankSettings,
    pub context: ContextSettings,
    pub generator: GeneratorSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub root: String,
    pub skip_dirs: Vec<String>,
    pub json_extensions: Vec<String>,
    pub jsonl_extensions: Vec<String>,
    pub text_extensions: Vec<String>,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            root: "data".to_string(),
            skip_dirs: [".git", ".venv", "venv", "__pycache__", "node_modules", "target"].map(String::from).to_vec(),
            json_extensions: vec!["json".to_string()],
            jsonl_extensions: vec!["jsonl".to_string(), "ndjson".to_string()],
            text_extensions: vec!["txt".to_string()],
        }
    }
}

/// Tuning constants of the keyword scorer. The defaults are empirically
/// tuned; only the relative ordering they produce is relied upon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostWeights {
    pub intent_factor: f64,
    pub exact_entity_bonus: f64,
    pub exact_entity_multiplier: f64,
    pub entity_folder_multiplier: f64,
    pub entity_related_multiplier: f64,
    pub path_token_multiplier: f64,
    pub path_similarity_threshold: f64,
    pub min_entity_term_chars: usize,
}

impl Default for BoostWeights {
    fn default() -> Self {
        Self {
            intent_factor: 3.0,
            exact_entity_bonus: 50.0,
            exact_entity_multiplier: 15.0,
            entity_folder_multiplier: 5.0,
            entity_related_multiplier: 3.0,
            path_token_multiplier: 0.5,
            path_similarity_threshold: 0.45,
            min_entity_term_chars: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankSettings {
    pub top_k: usize,
    pub boosts: BoostWeights,
    /// Intent name -> path fragments that mark a document as belonging to it.
    pub intent_markers: BTreeMap<String, Vec<String>>,
    /// Key -> aliases added whenever a search term contains the key.
    pub synonyms: BTreeMap<String, Vec<String>>,
    /// Folder holding one file per named entity (scheme).
    pub entity_folder: String,
    /// Looser path fragment for entity-related documents.
    pub entity_marker: String,
    pub entity_keywords: Vec<String>,
}

impl Default for RankSettings {
    fn default() -> Self {
        let markers: [(&str, &[&str]); 7] = [
            ("rules", &["university_rule", "rules"]),
            ("library", &["library"]),
            ("holiday", &["holiday"]),
            ("faculty", &["faculty"]),
            ("exam", &["exam", "attendance"]),
            ("subject", &["syllabus", "sem_explain", "subject"]),
            ("about", &["about", "vision_and_mission"]),
        ];
        let synonyms: [(&str, &[&str]); 3] = [
            ("kanyashree", &["kanya shree", "kanya-shree", "kanyashree prakalpa"]),
            ("aikyashree", &["aikya shree"]),
            ("kanya", &["kanyashree"]),
        ];
        let to_map = |pairs: &[(&str, &[&str])]| {
            pairs
                .iter()
                .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
                .collect::<BTreeMap<String, Vec<String>>>()
        };
        Self {
            top_k: 5,
            boosts: BoostWeights::default(),
            intent_markers: to_map(&markers),
            synonyms: to_map(&synonyms),
            entity_folder: "scholarship/data/detailed scholarship".to_string(),
            entity_marker: "scholarship".to_string(),
            entity_keywords: [
                "scholarship", "kanyashree", "kanya", "aikyashree", "k2", "k3", "nabanna", "vivekananda",
                "vidyalankar", "oasis", "medha britti", "credit card", "financial aid", "financial assistance",
                "grant", "stipend",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// An always-on context section: either a corpus document or inline text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSource {
    pub title: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub budget: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    pub max_documents: usize,
    pub list_items: usize,
    pub scalar_fields: usize,
    pub text_chars: usize,
    pub value_chars: usize,
    pub truncation_marker: String,
    pub references: Vec<ReferenceSource>,
    pub rules_folder: String,
    pub rules_per_category: usize,
    pub rules_budget: usize,
    pub helplines_path: Option<String>,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            max_documents: 3,
            list_items: 10,
            scalar_fields: 5,
            text_chars: 800,
            value_chars: 200,
            truncation_marker: "\n...[truncated]".to_string(),
            references: vec![
                ReferenceSource { title: "Hostel Rules".into(), path: Some("hostel-rule-book.txt".into()), text: None, budget: 4000 },
                ReferenceSource { title: "Faculty Summary".into(), path: Some("Faculty/faculty.json".into()), text: None, budget: 1500 },
                ReferenceSource { title: "Academic Calendar".into(), path: Some("academic.json".into()), text: None, budget: 1000 },
                ReferenceSource { title: "Holidays".into(), path: Some("holiday.json".into()), text: None, budget: 1000 },
            ],
            rules_folder: "university_rule".to_string(),
            rules_per_category: 5,
            rules_budget: 4000,
            helplines_path: Some("Helplines/helplines.json".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self { Self { api_url: None, api_key: None, timeout_secs: 30 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self { Self { level: "info".to_string(), format: LogFormat::Pretty } }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
