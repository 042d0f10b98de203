use once_cell::sync::Lazy;
use regex::Regex;

use unibot_core::traits::Classifier;
use unibot_core::types::Intent;

static DEFAULT_CLASSIFIER: Lazy<IntentClassifier> = Lazy::new(IntentClassifier::default);

/// Classify with the built-in rule table.
pub fn classify(query: &str) -> Intent { DEFAULT_CLASSIFIER.classify(query) }

/// Ordered `(intent, pattern)` rules over the lowercased query; the first
/// matching rule wins and `General` is the fallback.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<(Intent, Regex)>,
}

impl IntentClassifier {
    pub fn new(rules: Vec<(Intent, Regex)>) -> Self { Self { rules } }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        let table: [(Intent, &[&str], Option<&str>); 8] = [
            (
                Intent::Scholarship,
                &["scholarship", "scholarships", "stipend", "grant", "financial aid", "financial assistance", "kanyashree", "aikyashree", "nabanna", "svmcm", "oasis", "medha britti"],
                None,
            ),
            (
                Intent::Faculty,
                &["hod", "faculty", "professor", "professors", "teacher", "teachers", "lecturer", "head of department", "dean", "mentor"],
                None,
            ),
            (Intent::Subject, &["syllabus", "subject", "subjects", "course outcome", "module", "modules", "semester"], Some(r"\b[a-z]{2,6}-?\d{3}\b")),
            (Intent::Holiday, &["holiday", "holidays", "vacation", "semester break", "puja break", "off day", "closed"], None),
            (Intent::Exam, &["exam", "exams", "examination", "attendance", "mid sem", "end sem", "result", "results"], None),
            (Intent::Library, &["library", "reading room", "book", "books", "librarian"], None),
            (
                Intent::Rules,
                &["rule", "rules", "policy", "regulation", "allowed", "prohibited", "banned", "fine", "penalty", "discipline", "dress code", "ragging"],
                None,
            ),
            (Intent::About, &["brainware", "about the university", "vision", "mission", "accreditation", "naac", "established", "campus"], None),
        ];
        let rules = table
            .iter()
            .map(|(intent, keywords, extra)| {
                let alternation = keywords.iter().map(|k| regex::escape(k)).collect::<Vec<_>>().join("|");
                let pattern = match extra {
                    Some(extra) => format!(r"\b(?:{alternation})\b|{extra}"),
                    None => format!(r"\b(?:{alternation})\b"),
                };
                (*intent, Regex::new(&pattern).expect("intent rule table is valid"))
            })
            .collect();
        Self { rules }
    }
}

impl Classifier for IntentClassifier {
    fn classify(&self, query: &str) -> Intent {
        let q = query.to_lowercase();
        self.rules.iter().find(|(_, pattern)| pattern.is_match(&q)).map_or(Intent::General, |(intent, _)| *intent)
    }
}
