use once_cell::sync::Lazy;
use regex::Regex;

use unibot_core::text::fold_case;

static CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\[[\w\-/.]+\.json\]\s*").expect("valid citation regex"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold regex"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("valid italic regex"));
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid code regex"));
static CONTROL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").expect("valid control regex"));

const GREETINGS: &[&str] = &["hi", "hello", "hey", "namaste", "good morning", "good afternoon", "good evening"];

pub const GREETING_REPLY: &str = "Hello! How can I help you today? Ask me about scholarships, faculty, syllabus, exams, holidays or university rules.";

/// Drop `[some/file.json]` citations, markdown emphasis and control
/// characters (newlines and tabs survive), then trim.
pub fn sanitize(text: &str) -> String {
    let text = CITATION.replace_all(text, " ");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = CODE.replace_all(&text, "$1");
    let text = CONTROL.replace_all(&text, "");
    text.trim().to_string()
}

/// The greeting `query` opens with, if it is nothing more than a greeting
/// (optionally followed by a space or comma and more words).
pub fn greeting(query: &str) -> Option<&'static str> {
    let query = fold_case(query.trim());
    GREETINGS.iter().copied().find(|g| {
        query == *g || query.strip_prefix(g).is_some_and(|rest| rest.starts_with(' ') || rest.starts_with(','))
    })
}
