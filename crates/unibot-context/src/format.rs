//! Per-kind rendering of a ranked document into prompt-ready text.
//!
//! Nested values become indented lines. Structured content is never dumped
//! as JSON.

use serde_json::{Map, Value};

use unibot_core::config::ContextSettings;
use unibot_core::kind::DocumentKind;
use unibot_core::text::{humanize_key, truncate_chars};
use unibot_core::types::{Content, Document};

/// Appended to every named-entity block. The generator should explain the
/// record in its own words rather than repeat it.
pub const PERSONALIZATION_DIRECTIVE: &str = "Instructions for using this record:
- Do not copy this data verbatim.
- Read the eligibility, benefits and requirements, then answer the user's specific question in your own words.
- If the user mentions their year, course, income or community, tailor the eligibility check to it.
- Suggest next steps that fit their situation.";

const TEXT_TRUNCATED: &str = "...\n[Text truncated for context]";
const NESTED_DEPTH: usize = 1;
const FAQ_ITEMS: usize = 5;
const COURSE_MODULES: usize = 5;
const COURSE_OUTCOMES: usize = 3;
const COURSE_PREREQUISITES: usize = 3;

const ENTITY_HEADER: &[(&str, &[&str])] = &[
    ("Name", &["scholarship_name", "official_name", "popular_name", "name", "title"]),
    ("ID", &["scholarship_id", "id"]),
    ("Type", &["scholarship_type", "type"]),
];
const OVERVIEW_KEYS: &[&str] = &["introduction", "overview", "description", "summary"];
const ENTITY_DETAILS: &[(&str, &[&str])] = &[
    ("Eligibility", &["eligibility", "eligibility_criteria", "who_should_apply"]),
    ("Income Limit", &["income_limit"]),
    ("Target Group", &["target_group"]),
    ("Communities Covered", &["minority_communities_covered"]),
    ("Academic Levels", &["academic_level", "course_levels_supported"]),
    ("Benefits", &["scholarship_benefits", "benefits"]),
];
const APPLICATION_KEYS: &[&str] = &["application_process", "how_to_apply", "application_steps"];
const ENTITY_TRAILER: &[(&str, &[&str])] = &[
    ("Required Documents", &["required_documents", "documents_required"]),
    ("Important Dates", &["important_dates", "deadlines"]),
];
const ENTITY_SOURCE: &[(&str, &[&str])] =
    &[("Data Source", &["data_source"]), ("Official Website", &["official_website", "website"])];

const PERSON_FIELDS: &[(&str, &[&str])] = &[
    ("Name", &["name"]),
    ("Role", &["designation", "position", "role"]),
    ("Department", &["department"]),
    ("Qualification", &["qualification"]),
    ("Specialization", &["specialization", "research_area", "research_areas"]),
    ("Email", &["email"]),
    ("Phone", &["phone", "mobile"]),
];

const COURSE_HEADER: &[(&str, &[&str])] = &[
    ("Subject", &["subject_name", "course_name"]),
    ("Code", &["subject_code", "course_code"]),
    ("Summary", &["summary", "description"]),
];

const EVENT_FIELDS: &[(&str, &[&str])] = &[
    ("Holiday", &["holiday_name"]),
    ("Exam", &["exam_name"]),
    ("Event", &["event"]),
    ("Date", &["date", "exam_date"]),
    ("Day", &["day"]),
    ("Time", &["time"]),
    ("Duration", &["duration"]),
    ("Subjects", &["subjects"]),
];

#[derive(Debug, Default)]
struct Lines(Vec<String>);

impl Lines {
    fn push(&mut self, indent: usize, text: impl AsRef<str>) {
        self.0.push(format!("{}{}", "  ".repeat(indent), text.as_ref()));
    }

    fn more(&mut self, indent: usize, total: usize, shown: usize) {
        if total > shown {
            self.push(indent, format!("+{} more", total - shown));
        }
    }

    fn finish(self) -> String { self.0.join("\n") }
}

#[derive(Debug, Clone)]
pub struct DocumentFormatter {
    list_items: usize,
    scalar_fields: usize,
    text_chars: usize,
    value_chars: usize,
}

impl DocumentFormatter {
    pub fn new(settings: &ContextSettings) -> Self {
        Self {
            list_items: settings.list_items,
            scalar_fields: settings.scalar_fields,
            text_chars: settings.text_chars,
            value_chars: settings.value_chars,
        }
    }

    /// `[Source: <path>]` followed by the kind-specific body.
    pub fn format(&self, doc: &Document) -> String {
        let mut out = Lines::default();
        out.push(0, format!("[Source: {}]", doc.path));
        match (&doc.content, doc.kind()) {
            (Content::Map(map), DocumentKind::NamedEntity) => self.named_entity(map, &mut out),
            (Content::Map(map), DocumentKind::PersonRecord) => self.fields(map, PERSON_FIELDS, &mut out),
            (Content::Map(map), DocumentKind::CourseRecord) => self.course(map, &mut out),
            (Content::Map(map), DocumentKind::EventRecord) => self.fields(map, EVENT_FIELDS, &mut out),
            (Content::Map(map), _) => self.nested_map(&mut out, 0, map, NESTED_DEPTH),
            (Content::List(items), _) => self.list(items, &mut out),
            (Content::Text(text), _) => self.text(text, &mut out),
        }
        out.finish()
    }

    fn named_entity(&self, map: &Map<String, Value>, out: &mut Lines) {
        self.fields(map, ENTITY_HEADER, out);
        if let Some(overview) = first(map, OVERVIEW_KEYS) {
            let overview = overview.get("description").filter(|d| d.is_string()).unwrap_or(overview);
            self.field(out, "Overview", overview);
        }
        self.fields(map, ENTITY_DETAILS, out);
        if first(map, &["income_limit"]).is_none() {
            if let Some(income) = first(map, &["eligibility", "eligibility_criteria"]).and_then(|e| e.get("income_criteria")) {
                self.field(out, "Income Limit", income);
            }
        }
        if let Some(steps) = first(map, APPLICATION_KEYS) {
            match steps {
                Value::Array(items) => {
                    out.push(0, "Application Steps:");
                    for (i, step) in items.iter().enumerate() {
                        out.push(1, format!("Step {}: {}", i + 1, self.inline(step)));
                    }
                }
                other => self.field(out, "Application Steps", other),
            }
        }
        self.fields(map, ENTITY_TRAILER, out);
        if let Some(faq) = first(map, &["faq", "faqs"]) {
            match faq {
                Value::Array(items) => {
                    out.push(0, "FAQ:");
                    for item in items.iter().take(FAQ_ITEMS) {
                        out.push(1, format!("- {}", self.inline(item)));
                    }
                }
                other => self.field(out, "FAQ", other),
            }
        }
        self.fields(map, ENTITY_SOURCE, out);
        out.push(0, "");
        out.push(0, PERSONALIZATION_DIRECTIVE);
    }

    fn course(&self, map: &Map<String, Value>, out: &mut Lines) {
        self.fields(map, COURSE_HEADER, out);
        if let Some(Value::Array(modules)) = first(map, &["modules"]) {
            out.push(0, format!("Modules ({}):", modules.len()));
            for (i, module) in modules.iter().take(COURSE_MODULES).enumerate() {
                let number = first_scalar(module, &["module_no", "module_number"]).unwrap_or_else(|| (i + 1).to_string());
                let title = first_scalar(module, &["title", "name"]).unwrap_or_else(|| self.inline(module));
                out.push(1, format!("- Module {number}: {title}"));
            }
        }
        if let Some(Value::Array(outcomes)) = first(map, &["course_outcomes", "outcomes"]) {
            out.push(0, format!("Course Outcomes ({}):", outcomes.len()));
            for (i, outcome) in outcomes.iter().take(COURSE_OUTCOMES).enumerate() {
                out.push(1, format!("{}. {}", i + 1, self.inline(outcome)));
            }
        }
        if let Some(Value::Array(prereqs)) = first(map, &["prerequisites"]) {
            let shown: Vec<String> = prereqs.iter().take(COURSE_PREREQUISITES).map(|p| self.inline(p)).collect();
            out.push(0, format!("Prerequisites: {}", shown.join(", ")));
        }
    }

    fn list(&self, items: &[Value], out: &mut Lines) {
        out.push(0, format!("Contains {} items:", items.len()));
        for (i, item) in items.iter().take(self.list_items).enumerate() {
            out.push(1, format!("{}. {}", i + 1, self.inline(item)));
        }
        out.more(1, items.len(), self.list_items);
    }

    fn text(&self, text: &str, out: &mut Lines) {
        let shown = truncate_chars(text, self.text_chars);
        if shown.len() < text.len() {
            out.push(0, format!("{shown}{TEXT_TRUNCATED}"));
        } else {
            out.push(0, text);
        }
    }

    fn fields(&self, map: &Map<String, Value>, table: &[(&str, &[&str])], out: &mut Lines) {
        for (label, keys) in table {
            if let Some(value) = first(map, keys) {
                self.field(out, label, value);
            }
        }
    }

    /// Top-level field of a curated record: scalars are kept whole.
    fn field(&self, out: &mut Lines, label: &str, value: &Value) {
        match value {
            Value::Object(map) => {
                out.push(0, format!("{label}:"));
                self.nested_map(out, 1, map, NESTED_DEPTH);
            }
            Value::Array(items) if items.iter().all(is_scalar) && items.len() <= self.list_items => {
                let joined: Vec<String> = items.iter().filter_map(scalar).collect();
                out.push(0, format!("{label}: {}", joined.join(", ")));
            }
            Value::Array(items) => {
                out.push(0, format!("{label}:"));
                self.nested_list(out, 1, items);
            }
            other => out.push(0, format!("{label}: {}", scalar(other).unwrap_or_default())),
        }
    }

    /// Every top-level key is emitted; nested maps stop at `list_items`.
    fn nested_map(&self, out: &mut Lines, indent: usize, map: &Map<String, Value>, depth: usize) {
        let limit = if indent == 0 { map.len() } else { self.list_items };
        for (key, value) in map.iter().take(limit) {
            let key = humanize_key(key);
            match value {
                Value::Object(inner) if depth > 0 => {
                    out.push(indent, format!("{key}:"));
                    self.nested_map(out, indent + 1, inner, depth - 1);
                }
                Value::Array(items) if depth > 0 && !items.iter().all(is_scalar) => {
                    out.push(indent, format!("{key}:"));
                    self.nested_list(out, indent + 1, items);
                }
                other => out.push(indent, format!("{key}: {}", self.inline(other))),
            }
        }
        out.more(indent, map.len(), limit);
    }

    fn nested_list(&self, out: &mut Lines, indent: usize, items: &[Value]) {
        for item in items.iter().take(self.list_items) {
            out.push(indent, format!("- {}", self.inline(item)));
        }
        out.more(indent, items.len(), self.list_items);
    }

    /// One-line rendering: scalars clipped, objects summarised by their first
    /// scalar fields, arrays joined.
    fn inline(&self, value: &Value) -> String {
        match value {
            Value::Object(map) => {
                let fields: Vec<String> = map
                    .iter()
                    .filter_map(|(k, v)| scalar(v).map(|v| format!("{}: {}", humanize_key(k), self.clip(&v))))
                    .take(self.scalar_fields)
                    .collect();
                if fields.is_empty() {
                    format!("({} fields)", map.len())
                } else {
                    fields.join(", ")
                }
            }
            Value::Array(items) => {
                let mut shown: Vec<String> = items.iter().take(self.list_items).map(|v| self.inline(v)).collect();
                if items.len() > self.list_items {
                    shown.push(format!("+{} more", items.len() - self.list_items));
                }
                shown.join(", ")
            }
            other => self.clip(&scalar(other).unwrap_or_default()),
        }
    }

    fn clip(&self, value: &str) -> String {
        let shown = truncate_chars(value, self.value_chars);
        if shown.len() < value.len() {
            format!("{shown}...")
        } else {
            value.to_string()
        }
    }
}

impl Default for DocumentFormatter {
    fn default() -> Self { Self::new(&ContextSettings::default()) }
}

fn first<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| map.get(*k)).find(|v| !is_blank(v))
}

fn first_scalar(value: &Value, keys: &[&str]) -> Option<String> { keys.iter().find_map(|k| value.get(*k).and_then(scalar)) }

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn is_scalar(value: &Value) -> bool { matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_)) }

pub(crate) fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
