use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use unibot_core::corpus::Corpus;
use unibot_core::text::fold_case;
use unibot_core::types::{Content, Document};
use unibot_core::{Error, Result};

const OFFICE_HOURS: &str = "Office Hours: 9:00 AM - 6:00 PM (Monday to Saturday)\nNote: Closed on Sundays and public holidays.";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl Default for Contact {
    fn default() -> Self { Self { name: "Registrar's Office".to_string(), phone: "033-69010507".to_string() } }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HelplineCategory {
    pub keywords: Vec<String>,
    pub department: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub contact_persons: Vec<Contact>,
}

/// Keyword-routed contacts used when the knowledge base has no answer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HelplineDirectory {
    pub categories: Vec<HelplineCategory>,
    pub fallback_contact: Contact,
}

impl HelplineDirectory {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let parse_err = |reason: String| Error::CorpusParse { path: doc.path.clone(), reason };
        match &doc.content {
            Content::Map(map) => HelplineDirectory::deserialize(&Value::Object(map.clone())).map_err(|e| parse_err(e.to_string())),
            _ => Err(parse_err("helpline directory must be a JSON object".to_string())),
        }
    }

    /// The directory at `path`, or an empty one that always answers with the
    /// fallback contact.
    pub fn from_corpus(corpus: &Corpus, path: Option<&str>) -> Self {
        let Some(path) = path else { return Self::default() };
        match corpus.get(path).map(Self::from_document) {
            Some(Ok(directory)) => directory,
            Some(Err(e)) => {
                warn!(error = %e, "helpline directory unreadable, using fallback contact");
                Self::default()
            }
            None => {
                warn!(path, "helpline directory not in corpus, using fallback contact");
                Self::default()
            }
        }
    }

    /// First category with a keyword contained in the query.
    pub fn category_for(&self, query: &str) -> Option<&HelplineCategory> {
        let query = fold_case(query);
        self.categories.iter().find(|c| c.keywords.iter().any(|kw| !kw.is_empty() && query.contains(&fold_case(kw))))
    }

    /// Contact block for `query`: the matching category, else the fallback.
    pub fn contact_for(&self, query: &str) -> String {
        let mut lines = vec!["Contact Information:".to_string()];
        match self.category_for(query) {
            Some(category) if !category.contact_persons.is_empty() => {
                lines.push(format!("Department: {}", category.department.as_deref().unwrap_or("N/A")));
                lines.push("Contact persons:".to_string());
                lines.extend(category.contact_persons.iter().map(|p| format!("  - {}: {}", p.name, p.phone)));
            }
            Some(category) => {
                lines.push(format!("Contact: {}", category.contact_person.as_deref().unwrap_or("N/A")));
                if let Some(department) = &category.department {
                    lines.push(format!("Department: {department}"));
                }
                lines.push(format!("Phone: {}", category.phone.as_deref().unwrap_or("N/A")));
            }
            None => {
                lines.push("For assistance, please contact:".to_string());
                lines.push(format!("Contact: {}", self.fallback_contact.name));
                lines.push(format!("Phone: {}", self.fallback_contact.phone));
            }
        }
        lines.push(String::new());
        lines.push(OFFICE_HOURS.to_string());
        lines.join("\n")
    }
}
