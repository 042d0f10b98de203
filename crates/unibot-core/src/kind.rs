use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Content;

const SCHEME_KEYS: &[&str] = &["scholarship_name", "official_name", "scholarship_id"];
const ENTITY_NAME_KEYS: &[&str] = &["name", "title", "popular_name"];
const ENTITY_DETAIL_KEYS: &[&str] = &["eligibility", "eligibility_criteria", "benefits", "scholarship_benefits"];
const ROLE_KEYS: &[&str] = &["designation", "position", "role"];
const COURSE_KEYS: &[&str] = &["subject_name", "course_name", "subject_code", "course_code"];
const EVENT_KEYS: &[&str] = &["holiday_name", "exam_name", "exam_date"];

/// Structural shape of a document, decided by one pass over its top-level keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A named scheme with eligibility/benefit details (e.g. a scholarship).
    NamedEntity,
    /// A person with a role (faculty member, contact).
    PersonRecord,
    CourseRecord,
    /// Holiday or exam entry.
    EventRecord,
    GenericMap,
    ListDoc,
    PlainText,
}

impl DocumentKind {
    pub fn of(content: &Content) -> Self {
        match content {
            Content::Map(map) => Self::of_map(map),
            Content::List(_) => DocumentKind::ListDoc,
            Content::Text(_) => DocumentKind::PlainText,
        }
    }

    fn of_map(map: &Map<String, Value>) -> Self {
        let has = |keys: &[&str]| keys.iter().any(|k| map.contains_key(*k));
        if has(SCHEME_KEYS) || (has(ENTITY_NAME_KEYS) && has(ENTITY_DETAIL_KEYS)) {
            DocumentKind::NamedEntity
        } else if map.contains_key("name") && has(ROLE_KEYS) {
            DocumentKind::PersonRecord
        } else if has(COURSE_KEYS) {
            DocumentKind::CourseRecord
        } else if has(EVENT_KEYS) || (map.contains_key("date") && map.contains_key("day")) {
            DocumentKind::EventRecord
        } else {
            DocumentKind::GenericMap
        }
    }
}
