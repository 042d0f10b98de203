use serde_json::json;

use unibot_core::config::{ContextSettings, ReferenceSource};
use unibot_core::corpus::Corpus;
use unibot_core::types::{Content, Document, Intent};
use unibot_context::{
    build_references, flatten_reference, ContextAssembler, DocumentFormatter, HelplineDirectory, ReferenceSection,
    RulesDigest, NO_RELEVANT_INFORMATION, PERSONALIZATION_DIRECTIVE,
};
use unibot_rank::KeywordRanker;

fn doc(path: &str, value: serde_json::Value) -> Document {
    Document::new(path, Content::from_value(value)).expect("document")
}

fn corpus(docs: Vec<Document>) -> Corpus { Corpus::from_documents("/corpus", docs, vec![]) }

#[test]
fn kanyashree_context_is_personalised_summary_not_raw_json() {
    let corpus = corpus(vec![
        doc(
            "nabanna.json",
            json!({"scholarship_name": "Nabanna", "introduction": "Relief fund support.", "benefits": ["Rs 5000 per year"]}),
        ),
        doc(
            "kanyashree.json",
            json!({
                "scholarship_name": "Kanyashree (K2)",
                "introduction": "One-time grant for girls pursuing higher education.",
                "eligibility": {"age": "18 to 19 years", "income_criteria": "Family income below Rs 1.2 lakh"},
                "application_process": ["Collect the form from the institution", "Submit with documents"],
                "required_documents": ["Aadhaar card", "Bank passbook"],
            }),
        ),
    ]);
    let ranker = KeywordRanker::default();
    let ranked = ranker.rank("tell me about kanyashree", Intent::Scholarship, &corpus, 5);
    assert_eq!(ranked[0].document.path, "kanyashree.json");

    let block = ContextAssembler::default().assemble("tell me about kanyashree", &ranked, &[]);

    assert!(block.text.contains(PERSONALIZATION_DIRECTIVE));
    assert!(block.text.contains("Overview: One-time grant for girls pursuing higher education."));
    assert!(block.text.contains("Step 2: Submit with documents"));
    assert!(block.text.contains("Income Criteria: Family income below Rs 1.2 lakh"));
    assert!(!block.text.contains("\"scholarship_name\""), "no raw JSON in context:\n{}", block.text);
    assert!(!block.text.contains('{'));
    assert_eq!(block.sources[0].path, "kanyashree.json");
}

#[test]
fn at_most_max_documents_are_formatted_in_rank_order() {
    let docs: Vec<Document> = (0..5).map(|i| doc(&format!("notes/n{i}.txt"), json!("bus timings ".repeat(i + 1)))).collect();
    let corpus = corpus(docs);
    let ranked = KeywordRanker::default().rank("bus", Intent::General, &corpus, 5);
    assert_eq!(ranked.len(), 5);

    let block = ContextAssembler::default().assemble("bus", &ranked, &[]);

    assert_eq!(block.sources.len(), 3);
    let first = block.text.find("[Source: notes/n4.txt]").expect("top document");
    let second = block.text.find("[Source: notes/n3.txt]").expect("second document");
    assert!(first < second);
    assert!(!block.text.contains("notes/n0.txt"));
}

#[test]
fn empty_ranking_keeps_references_and_says_so() {
    let refs = vec![ReferenceSection::new("Holidays", "2025-01-26 (Sunday): Republic Day", 1000)];

    let block = ContextAssembler::default().assemble("anything", &[], &refs);

    assert_eq!(block.text, format!("Holidays:\n2025-01-26 (Sunday): Republic Day\n\n{NO_RELEVANT_INFORMATION}"));
    assert!(block.sources.is_empty());
}

#[test]
fn reference_truncation_respects_budget() {
    let marker = ContextSettings::default().truncation_marker;
    let section = ReferenceSection::new("Hostel Rules", "é".repeat(50), 20);

    let body = section.render_body(&marker);

    assert!(body.chars().count() <= 20 + marker.chars().count());
    assert!(body.ends_with(&marker));
    assert_eq!(ReferenceSection::new("Short", "ok", 20).render_body(&marker), "ok");
}

#[test]
fn references_are_flattened_from_corpus_documents() {
    let corpus = corpus(vec![
        doc(
            "holiday.json",
            json!([
                {"date": "2025-01-26", "day": "Sunday", "event": "Republic Day"},
                {"date": "2025-08-15", "day": "Friday", "event": "Independence Day"}
            ]),
        ),
        doc("academic.json", json!({"odd_semester_start": "2025-08-01", "mid_sem": "2025-10-06"})),
    ]);
    let specs = vec![
        ReferenceSource { title: "Holidays".into(), path: Some("holiday.json".into()), text: None, budget: 1000 },
        ReferenceSource { title: "Academic Calendar".into(), path: Some("academic.json".into()), text: None, budget: 1000 },
        ReferenceSource { title: "Missing".into(), path: Some("nope.json".into()), text: None, budget: 1000 },
        ReferenceSource { title: "Hostel Quick Facts".into(), path: None, text: Some("Rooms are cleaned daily.".into()), budget: 500 },
    ];

    let sections = build_references(&corpus, &specs);

    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Holidays", "Academic Calendar", "Hostel Quick Facts"]);
    assert_eq!(sections[0].body, "2025-01-26 (Sunday): Republic Day\n2025-08-15 (Friday): Independence Day");
    assert!(sections[1].body.contains("odd_semester_start: 2025-08-01"));
}

#[test]
fn nested_faculty_map_flattens_one_line_per_member() {
    let content = Content::from_value(json!({
        "department": "CSE (AI)",
        "faculty": {
            "f1": {"name": "Dr. A. Sen", "position": "Professor", "research_area": ["NLP", "Vision"]},
            "f2": {"name": "Ms. B. Roy", "position": "Assistant Professor"}
        }
    }));

    let flat = flatten_reference(&content);

    assert!(flat.contains("department: CSE (AI)"));
    assert!(flat.contains("name: Dr. A. Sen, position: Professor, research_area: NLP, Vision"));
    assert!(flat.contains("name: Ms. B. Roy"));
}

#[test]
fn formatters_cover_each_kind() {
    let f = DocumentFormatter::default();

    let person = f.format(&doc(
        "Faculty/sen.json",
        json!({"name": "Dr. A. Sen", "designation": "HOD", "email": "sen@example.edu", "research_area": ["NLP", "Vision"]}),
    ));
    assert!(person.contains("Role: HOD"));
    assert!(person.contains("Specialization: NLP, Vision"));

    let course = f.format(&doc(
        "sem_explain/sem_01/BSCM101.json",
        json!({
            "course_code": "BSCM101",
            "course_name": "Mathematics I",
            "modules": [{"module_no": 1, "title": "Calculus"}, {"module_no": 2, "title": "Matrices"}],
            "prerequisites": ["Algebra", "Trigonometry", "Geometry", "Statistics"]
        }),
    ));
    assert!(course.contains("Code: BSCM101"));
    assert!(course.contains("Modules (2):"));
    assert!(course.contains("- Module 2: Matrices"));
    assert!(course.contains("Prerequisites: Algebra, Trigonometry, Geometry"));
    assert!(!course.contains("Statistics"));

    let event = f.format(&doc("exam/mid.json", json!({"exam_name": "Mid Semester", "exam_date": "2025-10-06", "time": "10:00"})));
    assert!(event.contains("Exam: Mid Semester"));
    assert!(event.contains("Date: 2025-10-06"));

    let generic = f.format(&doc("hostel/info.json", json!({"warden_details": {"name": "Mr. Das", "phone": "123"}, "gate_time": "9 PM"})));
    assert!(generic.contains("Gate Time: 9 PM"));
    assert!(generic.contains("Warden Details:\n  Name: Mr. Das"));
    assert!(!generic.contains('{'));
}

#[test]
fn generic_map_keeps_every_top_level_key_and_bounds_nested_ones() {
    let f = DocumentFormatter::default();
    let mut sections = serde_json::Map::new();
    for i in 1..=12 {
        sections.insert(format!("section_{i:02}"), json!(format!("rule text {i}")));
    }
    let nested: serde_json::Map<String, serde_json::Value> =
        (1..=12).map(|i| (format!("shelf_{i:02}"), json!(format!("aisle {i}")))).collect();
    sections.insert("shelves".into(), serde_json::Value::Object(nested));

    let out = f.format(&doc("university_rule/library_and_reading_room.json", serde_json::Value::Object(sections)));

    assert!(out.contains("Section 01: rule text 1\n"));
    assert!(out.contains("Section 11: rule text 11\n"));
    assert!(out.contains("Section 12: rule text 12\n"));
    assert!(out.contains("Shelves:\n  Shelf 01: aisle 1\n"));
    assert!(out.contains("  Shelf 10: aisle 10\n  +2 more"));
    assert!(!out.contains("aisle 11"));
}

#[test]
fn long_lists_and_text_are_bounded() {
    let f = DocumentFormatter::default();

    let items: Vec<serde_json::Value> = (1..=13).map(|i| json!({"block": "A", "room": i, "zone": {"x": 1}})).collect();
    let list = f.format(&doc("hostel/rooms.json", serde_json::Value::Array(items)));
    assert!(list.contains("Contains 13 items:"));
    assert!(list.contains("10. Block: A, Room: 10\n"), "nested objects are left out of item summaries");
    assert!(!list.contains("11. "));
    assert!(list.contains("+3 more"));

    let text = f.format(&doc("notice.txt", json!("a".repeat(900))));
    assert!(text.contains(&format!("{}...\n[Text truncated for context]", "a".repeat(800))));
    assert!(!text.contains(&"a".repeat(801)));
}

#[test]
fn rules_digest_selects_matching_rules_for_rule_queries() {
    let corpus = corpus(vec![
        doc(
            "university_rule/library_and_reading_room.json",
            json!([
                {"section": "4.2", "title": "Late return", "text": "A fine of Rs 5 per day is charged for overdue books."},
                {"section": "4.3", "title": "Silence", "text": "Maintain silence in the reading room."}
            ]),
        ),
        doc(
            "university_rule/conduct_and_discipline.json",
            json!([{"title": "Ragging", "text": "Ragging is banned and leads to suspension."}]),
        ),
        doc("notes/other.json", json!([{"title": "fine print", "text": "not a rule file"}])),
    ]);

    let digest = RulesDigest::from_corpus(&corpus, "university_rule");
    assert_eq!(digest.categories().len(), 2);
    assert_eq!(digest.categories()[0].name, "Library & Reading Room");

    let section = digest.section_for("what is the library fine?", 5, 4000).expect("rule section");
    assert!(section.body.contains("Library & Reading Room (1 relevant rules):"));
    assert!(section.body.contains("  - [4.2] Late return: A fine of Rs 5 per day"));
    assert!(!section.body.contains("Silence"));
    assert!(!section.body.contains("not a rule file"));

    let ragging = digest.section_for("is ragging allowed", 5, 4000).expect("conduct section");
    assert!(ragging.body.contains("[General] Ragging"));

    assert!(digest.section_for("who teaches python", 5, 4000).is_none(), "not a rule query");
}

#[test]
fn helpline_routes_by_keyword_and_falls_back() {
    let directory = HelplineDirectory::from_document(&doc(
        "Helplines/helplines.json",
        json!({
            "categories": [
                {"keywords": ["scholarship", "stipend"], "department": "Scholarship Cell", "contact_person": "Mr. Paul", "phone": "111"},
                {"keywords": ["hostel"], "department": "Hostel Office",
                 "contact_persons": [{"name": "Warden A", "phone": "222"}, {"name": "Warden B", "phone": "333"}]}
            ],
            "fallback_contact": {"name": "Help Desk", "phone": "999"}
        }),
    ))
    .expect("directory");

    let scholarship = directory.contact_for("Scholarship deadline?");
    assert!(scholarship.contains("Contact: Mr. Paul"));
    assert!(scholarship.contains("Department: Scholarship Cell"));
    assert!(scholarship.contains("Phone: 111"));
    assert!(scholarship.contains("Office Hours"));

    let hostel = directory.contact_for("hostel curfew");
    assert!(hostel.contains("  - Warden B: 333"));

    let other = directory.contact_for("parking");
    assert!(other.contains("Contact: Help Desk"));
    assert!(other.contains("Phone: 999"));
}

#[test]
fn missing_helpline_directory_uses_registrar() {
    let directory = HelplineDirectory::from_corpus(&corpus(vec![]), Some("Helplines/helplines.json"));
    assert!(directory.contact_for("anything").contains("Contact: Registrar's Office"));
    assert!(HelplineDirectory::from_document(&doc("h.json", json!(["not", "a", "map"]))).is_err());
}
