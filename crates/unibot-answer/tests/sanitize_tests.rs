use unibot_answer::prompt::{is_not_found, not_found_with_contact};
use unibot_answer::{greeting, sanitize, NOT_FOUND_REPLY};

#[test]
fn strips_citations_markdown_and_control_characters() {
    assert_eq!(sanitize("See the syllabus [sem_explain/sem_01/BSCM101.json] for details"), "See the syllabus for details");
    assert_eq!(sanitize("**Bold** and *italic* and `code`"), "Bold and italic and code");
    assert_eq!(sanitize("line one\nline\ttwo\u{0007}\u{007f}"), "line one\nline\ttwo");
    assert_eq!(sanitize("  [a.json]  "), "");
    assert_eq!(sanitize("keep [brackets] that are not citations"), "keep [brackets] that are not citations");
}

#[test]
fn greetings_match_whole_word_prefixes_only() {
    assert_eq!(greeting("Hi"), Some("hi"));
    assert_eq!(greeting("hey, what's up"), Some("hey"));
    assert_eq!(greeting("Good Evening everyone"), Some("good evening"));
    assert_eq!(greeting("namaste"), Some("namaste"));
    assert_eq!(greeting("highest package"), None);
    assert_eq!(greeting("say hello"), None);
}

#[test]
fn not_found_detection_is_case_insensitive() {
    assert!(is_not_found("Sorry, I DON'T HAVE THIS INFORMATION right now."));
    assert!(is_not_found("i don't know"));
    assert!(!is_not_found("The library opens at 9 AM."));
    assert!(not_found_with_contact("Contact: X").starts_with(NOT_FOUND_REPLY));
}
