use proptest::prelude::*;
use serde_json::json;

use unibot_core::corpus::Corpus;
use unibot_core::types::{Content, Document, Intent};
use unibot_rank::KeywordRanker;

const VOCAB: &[&str] = &[
    "kanyashree", "scholarship", "library", "fine", "hostel", "warden", "exam", "attendance", "holiday", "syllabus",
    "BSCM101", "gate", "canteen", "faculty", "hod",
];

fn arb_intent() -> impl Strategy<Value = Intent> { prop::sample::select(Intent::ALL.to_vec()) }

fn arb_sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB.to_vec()), 1..12).prop_map(|words| words.join(" "))
}

fn arb_corpus() -> impl Strategy<Value = Corpus> {
    let folder = prop::sample::select(vec!["university_rule", "Scholarship/data/detailed scholarship", "notes", "Faculty"]);
    prop::collection::vec((folder, arb_sentence(), any::<bool>()), 0..10).prop_map(|entries| {
        let docs = entries
            .into_iter()
            .enumerate()
            .map(|(i, (folder, sentence, as_text))| {
                let value = if as_text { json!(sentence.replace(' ', "\n")) } else { json!({ "body": sentence }) };
                Document::new(format!("{folder}/doc_{i}.json"), Content::from_value(value)).expect("document")
            })
            .collect();
        Corpus::from_documents("/corpus", docs, vec![])
    })
}

proptest! {
    #[test]
    fn ranking_is_deterministic(corpus in arb_corpus(), query in arb_sentence(), intent in arb_intent(), k in 1usize..8) {
        let ranker = KeywordRanker::default();
        let first: Vec<(String, f64)> =
            ranker.rank(&query, intent, &corpus, k).iter().map(|s| (s.document.path.clone(), s.score)).collect();
        let second: Vec<(String, f64)> =
            ranker.rank(&query, intent, &corpus, k).iter().map(|s| (s.document.path.clone(), s.score)).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn results_are_bounded_positive_and_sorted(corpus in arb_corpus(), query in arb_sentence(), intent in arb_intent(), k in 0usize..8) {
        let ranked = KeywordRanker::default().rank(&query, intent, &corpus, k);
        prop_assert!(ranked.len() <= k);
        prop_assert!(ranked.len() <= corpus.len());
        prop_assert!(ranked.iter().all(|s| s.score > 0.0));
        prop_assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn snippet_is_taken_from_the_document(corpus in arb_corpus(), query in arb_sentence(), intent in arb_intent()) {
        for scored in KeywordRanker::default().rank(&query, intent, &corpus, 10) {
            let flat = scored.document.text().replace('\n', " ");
            prop_assert!(flat.contains(&scored.snippet));
            prop_assert!(!scored.snippet.contains('\n'));
        }
    }
}
