use unibot_context::ContextBlock;
use unibot_core::text::fold_case;

/// The sentence the generator is told to answer with when the context has
/// nothing relevant.
pub const NOT_FOUND_REPLY: &str = "I don't have this information in the knowledge base.";
const CONTACT_LEAD: &str = "Let me provide you with relevant contact details.";

const INSTRUCTIONS: &str = "You are a campus assistant for Brainware University.

Rules:
1. Answer strictly from the context below. Do not use general knowledge.
2. If the answer is not in the context, reply with exactly: \"I don't have this information in the knowledge base. Let me provide you with relevant contact details.\"
3. Keep answers concise and relevant to the question.
4. Do not mention file paths, rule sections or source references.
5. If the question is asked in Hinglish, answer in Hinglish.

Scholarships:
- Never copy scholarship records verbatim. Explain what matters for this question.
- If the user states their year, course, income or community, assess eligibility against it and say yes or no with reasons.
- If that information is missing and eligibility depends on it, ask for it.";

pub fn build_prompt(query: &str, context: &ContextBlock) -> String {
    format!("{INSTRUCTIONS}\n\nCONTEXT:\n{}\n\nUSER QUESTION: {query}\n\nAnswer based only on the context above.", context.text)
}

/// Whether a generated answer admits the knowledge base had nothing.
pub fn is_not_found(answer: &str) -> bool {
    let answer = fold_case(answer);
    answer.contains("don't have this information") || answer.contains("i don't know")
}

/// The not-found reply followed by `contact`.
pub fn not_found_with_contact(contact: &str) -> String { format!("{NOT_FOUND_REPLY} {CONTACT_LEAD}\n\n{contact}") }
