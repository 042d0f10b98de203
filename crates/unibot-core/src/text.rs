//! Small string helpers shared by the ranker and the formatters.

/// Lowercase `input` without changing any byte offset.
///
/// Characters whose lowercase form has a different UTF-8 length (or expands to
/// several characters) are kept as they are, so a position found in the folded
/// string is always valid in the original one.
pub fn fold_case(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) if l.len_utf8() == c.len_utf8() => l,
                _ => c,
            }
        })
        .collect()
}

/// First `max_chars` characters of `input`.
pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

/// `snake_case_key` -> `Snake Case Key`
pub fn humanize_key(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
