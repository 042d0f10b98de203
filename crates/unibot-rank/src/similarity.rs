//! Ratcliff/Obershelp similarity, the measure behind difflib-style ratios.

/// `2 * M / T` where `M` is the number of characters covered by recursively
/// taken longest common blocks and `T` the total length of both inputs.
/// Returns 1.0 for two empty strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, len) = longest_block(&a[a_lo..a_hi], &b[b_lo..b_hi]);
        if len == 0 {
            continue;
        }
        matched += len;
        let (i, j) = (a_lo + i, b_lo + j);
        pending.push((a_lo, i, b_lo, j));
        pending.push((i + len, a_hi, j + len, b_hi));
    }
    matched
}

/// Earliest longest common substring as `(start_in_a, start_in_b, len)`.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            if cur[j + 1] > best.2 {
                best = (i + 1 - cur[j + 1], j + 1 - cur[j + 1], cur[j + 1]);
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}
