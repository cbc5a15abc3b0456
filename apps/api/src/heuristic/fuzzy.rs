//! Fuzzy string similarity on a 0–100 scale.
//!
//! `ratio` is the normalized indel similarity: `2 * LCS / (len_a + len_b)`.
//! `partial_ratio` slides the shorter string across the longer one (including
//! partially overlapping prefix/suffix windows) and keeps the best `ratio`.

use rapidfuzz::distance::indel;

/// Best `ratio` between the shorter string and any window of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (needle, haystack) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if needle.is_empty() {
        return 0.0;
    }

    let n = needle.len();
    let h = haystack.len();
    let mut best = 0.0_f64;

    // Windows growing in from the left edge.
    for end in 1..n {
        best = best.max(ratio_chars(&needle, &haystack[..end]));
    }
    // Full-length windows.
    for start in 0..=(h - n) {
        best = best.max(ratio_chars(&needle, &haystack[start..start + n]));
        if best >= 100.0 {
            return 100.0;
        }
    }
    // Windows shrinking out at the right edge.
    for start in (h - n + 1)..h {
        best = best.max(ratio_chars(&needle, &haystack[start..]));
    }

    best
}

/// Picks the best-scoring candidate for `query`. Ties keep the earliest candidate.
pub fn best_match<'a>(
    query: &str,
    candidates: &[&'a str],
    scorer: fn(&str, &str) -> f64,
) -> Option<(&'a str, f64)> {
    let mut best: Option<(&'a str, f64)> = None;
    for &candidate in candidates {
        let score = scorer(query, candidate);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best
}

/// Normalized indel similarity `2 * LCS / (len_a + len_b)`, scaled to 0–100.
fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    100.0 * indel::normalized_similarity(a.iter().copied(), b.iter().copied())
}
