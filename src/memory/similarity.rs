/*!
 * String similarity for translation memory lookups.
 *
 * All ratios are on a 0-100 scale and built on the normalized Indel distance
 * (insertions and deletions only), so `ratio(a, b) = 200 * lcs / (|a| + |b|)`.
 * - `ratio`: whole-string similarity
 * - `partial_ratio`: best alignment of the shorter string inside the longer one
 * - `token_set_ratio`: order-insensitive token overlap
 */

use std::collections::BTreeSet;

/// Trim and collapse internal whitespace runs to a single space
///
/// Used for comparison only; stored segments are never rewritten.
pub fn normalize_segment(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-string similarity (0-100)
pub fn ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    char_ratio(&a_chars, &b_chars)
}

/// Similarity of the best-aligned window of the longer string (0-100)
///
/// A short needle found verbatim inside a long text scores 100.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let (needle, hay) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if needle.is_empty() {
        return 0.0;
    }

    let m = needle.len();
    let n = hay.len();
    let mut best: f64 = 0.0;

    // Windows hanging off either end of the haystack
    for k in 1..m.min(n + 1) {
        best = best.max(char_ratio(&needle, &hay[..k]));
        best = best.max(char_ratio(&needle, &hay[n - k..]));
    }

    for start in 0..=(n - m) {
        best = best.max(char_ratio(&needle, &hay[start..start + m]));
        if best >= 100.0 {
            break;
        }
    }

    best
}

/// Order-insensitive token overlap similarity (0-100)
///
/// Tokens are whitespace-separated and compared case-insensitively. When one
/// token set contains the other the score is 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let tokens_a: BTreeSet<&str> = a_lower.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b_lower.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = intersection.join(" ");
    let combined_ab = join_nonempty(&sect, &diff_ab.join(" "));
    let combined_ba = join_nonempty(&sect, &diff_ba.join(" "));

    let mut best = ratio(&combined_ab, &combined_ba);
    if !sect.is_empty() {
        best = best.max(ratio(&sect, &combined_ab));
        best = best.max(ratio(&sect, &combined_ba));
    }
    best
}

fn join_nonempty(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (_, true) => left.to_string(),
        _ => format!("{} {}", left, right),
    }
}

fn char_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let lcs = lcs_length(a, b);
    200.0 * lcs as f64 / total as f64
}

/// Length of the longest common subsequence
fn lcs_length(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Two-row table
    let mut prev_row: Vec<usize> = vec![0; b.len() + 1];
    let mut curr_row: Vec<usize> = vec![0; b.len() + 1];

    for a_char in a {
        for j in 1..=b.len() {
            curr_row[j] = if *a_char == b[j - 1] {
                prev_row[j - 1] + 1
            } else {
                prev_row[j].max(curr_row[j - 1])
            };
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}
