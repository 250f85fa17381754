//! Levenshtein edit distance.
//!
//! Used by the fuzzy matcher to score candidate names that neither start
//! with nor contain the query.

/// Compute the Levenshtein edit distance between two strings.
///
/// Returns the minimum number of single-character edits (insertions,
/// deletions, substitutions) required to transform `a` into `b`. Works on
/// `char`s, not bytes.
pub fn distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix.
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Edit distance divided by the longer string's length, in [0, 1].
///
/// Two empty strings are identical (0.0).
#[allow(clippy::cast_precision_loss)]
pub fn normalized(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    distance(a, b) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(distance("hello", "hello"), 0);
        assert!(normalized("hello", "hello").abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty() {
        assert_eq!(distance("", "abc"), 3);
        assert_eq!(distance("abc", ""), 3);
        assert_eq!(distance("", ""), 0);
        assert!(normalized("", "").abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_edit() {
        assert_eq!(distance("kitten", "sitten"), 1); // substitution
        assert_eq!(distance("cat", "cats"), 1); // insertion
        assert_eq!(distance("cats", "cat"), 1); // deletion
    }

    #[test]
    fn test_classic() {
        assert_eq!(distance("kitten", "sitting"), 3);
        assert!((normalized("kitten", "sitting") - 3.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_length_cutoff() {
        // Very different lengths still get an exact distance.
        assert_eq!(distance("bolt", "lightning bolt"), 10);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert_eq!(distance("lim-dûl", "lim-dul"), 1);
        assert!((normalized("æther", "aether") - 2.0 / 6.0).abs() < 1e-12);
    }
}
