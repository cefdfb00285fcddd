//! Edit-distance string similarity used for typo-tolerant name matching.

/// Levenshtein distance between `a` and `b`, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row over `b`.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diag + cost);
            diag = above;
        }
    }
    row[b.len()]
}

/// Similarity ratio in `[0, 1]`: `1 - distance / max(len_a, len_b)`.
///
/// Two empty strings are identical (`1.0`).
pub fn ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Best [`ratio`] of the shorter string against every equally long char
/// window of the longer one. Rewards prefixes and embedded fragments.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = short.chars().count();
    if short_len == 0 {
        return ratio(a, b);
    }
    let long_chars: Vec<char> = long.chars().collect();
    long_chars
        .windows(short_len)
        .map(|w| ratio(short, &w.iter().collect::<String>()))
        .fold(0.0, f64::max)
}
