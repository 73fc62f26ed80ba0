//! Tiered search over a list of display names.

/// Minimum similarity for a name to count as an approximate match.
pub const FUZZY_THRESHOLD: f64 = 0.5;

/// Rank `names` against `query`.
///
/// A blank query returns every index in order. Otherwise matches are grouped
/// into tiers (exact, prefix, word prefix, substring, approximate), all
/// comparisons case-insensitive. The first four tiers keep the original
/// order; approximate matches are ordered by similarity, best first, ties in
/// original order.
pub fn rank<S: AsRef<str>>(query: &str, names: &[S]) -> Vec<usize> {
    if query.trim().is_empty() {
        return (0..names.len()).collect();
    }

    let query = query.to_lowercase();
    let mut tiers: [Vec<usize>; 4] = Default::default();
    let mut rest: Vec<(usize, String)> = Vec::new();

    for (i, name) in names.iter().enumerate() {
        let name = name.as_ref().to_lowercase();
        let tier = if name == query {
            Some(0)
        } else if name.starts_with(&query) {
            Some(1)
        } else if name.split_whitespace().any(|w| w.starts_with(&query)) {
            Some(2)
        } else if name.contains(&query) {
            Some(3)
        } else {
            None
        };
        match tier {
            Some(t) => tiers[t].push(i),
            None => rest.push((i, name)),
        }
    }

    let query_chars: Vec<char> = query.chars().collect();
    let mut approximate: Vec<(usize, f64)> = rest
        .into_iter()
        .filter(|(_, name)| !name.is_empty())
        .map(|(i, name)| (i, similarity(&query_chars, &name.chars().collect::<Vec<_>>())))
        .filter(|&(_, score)| score >= FUZZY_THRESHOLD)
        .collect();
    // Stable sort keeps original order among equal scores.
    approximate.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut out: Vec<usize> = tiers.into_iter().flatten().collect();
    out.extend(approximate.into_iter().map(|(i, _)| i));
    out
}

/// `2 * lcs / (len(a) + len(b))`, in `0.0..=1.0`.
pub fn similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * lcs_len(a, b) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}
