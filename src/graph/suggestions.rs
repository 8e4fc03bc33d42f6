//! "Did you mean?" hints for unresolved context names and unknown class members.

/// Edit distance between `a` and `b`, computed one row at a time.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut row = vec![0; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        row[0] = i + 1;
        for (j, &b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            row[j + 1] = (previous[j + 1] + 1)
                .min(row[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut row);
    }

    previous[b_chars.len()]
}

/// Returns up to `max_suggestions` candidates close to `target`, best first.
///
/// Prefix matches rank ahead of edit distance. The allowed distance grows with
/// the length of `target`: 1 for short names, 2 up to six characters, then a third
/// of the length.
pub fn find_similar_names(target: &str, candidates: &[String], max_suggestions: usize) -> Vec<String> {
    let target_lower = target.to_lowercase();
    let max_distance = match target.chars().count() {
        0..=3 => 1,
        4..=6 => 2,
        len => 3.max(len / 3),
    };

    let mut scored: Vec<(&String, usize, bool)> = candidates
        .iter()
        .filter_map(|candidate| {
            let candidate_lower = candidate.to_lowercase();
            if candidate_lower == target_lower {
                return None;
            }

            let distance = levenshtein_distance(&target_lower, &candidate_lower);
            let is_prefix = candidate_lower.starts_with(&target_lower)
                || target_lower.starts_with(&candidate_lower);

            (distance <= max_distance || is_prefix).then_some((candidate, distance, is_prefix))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.0.cmp(b.0))
    });

    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _, _)| name.clone())
        .collect()
}

/// Formats a hint naming the closest candidates, if any are close enough.
pub fn did_you_mean(target: &str, candidates: &[String]) -> Option<String> {
    let suggestions = find_similar_names(target, candidates, 3);
    match suggestions.as_slice() {
        [] => None,
        [only] => Some(format!("Did you mean `{}`?", only)),
        many => {
            let names = many
                .iter()
                .map(|s| format!("`{}`", s))
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("Did you mean one of: {}?", names))
        }
    }
}
