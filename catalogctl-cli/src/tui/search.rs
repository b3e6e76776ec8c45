//! Fuzzy filtering of palette entries

use super::routes::NavEntry;

/// An entry that survived the filter
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteMatch {
    pub entry: &'static NavEntry,
    /// Match score (higher is better)
    pub score: i64,
    /// Matched char indices in the label (for highlighting)
    pub match_indices: Vec<usize>,
}

/// Filter entries by query; an empty query keeps everything in list order
pub fn fuzzy_filter(query: &str, entries: &'static [NavEntry]) -> Vec<PaletteMatch> {
    let query_chars: Vec<char> = query.trim().to_lowercase().chars().collect();

    if query_chars.is_empty() {
        return entries
            .iter()
            .map(|entry| PaletteMatch {
                entry,
                score: 0,
                match_indices: vec![],
            })
            .collect();
    }

    let mut results: Vec<PaletteMatch> = entries
        .iter()
        .filter_map(|entry| {
            let (score, indices) = fuzzy_match(&query_chars, entry.label);
            if score > 0 {
                return Some(PaletteMatch {
                    entry,
                    score,
                    match_indices: indices,
                });
            }
            // Route matches score lower than label matches
            let (route_score, _) = fuzzy_match(&query_chars, entry.route);
            (route_score > 0).then(|| PaletteMatch {
                entry,
                score: route_score / 2,
                match_indices: vec![],
            })
        })
        .collect();

    // Stable: equal scores keep list order
    results.sort_by(|a, b| b.score.cmp(&a.score));

    results
}

/// Fuzzy match a query against a target string
/// Returns (score, matched_indices); score 0 means no match
fn fuzzy_match(query_chars: &[char], target: &str) -> (i64, Vec<usize>) {
    let original: Vec<char> = target.chars().collect();
    let target_chars: Vec<char> = target.to_lowercase().chars().collect();

    if query_chars.is_empty() {
        return (0, vec![]);
    }

    let mut score: i64 = 0;
    let mut indices = Vec::new();
    let mut query_idx = 0;
    let mut prev_match_idx: Option<usize> = None;

    for (target_idx, target_char) in target_chars.iter().enumerate() {
        if query_idx < query_chars.len() && *target_char == query_chars[query_idx] {
            indices.push(target_idx);

            // base +10, consecutive +15, first char +20, word boundary +10
            score += 10;

            if let Some(prev) = prev_match_idx {
                if target_idx == prev + 1 {
                    score += 15;
                }
            }

            if target_idx == 0 {
                score += 20;
            }

            if target_idx > 0 {
                let prev_char = target_chars[target_idx - 1];
                if matches!(prev_char, ' ' | '_' | '-' | '/') {
                    score += 10;
                }
                if original.get(target_idx).is_some_and(|c| c.is_uppercase()) {
                    score += 10;
                }
            }

            prev_match_idx = Some(target_idx);
            query_idx += 1;
        }
    }

    if query_idx == query_chars.len() {
        // Shorter targets win ties
        let length_penalty = (target_chars.len() as i64 - query_chars.len() as i64) / 2;
        score = score.saturating_sub(length_penalty);
        (score.max(1), indices)
    } else {
        (0, vec![])
    }
}

/// Split text into (segment, is_match) runs for highlighting
pub fn highlight_matches(text: &str, indices: &[usize]) -> Vec<(String, bool)> {
    if indices.is_empty() {
        return vec![(text.to_string(), false)];
    }

    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_match = false;

    for (idx, ch) in text.chars().enumerate() {
        let is_match = indices.contains(&idx);

        if is_match != in_match {
            if !current.is_empty() {
                result.push((std::mem::take(&mut current), in_match));
            }
            in_match = is_match;
        }

        current.push(ch);
    }

    if !current.is_empty() {
        result.push((current, in_match));
    }

    result
}
