//! Title relevance against keyword variants.

/// Share of titles (0.0..=1.0) containing at least one variant,
/// case-insensitively. An empty title set scores 0.
pub fn relevance_ratio(titles: &[String], variants: &[String]) -> f64 {
    if titles.is_empty() {
        return 0.0;
    }

    let lowered: Vec<String> = variants.iter().map(|v| v.to_lowercase()).collect();
    let matching = titles
        .iter()
        .filter(|title| {
            let text = title.to_lowercase();
            lowered.iter().any(|variant| text.contains(variant))
        })
        .count();

    matching as f64 / titles.len() as f64
}

/// How many titles from `first` also appear in `second` (exact match).
/// Used to judge default-sort consistency across two identical searches.
pub fn overlap_count(first: &[String], second: &[String]) -> usize {
    first.iter().filter(|title| second.contains(title)).count()
}
