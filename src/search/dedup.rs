//! Result deduplication by course name

use std::collections::HashSet;

/// Keep the first item seen for each name, preserving order.
///
/// Callers pass results already sorted by relevance, so the survivor of each
/// name is its best-ranked instance.
pub fn dedup_by_name<T, F>(items: Vec<T>, name: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen: HashSet<String> = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(name(item).to_string()))
        .collect()
}
