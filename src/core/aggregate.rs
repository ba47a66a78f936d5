use crate::core::normalize::normalize_label;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of a frequency table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub label: String,
    pub count: u64,
    pub share: f64,
}

/// Build a ranked frequency table from raw labels
///
/// Labels are normalized before counting. Rows come back sorted ascending
/// by share; labels with equal counts keep the order in which they were
/// first seen. An empty input gives an empty table.
pub fn frequency_table<I, S>(labels: I) -> Vec<FrequencyRow>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();
    let mut total: u64 = 0;

    for raw in labels {
        let label = normalize_label(raw.as_ref());
        total += 1;

        match positions.get(&label) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }

    if total == 0 {
        return Vec::new();
    }

    // Share is monotonic in count, so the integer key gives the same order
    counts.sort_by_key(|(_, count)| *count);

    counts
        .into_iter()
        .map(|(label, count)| FrequencyRow {
            label,
            count,
            share: count as f64 / total as f64,
        })
        .collect()
}

/// Build a frequency table over one field of each item
///
/// `extract` picks the label for an item; items without a label are left
/// out of both the counts and the total.
pub fn aggregate_by<T, F>(items: &[T], extract: F) -> Vec<FrequencyRow>
where
    F: for<'a> Fn(&'a T) -> Option<&'a str>,
{
    frequency_table(items.iter().filter_map(|item| extract(item)))
}
