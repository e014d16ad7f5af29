use std::collections::HashMap;
use std::hash::Hash;

/// Tally how many rows map to each key.
pub fn count_by_key<T, K, F>(rows: impl IntoIterator<Item = T>, key: F) -> HashMap<K, usize>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut counts = HashMap::new();
    for row in rows {
        *counts.entry(key(&row)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_occurrences_per_key() {
        let rows = ["a", "b", "a", "c", "a"];
        let counts = count_by_key(rows, |r| *r);

        assert_eq!(counts["a"], 3);
        assert_eq!(counts["b"], 1);
        assert_eq!(counts["c"], 1);
        assert!(!counts.contains_key("d"));
    }

    #[test]
    fn empty_input_gives_empty_map() {
        let counts = count_by_key(Vec::<(u8, u8)>::new(), |(k, _)| *k);
        assert!(counts.is_empty());
    }
}
