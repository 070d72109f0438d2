//! 「もしかして」候補の検索

use std::collections::BinaryHeap;

/// `candidates` から `target` に近いものを、編集距離が小さい順に最大 `limit` 件返す
pub fn find_similar<'a>(
    target: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max_distance: usize,
    limit: usize,
) -> Vec<&'a str> {
    // BinaryHeap で上位 limit 件のみを保持（距離が大きいものから捨てる）
    let mut heap: BinaryHeap<(usize, &'a str)> = BinaryHeap::new();
    for name in candidates {
        let distance = strsim::levenshtein(target, name);
        if distance <= max_distance {
            heap.push((distance, name));
            if heap.len() > limit {
                heap.pop();
            }
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|(_, name)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_candidates_come_first() {
        let found = find_similar("indnet-width", ["use-tabs", "indent-width"], 3, 2);
        assert_eq!(found, vec!["indent-width"]);
    }

    #[test]
    fn limit_keeps_the_best() {
        let found = find_similar("--chek", ["--check", "--write", "--help"], 3, 1);
        assert_eq!(found, vec!["--check"]);
    }

    #[test]
    fn nothing_close_enough() {
        assert!(find_similar("zzz", ["--check"], 2, 3).is_empty());
    }
}
