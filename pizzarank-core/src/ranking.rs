/// Ranking engine: display order, dense ranks and value ranks.
///
/// Pure function over a slice of entries. The input is never mutated; every
/// call produces a fresh ranked copy.
use std::cmp::Ordering;

use crate::constants::MAX_VALUE_RANK;
use crate::types::{Entry, RankedEntry, SortDirection, SortKey};

/// Order `entries` by `key` in `direction` and assign ranks.
///
/// Ranks are dense: the first entry is rank 1 and each following entry either
/// shares its predecessor's rank (tied within tolerance) or takes the next one.
/// The sort is stable, so tied entries keep storage order.
pub fn rank(entries: &[Entry], key: SortKey, direction: SortDirection) -> Vec<RankedEntry> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&Entry> = entries.iter().collect();
    ordered.sort_by(|a, b| direction.apply(a.sort_value(key).compare(&b.sort_value(key))));

    let ranks = dense_ranks(&ordered, key);
    let distinct = count_distinct(&ordered, key);

    tracing::debug!(
        key = %key,
        direction = %direction,
        entries = ordered.len(),
        distinct,
        "ranked entries"
    );

    ordered
        .into_iter()
        .zip(ranks)
        .map(|(entry, rank)| RankedEntry {
            entry: entry.clone(),
            rank,
            value_rank: value_rank(rank, distinct, key, direction),
        })
        .collect()
}

/// Walk the sorted run once. Only the immediate predecessor is consulted, so
/// ties do not form a transitive group.
fn dense_ranks(ordered: &[&Entry], key: SortKey) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(ordered.len());
    let mut current = 0;

    for (i, entry) in ordered.iter().enumerate() {
        let tied = i > 0 && ordered[i - 1].sort_value(key).is_tied_with(&entry.sort_value(key));
        if !tied {
            current += 1;
        }
        ranks.push(current);
    }

    ranks
}

/// Number of exactly distinct values under `key`. Relies on `ordered` being
/// sorted, so equal values are adjacent.
fn count_distinct(ordered: &[&Entry], key: SortKey) -> usize {
    if ordered.is_empty() {
        return 0;
    }
    1 + ordered
        .windows(2)
        .filter(|w| w[0].sort_value(key).compare(&w[1].sort_value(key)) != Ordering::Equal)
        .count()
}

/// Map a rank onto the 1..=6 "deal quality" scale, 1 being the best deal.
///
/// For price-like keys ascending order already lists the best deal first; for
/// size-like keys descending does. In the other direction the rank is counted
/// from the bottom instead.
pub fn value_rank(rank: usize, distinct: usize, key: SortKey, direction: SortDirection) -> u8 {
    let best_first = key.is_price_like() == (direction == SortDirection::Ascending);
    let raw = if best_first {
        rank
    } else {
        (distinct + 1).saturating_sub(rank)
    };
    raw.clamp(1, usize::from(MAX_VALUE_RANK)) as u8
}
