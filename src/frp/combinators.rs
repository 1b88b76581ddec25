// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cumulative Combinators
//!
//! Pure functions that combine cumulative (absolute-time) sequences. None of
//! them mutate their inputs; each returns a freshly owned sequence.
//!
//! # Available Combinators
//!
//! - `merge` - Stable interleave of two sequences, left side first on ties
//! - `merge_all` - `merge` folded over any number of sequences
//! - `join` - Collapse occurrences sharing a time into one occurrence
//! - `merge_join` - `merge` followed by `join`
//!
//! # Merging
//!
//! ```text
//! A:  kick@0        kick@500         kick@1000
//! B:         snare@500        snare@1000
//!     ─────────────────────────────────────────────
//!     kick@0  kick@500 snare@500  kick@1000 snare@1000
//! ```
//!
//! Two read cursors walk the inputs. The head with the smaller time is taken;
//! on equal times the left head is taken. Each step advances exactly one
//! cursor, so the merge is O(|A| + |B|) with no backtracking.
//!
//! Both inputs must already be non-decreasing in time. `Cumulative` only
//! hands out sequences that satisfy this, so it is not checked again here.
//!
//! # Examples
//!
//! ```rust
//! use cim_time_stream::frp::{combinators, Cumulative};
//!
//! let a = Cumulative::from_vec(vec![(0, "a"), (2, "c")]).unwrap();
//! let b = Cumulative::from_vec(vec![(1, "b"), (2, "d")]).unwrap();
//!
//! let merged = combinators::merge(a.clone(), b.clone());
//! assert_eq!(merged.occurrences(), &[(0, "a"), (1, "b"), (2, "c"), (2, "d")]);
//!
//! let joined = combinators::merge_join(a, b);
//! assert_eq!(
//!     joined.occurrences(),
//!     &[(0, vec!["a"]), (1, vec!["b"]), (2, vec!["c", "d"])]
//! );
//! ```

use tracing::debug;

use super::cumulative::Cumulative;
use super::Occurrence;

/// Merge two cumulative sequences by absolute time
///
/// The result contains every occurrence of both inputs exactly once, in
/// non-decreasing time. Occurrences from the same input keep their order,
/// and on equal times `a`'s occurrence comes first. The span is the larger
/// of the two spans.
pub fn merge<T>(a: Cumulative<T>, b: Cumulative<T>) -> Cumulative<T> {
    let span = a.span().max(b.span());
    let (left_len, right_len) = (a.len(), b.len());

    let mut merged: Vec<Occurrence<T>> = Vec::with_capacity(left_len + right_len);
    let mut left = a.into_occurrences().into_iter().peekable();
    let mut right = b.into_occurrences().into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (None, None) => break,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some((l, _)), Some((r, _))) => l <= r,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }

    debug!(left = left_len, right = right_len, span, "merged cumulative sequences");
    Cumulative::from_sorted(merged, span)
}

/// Merge any number of sequences; earlier sequences win ties
pub fn merge_all<T, I>(seqs: I) -> Cumulative<T>
where
    I: IntoIterator<Item = Cumulative<T>>,
{
    seqs.into_iter().fold(Cumulative::empty(), merge)
}

/// Group occurrences that share exactly the same time
///
/// Each group becomes one occurrence whose payload lists the members in
/// their original order. Times are compared exactly; there is no tolerance.
pub fn join<T>(seq: Cumulative<T>) -> Cumulative<Vec<T>> {
    let span = seq.span();
    let mut joined: Vec<Occurrence<Vec<T>>> = Vec::new();

    for (time, payload) in seq.into_occurrences() {
        match joined.last_mut() {
            Some((last, group)) if *last == time => group.push(payload),
            _ => joined.push((time, vec![payload])),
        }
    }

    Cumulative::from_sorted(joined, span)
}

/// Merge, then join occurrences landing on the same instant
pub fn merge_join<T>(a: Cumulative<T>, b: Cumulative<T>) -> Cumulative<Vec<T>> {
    join(merge(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq<T>(occurrences: Vec<Occurrence<T>>) -> Cumulative<T> {
        Cumulative::from_vec(occurrences).unwrap()
    }

    #[test]
    fn test_merge() {
        let events1 = seq(vec![(0, "a"), (2, "c")]);
        let events2 = seq(vec![(1, "b"), (3, "d")]);

        let merged = merge(events1, events2);

        assert_eq!(merged.len(), 4);
        assert_eq!(merged.occurrences(), &[(0, "a"), (1, "b"), (2, "c"), (3, "d")]);
    }

    #[test]
    fn test_merge_overlapping_times_left_first() {
        let events1 = seq(vec![(0, 1), (2, 3)]);
        let events2 = seq(vec![(2, 10), (3, 11)]);

        let merged = merge(events1, events2);

        assert_eq!(merged.occurrences(), &[(0, 1), (2, 3), (2, 10), (3, 11)]);
    }

    #[test]
    fn test_merge_with_empty_side() {
        let b = seq(vec![(100, "x")]);

        assert_eq!(merge(Cumulative::empty(), b.clone()), b);
        assert_eq!(merge(b.clone(), Cumulative::empty()), b);
    }

    #[test]
    fn test_merge_both_empty() {
        let merged: Cumulative<u8> = merge(Cumulative::empty(), Cumulative::empty());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_same_instant_drains_left_first() {
        let a = seq(vec![(7, "a1"), (7, "a2"), (7, "a3")]);
        let b = seq(vec![(7, "b1"), (7, "b2"), (7, "b3")]);

        let merged = merge(a, b);

        // Every left occurrence is <= every right one, so the left run drains first
        assert_eq!(
            merged.occurrences(),
            &[(7, "a1"), (7, "a2"), (7, "a3"), (7, "b1"), (7, "b2"), (7, "b3")]
        );
    }

    #[test]
    fn test_merge_single_ties_alternate() {
        let a = seq(vec![(0, "a"), (10, "a"), (20, "a")]);
        let b = seq(vec![(0, "b"), (10, "b"), (20, "b")]);

        let merged = merge(a, b);

        assert_eq!(
            merged.occurrences(),
            &[(0, "a"), (0, "b"), (10, "a"), (10, "b"), (20, "a"), (20, "b")]
        );
    }

    #[test]
    fn test_merge_keeps_longest_span() {
        let a = seq(vec![(0, 'a')]).with_span(2000);
        let b = seq(vec![(500, 'b')]);

        assert_eq!(merge(a, b).span(), 2000);
    }

    #[test]
    fn test_merge_all_folds_left() {
        let merged = merge_all(vec![
            seq(vec![(5, "first")]),
            seq(vec![(5, "second")]),
            seq(vec![(1, "third")]),
        ]);

        assert_eq!(
            merged.occurrences(),
            &[(1, "third"), (5, "first"), (5, "second")]
        );
    }

    #[test]
    fn test_join_groups_only_exact_ties() {
        let joined = join(seq(vec![(0, 'a'), (1, 'b'), (1, 'c'), (2, 'd')]));

        assert_eq!(
            joined.occurrences(),
            &[(0, vec!['a']), (1, vec!['b', 'c']), (2, vec!['d'])]
        );
    }

    #[test]
    fn test_merge_join_never_repeats_a_time() {
        let a = seq(vec![(0, 1), (5, 2), (5, 3), (9, 4)]);
        let b = seq(vec![(5, 10), (9, 11), (12, 12)]);

        let joined = merge_join(a, b);
        let times: Vec<_> = joined.times().collect();

        assert_eq!(times, vec![0, 5, 9, 12]);
        assert_eq!(joined.occurrences()[1], (5, vec![2, 3, 10]));
    }
}
