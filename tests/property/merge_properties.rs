// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Merge Engine
//!
//! Every occurrence is tagged with the side it came from and its position on
//! that side, so the properties can trace where each output entry originated.

use cim_time_stream::frp::{combinators, Cumulative, Occurrence, Time};
use proptest::prelude::*;

// ============================================================================
// Test Data Definition
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Side {
    A,
    B,
}

/// Payload remembering where it came from
type Tag = (Side, usize);

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Delays biased towards zero so simultaneous events are common
fn delay() -> impl Strategy<Value = Time> {
    prop_oneof![
        3 => Just(0i64),
        2 => 1i64..5,
        1 => 5i64..200,
    ]
}

/// Generate a cumulative sequence for one side
fn cumulative(side: Side) -> impl Strategy<Value = Cumulative<Tag>> {
    prop::collection::vec(delay(), 0..40).prop_map(move |delays| {
        let mut now = 0;
        let occurrences = delays
            .into_iter()
            .enumerate()
            .map(|(index, delay)| {
                now += delay;
                (now, (side, index))
            })
            .collect();
        Cumulative::from_vec(occurrences).expect("Generated times are non-negative")
    })
}

fn from_side(occurrences: &[Occurrence<Tag>], side: Side) -> Vec<Occurrence<Tag>> {
    occurrences
        .iter()
        .filter(|(_, (s, _))| *s == side)
        .cloned()
        .collect()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Length preservation
    ///
    /// The merge holds exactly as many entries as both inputs together.
    #[test]
    fn prop_merge_preserves_length(a in cumulative(Side::A), b in cumulative(Side::B)) {
        let expected = a.len() + b.len();
        let merged = combinators::merge(a, b);

        prop_assert_eq!(merged.len(), expected);
    }

    /// Property: Multiset preservation
    ///
    /// Every (time, payload) pair of the inputs appears in the output.
    #[test]
    fn prop_merge_preserves_multiset(a in cumulative(Side::A), b in cumulative(Side::B)) {
        let mut expected: Vec<_> = a.occurrences().iter().chain(b.occurrences()).cloned().collect();
        let mut actual = combinators::merge(a, b).into_occurrences();

        expected.sort();
        actual.sort();
        prop_assert_eq!(actual, expected);
    }

    /// Property: Order preservation
    ///
    /// Restricted to one side, the output equals that side unchanged.
    #[test]
    fn prop_merge_preserves_each_side(a in cumulative(Side::A), b in cumulative(Side::B)) {
        let (left, right) = (a.occurrences().to_vec(), b.occurrences().to_vec());
        let merged = combinators::merge(a, b);

        prop_assert_eq!(from_side(merged.occurrences(), Side::A), left);
        prop_assert_eq!(from_side(merged.occurrences(), Side::B), right);
    }

    /// Property: Non-decreasing output
    #[test]
    fn prop_merge_is_non_decreasing(a in cumulative(Side::A), b in cumulative(Side::B)) {
        let merged = combinators::merge(a, b);
        let times: Vec<Time> = merged.times().collect();

        prop_assert!(times.windows(2).all(|w| w[0] <= w[1]), "times out of order: {:?}", times);
    }

    /// Property: Tie-break determinism
    ///
    /// Among entries sharing a time, every A entry precedes every B entry.
    #[test]
    fn prop_merge_puts_left_first_on_ties(a in cumulative(Side::A), b in cumulative(Side::B)) {
        let merged = combinators::merge(a, b);

        for pair in merged.occurrences().windows(2) {
            let ((t0, (s0, _)), (t1, (s1, _))) = (&pair[0], &pair[1]);
            if t0 == t1 {
                prop_assert!(s0 <= s1, "B entry before A entry at time {}", t0);
            }
        }
    }

    /// Property: Span covers both inputs
    #[test]
    fn prop_merge_span_is_max(a in cumulative(Side::A), b in cumulative(Side::B)) {
        let expected = a.span().max(b.span());
        prop_assert_eq!(combinators::merge(a, b).span(), expected);
    }

    /// Property: Merging is deterministic
    #[test]
    fn prop_merge_is_deterministic(a in cumulative(Side::A), b in cumulative(Side::B)) {
        let first = combinators::merge(a.clone(), b.clone());
        let second = combinators::merge(a, b);

        prop_assert_eq!(first, second);
    }

    /// Property: Join collapsing
    ///
    /// The joined merge never repeats a time, and each group lists the plain
    /// merge's entries at that time in the same order.
    #[test]
    fn prop_merge_join_collapses_ties(a in cumulative(Side::A), b in cumulative(Side::B)) {
        let plain = combinators::merge(a.clone(), b.clone());
        let joined = combinators::merge_join(a, b);

        let times: Vec<Time> = joined.times().collect();
        prop_assert!(times.windows(2).all(|w| w[0] < w[1]), "repeated time in {:?}", times);

        let flattened: Vec<Occurrence<Tag>> = joined
            .into_occurrences()
            .into_iter()
            .flat_map(|(time, group)| group.into_iter().map(move |tag| (time, tag)))
            .collect();
        prop_assert_eq!(flattened, plain.into_occurrences());
    }
}
