// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Cumulative Converter
//!
//! Converting between delay-relative and absolute-time form must lose
//! nothing, and merged streams must come back in playback order.

use cim_time_stream::frp::{from_cumulative, to_cumulative, Cumulative, Time, TimeStream};
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate delay-relative (payload, delay) pairs
fn pairs() -> impl Strategy<Value = Vec<(u32, Time)>> {
    prop::collection::vec((any::<u32>(), prop_oneof![Just(0i64), 0i64..1_000]), 0..50)
}

/// Generate a cumulative sequence, possibly ending in a rest
fn cumulative() -> impl Strategy<Value = Cumulative<u32>> {
    (prop::collection::vec((0i64..10_000, any::<u32>()), 0..50), 0i64..500).prop_map(
        |(occurrences, tail)| {
            let seq = Cumulative::from_vec(occurrences).expect("Generated times are non-negative");
            let span = seq.span() + tail;
            seq.with_span(span)
        },
    )
}

fn played<T: Send + 'static>(stream: &mut TimeStream<T>) -> Vec<(T, Time)> {
    stream
        .events()
        .expect("Stream already consumed")
        .map(|event| event.into_parts())
        .collect()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Round-trip
    ///
    /// to_cumulative(from_cumulative(seq)) reproduces seq exactly.
    #[test]
    fn prop_cumulative_round_trip(seq in cumulative()) {
        let mut stream = from_cumulative(seq.clone());
        let back = to_cumulative(&mut stream).unwrap();

        prop_assert_eq!(back, seq);
    }

    /// Property: Delay-relative round-trip
    ///
    /// A stream converted to cumulative form and back plays the same events.
    #[test]
    fn prop_stream_round_trip(source in pairs()) {
        let mut stream = TimeStream::from_array(source.clone()).unwrap();
        let mut back = from_cumulative(stream.to_cumulative().unwrap());

        prop_assert_eq!(played(&mut back), source);
    }

    /// Property: Absolute time is the running sum of delays
    #[test]
    fn prop_cumulative_times_are_running_sums(source in pairs()) {
        let mut stream = TimeStream::from_array(source.clone()).unwrap();
        let seq = stream.to_cumulative().unwrap();

        let mut now = 0;
        for ((payload, delay), (time, converted)) in source.iter().zip(seq.occurrences()) {
            now += delay;
            prop_assert_eq!(*time, now);
            prop_assert_eq!(converted, payload);
        }
        prop_assert_eq!(seq.span(), now);
    }

    /// Property: Merged streams come back in playback order
    ///
    /// Delays are non-negative and sum back to the merged absolute times.
    #[test]
    fn prop_merged_stream_is_playable(left in pairs(), right in pairs()) {
        let a = TimeStream::from_array(left.clone()).unwrap();
        let b = TimeStream::from_array(right.clone()).unwrap();
        let expected = a.merge(b).and_then(|mut s| s.to_cumulative()).unwrap();

        let mut replay = TimeStream::from_array(left)
            .unwrap()
            .merge(TimeStream::from_array(right).unwrap())
            .unwrap();
        let events = played(&mut replay);

        prop_assert!(events.iter().all(|(_, delay)| *delay >= 0));

        let mut now = 0;
        let times: Vec<Time> = events.iter().map(|(_, delay)| { now += delay; now }).collect();
        prop_assert_eq!(times, expected.times().collect::<Vec<_>>());
    }

    /// Property: Delaying shifts every absolute time by the same amount
    #[test]
    fn prop_delay_shifts_timeline(source in pairs(), amount in 0i64..5_000) {
        let original = TimeStream::from_array(source.clone()).unwrap().to_cumulative().unwrap();
        let shifted = TimeStream::from_array(source)
            .unwrap()
            .delay(amount)
            .unwrap()
            .to_cumulative()
            .unwrap();

        let expected: Vec<Time> = original.times().map(|t| t + amount).collect();
        prop_assert_eq!(shifted.times().collect::<Vec<_>>(), expected);
    }

    /// Property: Concatenation appends the second timeline after the first
    #[test]
    fn prop_concat_offsets_second_stream(left in pairs(), right in pairs()) {
        let first = TimeStream::from_array(left.clone()).unwrap().to_cumulative().unwrap();
        let second = TimeStream::from_array(right.clone()).unwrap().to_cumulative().unwrap();

        let joined = TimeStream::from_array(left)
            .unwrap()
            .concat(TimeStream::from_array(right).unwrap())
            .to_cumulative()
            .unwrap();

        let expected: Vec<Time> = first
            .times()
            .chain(second.times().map(|t| t + first.span()))
            .collect();
        prop_assert_eq!(joined.times().collect::<Vec<_>>(), expected);
        prop_assert_eq!(joined.span(), first.span() + second.span());
    }
}
