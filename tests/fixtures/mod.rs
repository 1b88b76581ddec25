// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-time-stream
//!
//! Deterministic drum patterns shared by the integration tests. All delays
//! are in milliseconds.

#![allow(dead_code)]

use cim_time_stream::frp::{Time, TimeStream};

/// Kick on every beat: delays 0, 500, 500
pub const KICKS: [(&str, Time); 3] = [("kick", 0), ("kick", 500), ("kick", 500)];

/// Snare on the off-beats: delays 500, 500
pub const SNARES: [(&str, Time); 2] = [("snare", 500), ("snare", 500)];

pub fn kicks() -> TimeStream<&'static str> {
    TimeStream::from_array(KICKS).expect("Invalid kick fixture")
}

pub fn snares() -> TimeStream<&'static str> {
    TimeStream::from_array(SNARES).expect("Invalid snare fixture")
}

/// Drain a stream into `(payload, delay)` pairs
pub fn played<T: Send + 'static>(stream: &mut TimeStream<T>) -> Vec<(T, Time)> {
    stream
        .events()
        .expect("Stream already consumed")
        .map(|event| event.into_parts())
        .collect()
}
