// Copyright (c) 2025 - Cowboy AI, Inc.
//! Time Streams
//!
//! This module models lazily produced sequences of discrete events where each
//! event carries a payload and a delay since the previous event. Streams can
//! be transformed, concatenated and merged with one another so that every
//! event from both sides keeps its relative timing, including simultaneous
//! events and zero-length gaps.
//!
//! # Core Concepts
//!
//! ## Event<T>
//!
//! A payload plus a delay. Immutable.
//!
//! ## TimeStream<T> (Delay-Relative)
//!
//! A lazy, pull-based sequence of events. Each delay is measured from the
//! previous event.
//!
//! ```text
//! Time:  ─────────────────────────────────→
//! Delay: ●──500──●──500──●
//!        0       500     500
//! ```
//!
//! ## Cumulative<T> (Absolute-Time)
//!
//! A materialized sequence where each time is measured from stream start.
//!
//! ```text
//! Time:  ─────────────────────────────────→
//! At:    ●       ●       ●
//!        0       500     1000
//! ```
//!
//! # Merging
//!
//! Merging converts both streams to cumulative form, interleaves them by
//! absolute time (left stream first on ties), optionally joins occurrences
//! on the same instant, and converts back to delay-relative form. The result
//! is already in playback order:
//!
//! ```rust
//! use cim_time_stream::frp::TimeStream;
//!
//! let kicks = TimeStream::from_array(vec![("kick", 0), ("kick", 500), ("kick", 500)]).unwrap();
//! let snares = TimeStream::from_array(vec![("snare", 500), ("snare", 500)]).unwrap();
//!
//! let mut beat = kicks.merge(snares).unwrap();
//! let played: Vec<(&str, i64)> = beat.events().unwrap().map(|e| e.into_parts()).collect();
//!
//! assert_eq!(
//!     played,
//!     vec![("kick", 0), ("kick", 500), ("snare", 0), ("kick", 500), ("snare", 0)]
//! );
//! ```

pub mod event;
pub mod producer;
pub mod time_stream;
pub mod cumulative;
pub mod combinators;

pub use event::{Event, SourceEntry, Step};
pub use producer::{BoxProducer, Producer};
pub use time_stream::{Events, TimeStream};
pub use cumulative::{from_cumulative, from_cumulative_joined, to_cumulative, Cumulative};
pub use combinators::{join, merge, merge_all, merge_join};

/// Abstract time unit (delays and absolute offsets)
pub type Time = i64;

/// One absolute-time entry: `(time, payload)`
pub type Occurrence<T> = (Time, T);
