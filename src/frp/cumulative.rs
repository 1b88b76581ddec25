// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cumulative - Absolute-Time Occurrences
//!
//! A `Cumulative<T>` is a fully materialized list of occurrences whose time
//! is the absolute offset from stream start, in non-decreasing order. It is
//! the form the merge engine works on: both heads must be visible at once,
//! so nothing here is lazy.
//!
//! # Mathematical Model
//!
//! ```text
//! Cumulative<T> ≅ ([(Time, T)], Span)      t₀ ≤ t₁ ≤ … ≤ tₙ ≤ Span
//! ```
//!
//! The span is the absolute end of the stream. It equals the last
//! occurrence's time unless the stream ended with a rest.
//!
//! # Conversions
//!
//! ```text
//!            to_cumulative                  from_cumulative
//! TimeStream ─────────────▶ Cumulative<T> ─────────────────▶ TimeStream
//!  (a,0) (b,500) (c,0)      (0,a) (500,b) (500,c)             (a,0) (b,500) (c,0)
//! ```
//!
//! Going back, the first event's delay is its absolute time, i.e. it is
//! measured from stream start.

use serde::Serialize;

use super::combinators;
use super::producer::CumulativeProducer;
use super::time_stream::TimeStream;
use super::{Occurrence, Time};
use crate::errors::{TimeStreamError, TimeStreamResult};

/// Absolute-time occurrences sorted by time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cumulative<T> {
    occurrences: Vec<Occurrence<T>>,
    span: Time,
}

impl<T> Cumulative<T> {
    /// Create a cumulative sequence from `(time, payload)` pairs
    ///
    /// Occurrences are stably sorted by time, so pairs sharing a time keep
    /// their given order. Negative times are rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cim_time_stream::frp::Cumulative;
    ///
    /// let seq = Cumulative::from_vec(vec![(1000, "b"), (0, "a")]).unwrap();
    /// assert_eq!(seq.occurrences(), &[(0, "a"), (1000, "b")]);
    /// assert_eq!(seq.span(), 1000);
    /// ```
    pub fn from_vec(mut occurrences: Vec<Occurrence<T>>) -> TimeStreamResult<Self> {
        if let Some((time, _)) = occurrences.iter().find(|(time, _)| *time < 0) {
            return Err(TimeStreamError::InvalidDelay(*time));
        }
        occurrences.sort_by_key(|(time, _)| *time);
        let span = occurrences.last().map_or(0, |(time, _)| *time);
        Ok(Self { occurrences, span })
    }

    pub fn empty() -> Self {
        Self {
            occurrences: Vec::new(),
            span: 0,
        }
    }

    /// Caller guarantees sorted, non-negative times and a span that covers them
    pub(crate) fn from_sorted(occurrences: Vec<Occurrence<T>>, span: Time) -> Self {
        debug_assert!(occurrences.windows(2).all(|w| w[0].0 <= w[1].0));
        debug_assert!(occurrences.last().map_or(true, |(time, _)| *time <= span));
        Self { occurrences, span }
    }

    /// Extend the span, e.g. to keep a trailing rest
    ///
    /// The span never shrinks below what it already covers.
    pub fn with_span(mut self, span: Time) -> Self {
        self.span = self.span.max(span);
        self
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Absolute end of the stream
    pub fn span(&self) -> Time {
        self.span
    }

    pub fn occurrences(&self) -> &[Occurrence<T>] {
        &self.occurrences
    }

    pub fn into_occurrences(self) -> Vec<Occurrence<T>> {
        self.occurrences
    }

    pub fn times(&self) -> impl Iterator<Item = Time> + '_ {
        self.occurrences.iter().map(|(time, _)| *time)
    }

    /// Transform payloads, keeping times
    pub fn map<U, F>(self, mut f: F) -> Cumulative<U>
    where
        F: FnMut(T) -> U,
    {
        Cumulative {
            occurrences: self
                .occurrences
                .into_iter()
                .map(|(time, payload)| (time, f(payload)))
                .collect(),
            span: self.span,
        }
    }

    /// Interleave with `other`, this sequence first on ties
    pub fn merge(self, other: Self) -> Self {
        combinators::merge(self, other)
    }

    /// Collapse occurrences sharing a time into one
    pub fn join(self) -> Cumulative<Vec<T>> {
        combinators::join(self)
    }

    /// Convert back to a delay-relative, single-use stream
    pub fn into_stream(self) -> TimeStream<T>
    where
        T: Send + 'static,
    {
        from_cumulative(self)
    }
}

impl<T> Default for Cumulative<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Drain a stream into absolute-time form
pub fn to_cumulative<T>(stream: &mut TimeStream<T>) -> TimeStreamResult<Cumulative<T>>
where
    T: Send + 'static,
{
    stream.to_cumulative()
}

/// Convert a cumulative sequence back to a delay-relative stream
///
/// Each delay is the gap to the previous occurrence; the first delay is the
/// first occurrence's absolute time. A span past the last occurrence is kept
/// as a trailing rest. The stream is single-use.
pub fn from_cumulative<T>(seq: Cumulative<T>) -> TimeStream<T>
where
    T: Send + 'static,
{
    let Cumulative { occurrences, span } = seq;
    TimeStream::from_producer(Box::new(CumulativeProducer::new(occurrences, span)))
}

/// Like `from_cumulative`, but occurrences at exactly the same time become
/// one event whose payload lists them in their original order
pub fn from_cumulative_joined<T>(seq: Cumulative<T>) -> TimeStream<Vec<T>>
where
    T: Send + 'static,
{
    from_cumulative(combinators::join(seq))
}
