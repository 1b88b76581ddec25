// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event - Delay-Relative Occurrences
//!
//! An `Event<T>` pairs a payload with a delay: the time elapsed since the
//! previous event of the same stream (or since stream start for the first
//! event). A delay of zero means "at the same moment as the previous event".
//!
//! # Mathematical Model
//!
//! ```text
//! Event<T>  ≅ (T, Delay)          Delay ≥ 0
//! Step<T>   = Event(Event<T>) | Interval(Delay) | End
//! ```
//!
//! `Step` is what a producer hands out when pulled. An `Interval` advances
//! time without a payload (a rest) and folds into the delay of whatever
//! comes next.
//!
//! # Examples
//!
//! ```rust
//! use cim_time_stream::frp::Event;
//!
//! let kick = Event::new("kick", 500).unwrap();
//! assert_eq!(kick.delay(), 500);
//!
//! let louder = kick.map(|name| name.to_uppercase());
//! assert_eq!(louder.payload(), "KICK");
//! assert_eq!(louder.delay(), 500);
//!
//! assert!(Event::new("snare", -1).is_err());
//! ```

use serde::{Deserialize, Serialize};

use super::Time;
use crate::errors::{TimeStreamError, TimeStreamResult};

/// A payload scheduled `delay` time units after the previous event
///
/// Events are immutable values. Operators that change timing build new
/// events instead of touching the ones they were handed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event<T> {
    payload: T,
    delay: Time,
}

impl<T> Event<T> {
    /// Create an event, rejecting negative delays
    pub fn new(payload: T, delay: Time) -> TimeStreamResult<Self> {
        validate_delay(delay)?;
        Ok(Self { payload, delay })
    }

    /// Create an event that fires together with the previous one
    pub fn immediate(payload: T) -> Self {
        Self { payload, delay: 0 }
    }

    /// Built from a delay the caller has already proven non-negative
    pub(crate) fn from_valid(payload: T, delay: Time) -> Self {
        debug_assert!(delay >= 0, "negative delay {delay}");
        Self { payload, delay }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn delay(&self) -> Time {
        self.delay
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Split into `(payload, delay)`
    pub fn into_parts(self) -> (T, Time) {
        (self.payload, self.delay)
    }

    /// Transform the payload, keeping the delay
    pub fn map<U, F>(self, f: F) -> Event<U>
    where
        F: FnOnce(T) -> U,
    {
        Event {
            payload: f(self.payload),
            delay: self.delay,
        }
    }

    /// Return a copy of this event pushed `amount` units later
    pub fn delayed_by(self, amount: Time) -> TimeStreamResult<Self> {
        validate_delay(amount)?;
        Ok(self.shifted(amount))
    }

    pub(crate) fn shifted(self, amount: Time) -> Self {
        Self {
            payload: self.payload,
            delay: self.delay.saturating_add(amount),
        }
    }
}

/// Result of pulling a producer once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    /// A payload-carrying event
    Event(Event<T>),
    /// Time passes with no payload
    Interval(Time),
    /// The producer is exhausted
    End,
}

impl<T> Step<T> {
    /// Reject an `Interval` that would move time backwards
    pub(crate) fn checked(self) -> TimeStreamResult<Self> {
        if let Step::Interval(amount) = &self {
            validate_delay(*amount)?;
        }
        Ok(self)
    }
}

/// One entry of the event-aware source literal format
///
/// In JSON an event is written as `["kick", 500]` and a rest as
/// `{"rest": 250}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEntry<T>")]
pub enum SourceEntry<T> {
    /// A payload after a delay
    Event(Event<T>),
    /// Advance time by the given amount with no payload
    Interval(Time),
}

impl<T> SourceEntry<T> {
    pub fn event(payload: T, delay: Time) -> TimeStreamResult<Self> {
        Event::new(payload, delay).map(SourceEntry::Event)
    }

    pub fn rest(amount: Time) -> TimeStreamResult<Self> {
        validate_delay(amount)?;
        Ok(SourceEntry::Interval(amount))
    }
}

impl<T> From<Event<T>> for SourceEntry<T> {
    fn from(event: Event<T>) -> Self {
        SourceEntry::Event(event)
    }
}

impl<T> From<SourceEntry<T>> for Step<T> {
    fn from(entry: SourceEntry<T>) -> Self {
        match entry {
            SourceEntry::Event(event) => Step::Event(event),
            SourceEntry::Interval(amount) => Step::Interval(amount),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry<T> {
    Rest { rest: Time },
    Event(T, Time),
}

impl<T> TryFrom<RawEntry<T>> for SourceEntry<T> {
    type Error = TimeStreamError;

    fn try_from(raw: RawEntry<T>) -> Result<Self, Self::Error> {
        match raw {
            RawEntry::Rest { rest } => SourceEntry::rest(rest),
            RawEntry::Event(payload, delay) => SourceEntry::event(payload, delay),
        }
    }
}

pub(crate) fn validate_delay(delay: Time) -> TimeStreamResult<()> {
    if delay < 0 {
        return Err(TimeStreamError::InvalidDelay(delay));
    }
    Ok(())
}
