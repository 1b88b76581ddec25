// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pull-based producers behind every `TimeStream`
//!
//! Operators compose by wrapping one producer in another, so nothing is
//! computed until the outermost producer is pulled.

use std::sync::Arc;

use super::event::{Event, Step};
use super::{Occurrence, Time};

/// Source of `Step`s, pulled one at a time
///
/// Once `pull` has returned `Step::End` every later call returns `End` too.
pub trait Producer<T>: Send {
    fn pull(&mut self) -> Step<T>;
}

pub type BoxProducer<T> = Box<dyn Producer<T>>;

pub(crate) type EventFn<T, U> = Arc<dyn Fn(Event<T>) -> Event<U> + Send + Sync>;

/// Adapts any iterator of steps
pub(crate) struct IterProducer<I> {
    iter: std::iter::Fuse<I>,
}

impl<I> IterProducer<I>
where
    I: Iterator,
{
    pub(crate) fn new(iter: I) -> Self {
        Self { iter: iter.fuse() }
    }
}

impl<T, I> Producer<T> for IterProducer<I>
where
    I: Iterator<Item = Step<T>> + Send,
{
    fn pull(&mut self) -> Step<T> {
        self.iter.next().unwrap_or(Step::End)
    }
}

pub(crate) struct MapProducer<T, U> {
    inner: BoxProducer<T>,
    f: EventFn<T, U>,
}

impl<T, U> MapProducer<T, U> {
    pub(crate) fn new(inner: BoxProducer<T>, f: EventFn<T, U>) -> Self {
        Self { inner, f }
    }
}

impl<T: 'static, U: 'static> Producer<U> for MapProducer<T, U> {
    fn pull(&mut self) -> Step<U> {
        match self.inner.pull() {
            Step::Event(event) => Step::Event((self.f)(event)),
            Step::Interval(amount) => Step::Interval(amount),
            Step::End => Step::End,
        }
    }
}

/// Adds `amount` to the first payload event only
///
/// A producer that yields rests but no event gets `amount` as a closing
/// `Interval` instead. One that yields nothing at all stays empty.
pub(crate) struct DelayProducer<T> {
    inner: BoxProducer<T>,
    pending: Option<Time>,
    rested: bool,
}

impl<T> DelayProducer<T> {
    pub(crate) fn new(inner: BoxProducer<T>, amount: Time) -> Self {
        Self {
            inner,
            pending: Some(amount),
            rested: false,
        }
    }
}

impl<T: 'static> Producer<T> for DelayProducer<T> {
    fn pull(&mut self) -> Step<T> {
        match self.inner.pull() {
            Step::Event(event) => match self.pending.take() {
                Some(amount) => Step::Event(event.shifted(amount)),
                None => Step::Event(event),
            },
            Step::Interval(amount) => {
                self.rested = true;
                Step::Interval(amount)
            }
            Step::End => match self.pending.take() {
                Some(amount) if self.rested && amount > 0 => Step::Interval(amount),
                _ => Step::End,
            },
        }
    }
}

/// Builds its inner producer on the first pull
pub(crate) struct DeferredProducer<T> {
    factory: Option<Arc<dyn Fn() -> BoxProducer<T> + Send + Sync>>,
    inner: Option<BoxProducer<T>>,
}

impl<T> DeferredProducer<T> {
    pub(crate) fn new(factory: Arc<dyn Fn() -> BoxProducer<T> + Send + Sync>) -> Self {
        Self {
            factory: Some(factory),
            inner: None,
        }
    }
}

impl<T: 'static> Producer<T> for DeferredProducer<T> {
    fn pull(&mut self) -> Step<T> {
        if let Some(factory) = self.factory.take() {
            self.inner = Some(factory());
        }
        match self.inner.as_mut() {
            Some(inner) => inner.pull(),
            None => Step::End,
        }
    }
}

/// Drains `first`, then `second`
pub(crate) struct ChainProducer<T> {
    first: Option<BoxProducer<T>>,
    second: BoxProducer<T>,
}

impl<T> ChainProducer<T> {
    pub(crate) fn new(first: BoxProducer<T>, second: BoxProducer<T>) -> Self {
        Self {
            first: Some(first),
            second,
        }
    }
}

impl<T: 'static> Producer<T> for ChainProducer<T> {
    fn pull(&mut self) -> Step<T> {
        if let Some(first) = self.first.as_mut() {
            match first.pull() {
                Step::End => self.first = None,
                step => return step,
            }
        }
        self.second.pull()
    }
}

/// Replays absolute-time occurrences as delay-relative steps
///
/// The first event's delay is its absolute time. A span past the last
/// occurrence comes out as a trailing `Interval`.
pub(crate) struct CumulativeProducer<T> {
    occurrences: std::vec::IntoIter<Occurrence<T>>,
    cursor: Time,
    span: Time,
}

impl<T> CumulativeProducer<T> {
    pub(crate) fn new(occurrences: Vec<Occurrence<T>>, span: Time) -> Self {
        Self {
            occurrences: occurrences.into_iter(),
            cursor: 0,
            span,
        }
    }
}

impl<T: Send> Producer<T> for CumulativeProducer<T> {
    fn pull(&mut self) -> Step<T> {
        match self.occurrences.next() {
            Some((at, payload)) => {
                let delay = at - self.cursor;
                self.cursor = at;
                Step::Event(Event::from_valid(payload, delay))
            }
            None if self.span > self.cursor => {
                let rest = self.span - self.cursor;
                self.cursor = self.span;
                Step::Interval(rest)
            }
            None => Step::End,
        }
    }
}
