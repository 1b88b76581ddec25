// Copyright (c) 2025 - Cowboy AI, Inc.
//! TimeStream - Lazy Delay-Relative Event Sequences
//!
//! A `TimeStream<T>` owns a producer of events in delay-relative form.
//! Operators (`map`, `delay`, `concat`) wrap the producer and return a new
//! stream; nothing runs until a terminal operation (`events`, `for_each`,
//! `consume`, `to_cumulative`) pulls it.
//!
//! # Restartability
//!
//! Whether a stream can be traversed more than once is explicit:
//!
//! - **Restartable** streams hold a factory and build a fresh producer for
//!   every traversal (`from_array`, `from_entries`, `from_factory`).
//! - **Single-use** streams hold one producer and hand it out once
//!   (`from_iter_once`, streams rebuilt from a cumulative sequence). A second
//!   traversal fails with `TimeStreamError::ExhaustedStreamReuse`.
//!
//! Operators keep a stream restartable only when all of their inputs are.
//!
//! # Examples
//!
//! ```rust
//! use cim_time_stream::frp::TimeStream;
//!
//! let bar = TimeStream::from_array(vec![("a", 0), ("b", 1000)]).unwrap();
//! let later = TimeStream::from_array(vec![("c", 0)]).unwrap();
//!
//! let mut song = bar.concat(later.delay(1000).unwrap());
//! let delays: Vec<i64> = song.events().unwrap().map(|e| e.delay()).collect();
//! assert_eq!(delays, vec![0, 1000, 1000]);
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::combinators;
use super::cumulative::Cumulative;
use super::event::{validate_delay, Event, SourceEntry, Step};
use super::producer::{
    BoxProducer, ChainProducer, DeferredProducer, DelayProducer, EventFn, IterProducer,
    MapProducer,
};
use super::Time;
use crate::errors::{TimeStreamError, TimeStreamResult};

type Factory<T> = Arc<dyn Fn() -> BoxProducer<T> + Send + Sync>;

enum Source<T> {
    /// Single-use; `None` once handed out
    Once(Option<BoxProducer<T>>),
    /// Restartable
    Factory(Factory<T>),
}

impl<T: 'static> Source<T> {
    /// Single-use view; a factory is not called until the first pull
    fn into_once(self) -> Option<BoxProducer<T>> {
        match self {
            Source::Once(producer) => producer,
            Source::Factory(factory) => {
                Some(Box::new(DeferredProducer::new(factory)) as BoxProducer<T>)
            }
        }
    }
}

/// Lazily produced sequence of delay-relative events
pub struct TimeStream<T> {
    source: Source<T>,
}

impl<T> fmt::Debug for TimeStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.source {
            Source::Once(Some(_)) => "single-use",
            Source::Once(None) => "exhausted",
            Source::Factory(_) => "restartable",
        };
        write!(f, "TimeStream<{}>({})", std::any::type_name::<T>(), kind)
    }
}

impl<T: Send + 'static> TimeStream<T> {
    /// A restartable stream with no events
    pub fn empty() -> Self {
        Self::from_factory(std::iter::empty)
    }

    /// Build a restartable stream from `(payload, delay)` pairs
    ///
    /// Fails with `InvalidDelay` on the first negative delay.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cim_time_stream::frp::TimeStream;
    ///
    /// let kicks = TimeStream::from_array(vec![("kick", 0), ("kick", 500)]).unwrap();
    /// assert!(kicks.is_restartable());
    /// assert!(TimeStream::from_array(vec![("kick", -1)]).is_err());
    /// ```
    pub fn from_array<I>(pairs: I) -> TimeStreamResult<Self>
    where
        I: IntoIterator<Item = (T, Time)>,
        T: Clone + Sync,
    {
        let steps = pairs
            .into_iter()
            .map(|(payload, delay)| Event::new(payload, delay).map(Step::Event))
            .collect::<TimeStreamResult<Vec<_>>>()?;
        Ok(Self::from_steps(steps))
    }

    /// Build a restartable stream from source entries, including rests
    ///
    /// A rest pushes the next event later; a trailing rest extends the
    /// stream so that anything concatenated after it starts later. Fails
    /// with `InvalidDelay` on the first negative rest.
    pub fn from_entries<I>(entries: I) -> TimeStreamResult<Self>
    where
        I: IntoIterator<Item = SourceEntry<T>>,
        T: Clone + Sync,
    {
        let steps = entries
            .into_iter()
            .map(|entry| Step::from(entry).checked())
            .collect::<TimeStreamResult<Vec<_>>>()?;
        Ok(Self::from_steps(steps))
    }

    fn from_steps(steps: Vec<Step<T>>) -> Self
    where
        T: Clone + Sync,
    {
        let steps = Arc::new(steps);
        Self {
            source: Source::Factory(Arc::new(move || {
                let steps = steps.as_ref().clone();
                Box::new(IterProducer::new(steps.into_iter())) as BoxProducer<T>
            })),
        }
    }

    /// Wrap a one-shot iterator of events; the stream is single-use
    pub fn from_iter_once<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event<T>>,
        I::IntoIter: Send + 'static,
    {
        let steps = events.into_iter().map(Step::Event);
        Self::from_producer(Box::new(IterProducer::new(steps)))
    }

    /// Wrap a factory that yields a fresh event iterator per traversal
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cim_time_stream::frp::{Event, TimeStream};
    ///
    /// let mut ticks = TimeStream::from_factory(|| (0..3).map(|i| Event::immediate(i)));
    /// assert_eq!(ticks.events().unwrap().count(), 3);
    /// assert_eq!(ticks.events().unwrap().count(), 3);
    /// ```
    pub fn from_factory<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = Event<T>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            source: Source::Factory(Arc::new(move || {
                let steps = factory().into_iter().map(Step::Event);
                Box::new(IterProducer::new(steps)) as BoxProducer<T>
            })),
        }
    }

    /// Wrap a custom producer; the stream is single-use
    ///
    /// A negative `Step::Interval` from the producer surfaces as
    /// `InvalidDelay` when the stream is traversed.
    pub fn from_producer(producer: BoxProducer<T>) -> Self {
        Self {
            source: Source::Once(Some(producer)),
        }
    }

    /// Whether every traversal gets a fresh producer
    pub fn is_restartable(&self) -> bool {
        matches!(self.source, Source::Factory(_))
    }

    /// Hand out a producer for one traversal
    pub(crate) fn producer(&mut self) -> TimeStreamResult<BoxProducer<T>> {
        match &mut self.source {
            Source::Once(producer) => producer
                .take()
                .ok_or(TimeStreamError::ExhaustedStreamReuse),
            Source::Factory(factory) => Ok(factory()),
        }
    }

    fn wrap<U, G>(self, wrap: G) -> TimeStream<U>
    where
        U: Send + 'static,
        G: Fn(BoxProducer<T>) -> BoxProducer<U> + Send + Sync + 'static,
    {
        let source = match self.source {
            Source::Once(producer) => Source::Once(producer.map(&wrap)),
            Source::Factory(factory) => Source::Factory(Arc::new(move || wrap(factory()))),
        };
        TimeStream { source }
    }

    /// Transform every payload, keeping delays
    ///
    /// `f` runs once per event, in order, only while the result is traversed.
    pub fn map<U, F>(self, f: F) -> TimeStream<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.map_events(move |event| event.map(&f))
    }

    /// Transform whole events, so `f` may also change delays
    pub fn map_events<U, F>(self, f: F) -> TimeStream<U>
    where
        U: Send + 'static,
        F: Fn(Event<T>) -> Event<U> + Send + Sync + 'static,
    {
        let f: EventFn<T, U> = Arc::new(f);
        self.wrap(move |inner| Box::new(MapProducer::new(inner, f.clone())) as BoxProducer<U>)
    }

    /// Push the whole stream `amount` units later
    ///
    /// Only the first payload event's delay grows; the rest are relative to
    /// it and move along. A stream holding only rests grows by `amount` at
    /// its end. On a stream with no steps at all this is a no-op. A negative
    /// amount fails with `InvalidDelay`.
    pub fn delay(self, amount: Time) -> TimeStreamResult<Self> {
        validate_delay(amount)?;
        Ok(self.wrap(move |inner| Box::new(DelayProducer::new(inner, amount)) as BoxProducer<T>))
    }

    /// Play `other` right after this stream
    ///
    /// Neither operand is pulled until the result is traversed.
    pub fn concat(self, other: Self) -> Self {
        let source = match (self.source, other.source) {
            (Source::Factory(first), Source::Factory(second)) => {
                Source::Factory(Arc::new(move || {
                    Box::new(ChainProducer::new(first(), second())) as BoxProducer<T>
                }))
            }
            (first, second) => match (first.into_once(), second.into_once()) {
                (Some(first), Some(second)) => {
                    let chain = ChainProducer::new(first, second);
                    Source::Once(Some(Box::new(chain) as BoxProducer<T>))
                }
                _ => Source::Once(None),
            },
        };
        Self { source }
    }

    /// Start a traversal yielding delay-relative events
    ///
    /// Rests are folded into the delay of the next event. A trailing rest
    /// has nothing to attach to and is dropped. A negative rest ends the
    /// traversal; `Events::finish` reports it.
    pub fn events(&mut self) -> TimeStreamResult<Events<T>> {
        Ok(Events {
            producer: self.producer()?,
            rest: 0,
            error: None,
        })
    }

    /// Drain the stream, handing every event to `sink`
    pub fn for_each<F>(&mut self, mut sink: F) -> TimeStreamResult<()>
    where
        F: FnMut(Event<T>),
    {
        let mut events = self.events()?;
        for event in events.by_ref() {
            sink(event);
        }
        events.finish()
    }

    /// Drain the stream, handing every payload to `sink`
    pub fn consume<F>(&mut self, mut sink: F) -> TimeStreamResult<()>
    where
        F: FnMut(T),
    {
        self.for_each(|event| sink(event.into_payload()))
    }

    pub fn collect_events(&mut self) -> TimeStreamResult<Vec<Event<T>>> {
        let mut events = self.events()?;
        let collected = events.by_ref().collect();
        events.finish()?;
        Ok(collected)
    }

    /// Drain the stream into absolute-time form
    ///
    /// Each occurrence's time is the running sum of delays and rests; the
    /// first occurrence's time is its own delay. The span covers trailing
    /// rests too. A negative rest fails with `InvalidDelay`.
    pub fn to_cumulative(&mut self) -> TimeStreamResult<Cumulative<T>> {
        let mut producer = self.producer()?;
        let mut now: Time = 0;
        let mut occurrences = Vec::new();

        loop {
            match producer.pull().checked()? {
                Step::Event(event) => {
                    let (payload, delay) = event.into_parts();
                    now = now.saturating_add(delay);
                    occurrences.push((now, payload));
                }
                Step::Interval(amount) => now = now.saturating_add(amount),
                Step::End => break,
            }
        }

        trace!(
            occurrences = occurrences.len(),
            span = now,
            "stream converted to cumulative form"
        );
        Ok(Cumulative::from_sorted(occurrences, now))
    }

    /// Interleave two streams by absolute time, this stream first on ties
    ///
    /// Both streams are drained here; the result is single-use.
    pub fn merge(mut self, mut other: Self) -> TimeStreamResult<Self> {
        let merged = combinators::merge(self.to_cumulative()?, other.to_cumulative()?);
        Ok(merged.into_stream())
    }

    /// Like `merge`, but events landing on the same instant become one event
    /// carrying all their payloads
    pub fn merge_join(mut self, mut other: Self) -> TimeStreamResult<TimeStream<Vec<T>>> {
        let joined = combinators::merge_join(self.to_cumulative()?, other.to_cumulative()?);
        Ok(joined.into_stream())
    }
}

/// Pull iterator over a stream's events
pub struct Events<T> {
    producer: BoxProducer<T>,
    rest: Time,
    error: Option<TimeStreamError>,
}

impl<T> Events<T> {
    /// Whether the traversal ended cleanly
    ///
    /// Fails with `InvalidDelay` when a negative rest cut it short.
    pub fn finish(self) -> TimeStreamResult<()> {
        self.error.map_or(Ok(()), Err)
    }
}

impl<T> Iterator for Events<T> {
    type Item = Event<T>;

    fn next(&mut self) -> Option<Event<T>> {
        if self.error.is_some() {
            return None;
        }
        loop {
            match self.producer.pull().checked() {
                Ok(Step::Event(event)) => {
                    let rest = std::mem::take(&mut self.rest);
                    return Some(event.shifted(rest));
                }
                Ok(Step::Interval(amount)) => self.rest = self.rest.saturating_add(amount),
                Ok(Step::End) => return None,
                Err(error) => {
                    self.error = Some(error);
                    return None;
                }
            }
        }
    }
}
