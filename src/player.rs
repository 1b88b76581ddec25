// Copyright (c) 2025 - Cowboy AI, Inc.
//! Time Stream Playback
//!
//! A `Player` walks a `TimeStream` once, waiting each event's delay before
//! handing its payload to a sink. The wait itself is injected through the
//! `Wait` trait so playback can run against real time (`TokioWait`) or be
//! driven deterministically in tests.
//!
//! # Contract
//!
//! ```text
//! pull event ──▶ wait(delay) ──▶ sink(payload) ──▶ pull next event …
//! ```
//!
//! - Strictly sequential: one event at a time, no overlap.
//! - Rests fold into the next wait; a trailing rest is waited out when
//!   `PlayerConfig::play_trailing_rest` is set.
//! - Stopping takes effect before the next wait begins. A wait already in
//!   progress completes, and its event is delivered exactly once.
//!
//! # Example
//!
//! ```rust,no_run
//! use cim_time_stream::{frp::TimeStream, Player, PlayerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let foo = TimeStream::from_array(vec![("a", 0), ("b", 1000), ("c", 1000)])?;
//!     let bar = TimeStream::from_array(vec![("f", 0), ("g", 1000)])?;
//!     let mut song = foo.concat(bar.delay(1000)?);
//!
//!     let player = Player::new(PlayerConfig::default());
//!     player.consume_with_time(&mut song, |name| println!("{name}")).await?;
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use futures::{future, Stream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::config::PlayerConfig;
use crate::errors::TimeStreamResult;
use crate::frp::{BoxProducer, Step, Time, TimeStream};

/// Suspends the current task for a duration
#[async_trait]
pub trait Wait: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// `Wait` backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioWait;

#[async_trait]
impl Wait for TokioWait {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Requests that playback stop before its next wait
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Plays time streams against a wait primitive
pub struct Player<W = TokioWait> {
    wait: W,
    config: PlayerConfig,
    stop: StopHandle,
}

impl Player<TokioWait> {
    /// Create a player that waits in real time
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_wait(TokioWait, config)
    }
}

impl<W: Wait> Player<W> {
    /// Create a player with a custom wait primitive
    pub fn with_wait(wait: W, config: PlayerConfig) -> Self {
        Self {
            wait,
            config,
            stop: StopHandle::default(),
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Handle that stops this player before its next wait
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Start playing `stream` as an async stream of payloads
    ///
    /// Each payload is yielded only after its delay has been waited out. The
    /// returned stream ends when the time stream is exhausted, the player is
    /// stopped, or a negative rest turns up.
    pub fn play<T>(
        &self,
        stream: &mut TimeStream<T>,
    ) -> TimeStreamResult<impl Stream<Item = T> + '_>
    where
        T: Send + 'static,
    {
        let timed = self.timed(self.start(stream)?);
        Ok(timed
            .take_while(|payload| future::ready(payload.is_ok()))
            .filter_map(|payload| future::ready(payload.ok())))
    }

    /// Play `stream`, handing each payload to `sink` after its delay
    ///
    /// Returns the number of payloads delivered.
    pub async fn consume_with_time<T, F>(
        &self,
        stream: &mut TimeStream<T>,
        mut sink: F,
    ) -> TimeStreamResult<usize>
    where
        T: Send + 'static,
        F: FnMut(T) + Send,
    {
        let payloads = self.timed(self.start(stream)?);
        futures::pin_mut!(payloads);

        let mut delivered = 0;
        while let Some(payload) = payloads.next().await {
            sink(payload?);
            delivered += 1;
        }

        debug!(delivered, "playback finished");
        Ok(delivered)
    }

    fn start<T>(&self, stream: &mut TimeStream<T>) -> TimeStreamResult<BoxProducer<T>>
    where
        T: Send + 'static,
    {
        let producer = stream.producer()?;
        info!(
            restartable = stream.is_restartable(),
            unit_micros = self.config.unit_micros,
            "starting playback"
        );
        Ok(producer)
    }

    /// Payloads in playback order; an error ends the stream
    fn timed<T>(&self, producer: BoxProducer<T>) -> impl Stream<Item = TimeStreamResult<T>> + '_
    where
        T: Send + 'static,
    {
        futures::stream::unfold(Some(producer), move |state| async move {
            let Some(mut producer) = state else {
                return None;
            };
            match self.next_payload(&mut producer).await {
                Some(Ok(payload)) => Some((Ok(payload), Some(producer))),
                Some(Err(error)) => Some((Err(error), None)),
                None => None,
            }
        })
    }

    async fn next_payload<T>(
        &self,
        producer: &mut BoxProducer<T>,
    ) -> Option<TimeStreamResult<T>> {
        let mut rest: Time = 0;
        loop {
            let step = match producer.pull().checked() {
                Ok(step) => step,
                Err(error) => {
                    warn!(%error, "negative rest, ending playback");
                    return Some(Err(error));
                }
            };
            match step {
                Step::Interval(amount) => rest = rest.saturating_add(amount),
                Step::Event(event) => {
                    let (payload, delay) = event.into_parts();
                    if self.stopped() {
                        return None;
                    }
                    let duration = self.config.duration_of(rest.saturating_add(delay));
                    trace!(?duration, "waiting for next event");
                    self.wait.wait(duration).await;
                    return Some(Ok(payload));
                }
                Step::End => {
                    if rest > 0 && self.config.play_trailing_rest && !self.stopped() {
                        let duration = self.config.duration_of(rest);
                        trace!(?duration, "waiting out trailing rest");
                        self.wait.wait(duration).await;
                    }
                    return None;
                }
            }
        }
    }

    fn stopped(&self) -> bool {
        let stopped = self.stop.is_stopped();
        if stopped {
            info!("playback stopped");
        }
        stopped
    }
}
