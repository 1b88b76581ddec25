// Copyright (c) 2025 - Cowboy AI, Inc.
//! Time streams for the Composable Information Machine
//!
//! This crate models lazily produced sequences of timed events, merges them
//! with correct relative timing, and plays them back against an injected
//! wait primitive.

pub mod frp;
pub mod errors;
pub mod config;
pub mod pattern;
pub mod player;

// Re-export commonly used types
pub use errors::{TimeStreamError, TimeStreamResult};
pub use config::PlayerConfig;
pub use frp::{Cumulative, Event, SourceEntry, TimeStream};
pub use pattern::Pattern;
pub use player::{Player, StopHandle, TokioWait, Wait};
