// Copyright (c) 2025 - Cowboy AI, Inc.
//! Playback configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{TimeStreamError, TimeStreamResult};
use crate::frp::Time;

/// Environment variable holding the length of one time unit in microseconds
pub const UNIT_MICROS_ENV: &str = "TIMESTREAM_UNIT_MICROS";

/// Environment variable toggling whether trailing rests are waited out
pub const TRAILING_REST_ENV: &str = "TIMESTREAM_TRAILING_REST";

/// Configuration for turning abstract time units into real waits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Length of one time unit in microseconds (1000 = milliseconds)
    pub unit_micros: u64,

    /// Wait out a rest at the end of the stream before returning
    pub play_trailing_rest: bool,
}

impl PlayerConfig {
    /// Create a configuration with the given unit length
    pub fn new(unit: Duration) -> Self {
        Self {
            unit_micros: u64::try_from(unit.as_micros()).unwrap_or(u64::MAX),
            ..Self::default()
        }
    }

    /// Set whether trailing rests are waited out
    pub fn with_trailing_rest(mut self, play_trailing_rest: bool) -> Self {
        self.play_trailing_rest = play_trailing_rest;
        self
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> TimeStreamResult<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(UNIT_MICROS_ENV) {
            config.unit_micros = raw.trim().parse().map_err(|_| {
                TimeStreamError::Configuration(format!(
                    "{UNIT_MICROS_ENV} must be an integer, got {raw:?}"
                ))
            })?;
        }

        if let Ok(raw) = std::env::var(TRAILING_REST_ENV) {
            config.play_trailing_rest = parse_flag(&raw).ok_or_else(|| {
                TimeStreamError::Configuration(format!(
                    "{TRAILING_REST_ENV} must be true or false, got {raw:?}"
                ))
            })?;
        }

        Ok(config)
    }

    /// Length of one time unit
    pub fn unit(&self) -> Duration {
        Duration::from_micros(self.unit_micros)
    }

    /// Wall-clock duration of `amount` time units; negative amounts are zero
    pub fn duration_of(&self, amount: Time) -> Duration {
        let units = u128::try_from(amount).unwrap_or(0);
        let nanos = self.unit().as_nanos().saturating_mul(units);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            unit_micros: 1_000,
            play_trailing_rest: true,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
