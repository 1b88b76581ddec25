// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pattern files
//!
//! A pattern is a set of named tracks written in the source-entry literal
//! format. Loading a pattern merges its tracks into one playable stream.
//!
//! ```json
//! {
//!   "tracks": {
//!     "kick":  [["kick", 0], ["kick", 500], ["kick", 500]],
//!     "snare": [{"rest": 500}, ["snare", 0], ["snare", 500]]
//!   },
//!   "join": false
//! }
//! ```
//!
//! Tracks are merged in name order, so on simultaneous events the track
//! whose name sorts first plays first.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::errors::TimeStreamResult;
use crate::frp::{combinators, Cumulative, SourceEntry, TimeStream};

/// Named tracks of source entries
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pattern {
    pub tracks: BTreeMap<String, Vec<SourceEntry<String>>>,

    /// Collapse events on the same instant into one event
    #[serde(default)]
    pub join: bool,
}

impl Pattern {
    pub fn from_json(json: &str) -> TimeStreamResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a pattern file
    pub fn load(path: impl AsRef<Path>) -> TimeStreamResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded pattern file");
        Self::from_json(&json)
    }

    /// Restartable stream for one track, `None` when no track has that name
    pub fn track(&self, name: &str) -> TimeStreamResult<Option<TimeStream<String>>> {
        self.tracks
            .get(name)
            .map(|entries| TimeStream::from_entries(entries.iter().cloned()))
            .transpose()
    }

    /// Merge every track into one cumulative timeline
    pub fn timeline(&self) -> TimeStreamResult<Cumulative<String>> {
        let tracks = self
            .tracks
            .values()
            .map(|entries| TimeStream::from_entries(entries.iter().cloned())?.to_cumulative())
            .collect::<TimeStreamResult<Vec<_>>>()?;
        Ok(combinators::merge_all(tracks))
    }

    /// Merge every track into one playable stream
    ///
    /// With `join` set, simultaneous payloads arrive together; otherwise each
    /// group holds a single payload.
    pub fn into_stream(self) -> TimeStreamResult<TimeStream<Vec<String>>> {
        let timeline = self.timeline()?;
        let stream = if self.join {
            combinators::join(timeline).into_stream()
        } else {
            timeline.map(|payload| vec![payload]).into_stream()
        };
        Ok(stream)
    }
}
