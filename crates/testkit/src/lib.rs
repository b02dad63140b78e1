#![warn(missing_docs)]
//! Deterministic testing surfaces: JSONL event logs, golden snapshots and a
//! scripted tick harness.

mod snapshot;
mod tick_script;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tutorial_core::SimTick;

pub use snapshot::*;
pub use tick_script::*;

/// One line of an event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Event kind label (e.g. `SessionClosed`).
    pub kind: String,
    /// Event payload as JSON text.
    pub payload: String,
}

impl EventRecord {
    /// Build a record whose payload is `payload` serialized to JSON.
    pub fn new<T: Serialize>(tick: SimTick, kind: impl Into<String>, payload: &T) -> Result<Self> {
        Ok(Self {
            tick,
            kind: kind.into(),
            payload: serde_json::to_string(payload).context("Failed to serialize event payload")?,
        })
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    out: BufWriter<File>,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        Ok(Self {
            out: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord) -> Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        if let Err(err) = self.out.flush() {
            tracing::warn!(%err, "failed to flush event log");
        }
    }
}

/// Read back every record from a JSONL event log.
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<EventRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event log {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Bad event on line {} of {}", index + 1, path.display()))
        })
        .collect()
}
