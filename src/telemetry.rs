//! Recording gameplay transitions for an external learner
use crate::engine::{observe, reward, Grid, Transition, OBSERVATION_LEN};
use crate::util::error_chain;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// One line of the telemetry file
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct TransitionRecord {
    /// The value of the tick counter before the transition
    pub(crate) tick: u64,
    pub(crate) state: [f64; OBSERVATION_LEN],
    pub(crate) action: u8,
    pub(crate) reward: f64,
    pub(crate) next_state: [f64; OBSERVATION_LEN],
    pub(crate) score: u32,
    pub(crate) done: bool,
}

impl TransitionRecord {
    pub(crate) fn new(transition: &Transition, grid: Grid) -> TransitionRecord {
        TransitionRecord {
            tick: transition.previous.ticks,
            state: observe(&transition.previous, grid),
            action: transition.action.index(),
            reward: reward(transition, grid),
            next_state: observe(&transition.state, grid),
            score: transition.state.score,
            done: transition.terminal,
        }
    }
}

/// Buffers [`TransitionRecord`]s and writes them out as JSON lines in
/// batches.  Anything still buffered is written when the writer is dropped.
#[derive(Debug)]
pub(crate) struct TelemetryWriter<W: Write = fs_err::File> {
    writer: W,
    grid: Grid,
    batch_size: usize,
    pending: Vec<TransitionRecord>,
}

impl TelemetryWriter<fs_err::File> {
    /// Open `path` for appending, creating it if necessary
    pub(crate) fn create(path: &Path, grid: Grid, batch_size: usize) -> Result<Self, TelemetryError> {
        let fp = fs_err::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(TelemetryError::Open)?;
        log::info!("Recording transitions to {}", path.display());
        Ok(TelemetryWriter::new(fp, grid, batch_size))
    }
}

impl<W: Write> TelemetryWriter<W> {
    pub(crate) fn new(writer: W, grid: Grid, batch_size: usize) -> TelemetryWriter<W> {
        TelemetryWriter {
            writer,
            grid,
            batch_size: batch_size.max(1),
            pending: Vec::with_capacity(batch_size.max(1)),
        }
    }

    /// Add a transition to the batch, writing the batch out once it is full
    /// or the game has ended
    pub(crate) fn record(&mut self, transition: &Transition) -> Result<(), TelemetryError> {
        self.pending.push(TransitionRecord::new(transition, self.grid));
        if self.pending.len() >= self.batch_size || transition.terminal {
            self.flush()?;
        }
        Ok(())
    }

    /// Write out everything buffered so far
    pub(crate) fn flush(&mut self) -> Result<(), TelemetryError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut buf = Vec::new();
        for rec in self.pending.drain(..) {
            serde_json::to_writer(&mut buf, &rec).map_err(TelemetryError::Serialize)?;
            buf.push(b'\n');
        }
        self.writer
            .write_all(&buf)
            .and_then(|()| self.writer.flush())
            .map_err(TelemetryError::Write)?;
        log::debug!("Flushed telemetry batch of {} bytes", buf.len());
        Ok(())
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl<W: Write> Drop for TelemetryWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            log::error!("{}", error_chain(&e));
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum TelemetryError {
    #[error("failed to open telemetry file")]
    Open(#[source] io::Error),
    #[error("failed to serialize transition")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write telemetry")]
    Write(#[source] io::Error),
}
