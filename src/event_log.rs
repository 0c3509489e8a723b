// src/event_log.rs
//
// Plain-text event log: one line per event, flushed once after the
// whole stream is processed. The format is consumed by other tooling;
// the parser here is its exact inverse.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{QuadtrackError, QuadtrackResult};
use crate::types::QuadrantEvent;

pub fn format_line(event: &QuadrantEvent) -> String {
    format!(
        "{:.2}, {}, {}, {}",
        event.timestamp, event.quadrant, event.color, event.kind
    )
}

/// Parse one log line back into an event. Inverse of [`format_line`].
pub fn parse_line(line: &str) -> QuadtrackResult<QuadrantEvent> {
    let mut parts = line.trim_end().splitn(4, ", ");
    let mut next = |field: &str| {
        parts
            .next()
            .ok_or_else(|| QuadtrackError::data(format!("log line missing {field}: '{line}'")))
    };

    let timestamp = next("timestamp")?
        .parse::<f64>()
        .map_err(|e| QuadtrackError::data(format!("bad timestamp in '{line}': {e}")))?;
    let quadrant = next("quadrant")?
        .parse::<u32>()
        .map_err(|e| QuadtrackError::data(format!("bad quadrant in '{line}': {e}")))?;
    let color = next("color")?.to_string();
    let kind = next("kind")?.parse()?;

    Ok(QuadrantEvent {
        timestamp,
        quadrant,
        color,
        kind,
    })
}

/// Log file handle, opened before processing starts so a bad output
/// path fails the run up front instead of after the last frame.
pub struct EventLogWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl EventLogWriter {
    /// Create the log file, and its parent directory if absent.
    pub fn create(path: &Path) -> QuadtrackResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            path: path.to_path_buf(),
        })
    }

    /// Write the accumulated log in append order and close the file.
    /// Called exactly once, after the stream ends.
    pub fn write_all(mut self, events: &[QuadrantEvent]) -> QuadtrackResult<()> {
        for event in events {
            writeln!(self.writer, "{}", format_line(event))?;
        }
        self.writer.flush()?;

        info!("wrote {} event(s) to {}", events.len(), self.path.display());
        Ok(())
    }
}
