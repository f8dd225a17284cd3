//! Output sinks for log records.
//!
//! Every record is written as one JSON object per line. A write failure is
//! fatal for the run; lines already written stay written.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{ChatError, Result};
use crate::message::LogRecord;

/// Destination for processed log records.
pub trait RecordSink {
    /// Write one record.
    ///
    /// # Errors
    /// Returns [`ChatError::SinkWrite`] if the record could not be written.
    fn emit(&mut self, record: &LogRecord) -> Result<()>;

    /// Push any buffered output to its destination.
    ///
    /// # Errors
    /// Returns [`ChatError::SinkWrite`] if flushing fails.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Newline-delimited JSON writer over any [`Write`].
///
/// Flushes after every record so output is incremental.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Records written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<io::Stdout> {
    /// Sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Create (truncating) a log file, creating parent directories first.
    ///
    /// # Errors
    /// Returns [`ChatError::SinkWrite`] if the directory or file cannot be
    /// created.
    pub fn create_file(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(ChatError::SinkWrite)?;
        }
        let file = File::create(path).map_err(ChatError::SinkWrite)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)
            .map_err(|e| ChatError::SinkWrite(io::Error::other(e)))?;
        self.writer.write_all(b"\n").map_err(ChatError::SinkWrite)?;
        self.writer.flush().map_err(ChatError::SinkWrite)?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(ChatError::SinkWrite)
    }
}
