//! File appender implementation

use crate::core::{Appender, ChannelRecord, LoggerError, Result, TimestampFormat};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Appends one line per record to a file
///
/// Errors and stack traces are kept on the same line (escaped) so that a
/// record never spans more than one line.
pub struct FileAppender {
    writer: BufWriter<File>,
    timestamp_format: TimestampFormat,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::open(&path, e))?;

        Ok(Self {
            writer: BufWriter::new(file),
            timestamp_format: TimestampFormat::default(),
        })
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

fn escape_newlines(s: &str) -> String {
    s.replace('\n', "\\n").replace('\r', "\\r")
}

impl Appender for FileAppender {
    fn append(&mut self, record: &ChannelRecord) -> Result<()> {
        let timestamp_str = self.timestamp_format.format_or(record.time.as_ref(), "-");

        let mut output = format!(
            "[{}] [{:7}] [{}] {}",
            timestamp_str,
            record.level.to_str(),
            record.channel,
            record.message
        );

        if let Some(ref error) = record.error {
            output.push_str(" | error=");
            output.push_str(&escape_newlines(error));
        }
        if let Some(ref trace) = record.stack_trace {
            output.push_str(" | stack=");
            output.push_str(&escape_newlines(trace));
        }

        output.push('\n');

        self.writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
