//! Console appender implementation
//!
//! Stands in for a platform developer log: each record is printed as
//! `[time] [LEVEL  ] channel - message`, followed by the error and stack
//! trace on their own indented lines when present.

use crate::core::{Appender, ChannelRecord, LogLevel, Result, TimestampFormat};
#[cfg(feature = "console")]
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    timestamp_format: TimestampFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
            timestamp_format: TimestampFormat::TimeOnly,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors: use_colors && cfg!(feature = "console"),
            timestamp_format: TimestampFormat::TimeOnly,
        }
    }

    /// Set the timestamp format for this appender
    ///
    /// # Examples
    ///
    /// ```
    /// use policy_engine_logger::appenders::ConsoleAppender;
    /// use policy_engine_logger::TimestampFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_timestamp_format(TimestampFormat::Iso8601);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn level_label(&self, level: LogLevel) -> String {
        let label = format!("{:7}", level.to_str());
        #[cfg(feature = "console")]
        {
            if self.use_colors {
                return label.color(level.color_code()).to_string();
            }
        }
        label
    }

    pub(crate) fn format_record(&self, record: &ChannelRecord) -> String {
        let mut output = match record.time {
            Some(ref time) => format!(
                "[{}] [{}] {} - {}",
                self.timestamp_format.format(time),
                self.level_label(record.level),
                record.channel,
                record.message
            ),
            None => format!(
                "[{}] {} - {}",
                self.level_label(record.level),
                record.channel,
                record.message
            ),
        };

        if let Some(ref error) = record.error {
            output.push_str("\n    error: ");
            output.push_str(error);
        }
        if let Some(ref trace) = record.stack_trace {
            for line in trace.lines() {
                output.push_str("\n    ");
                output.push_str(line);
            }
        }

        output
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &ChannelRecord) -> Result<()> {
        let output = self.format_record(record);

        // Route Error level to stderr, others to stdout
        match record.level {
            LogLevel::Error => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
