//! JSON Lines appender for machine-readable channel output

use crate::core::{Appender, ChannelRecord, LogLevel, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one JSON object per channel record
///
/// Primary records carry their text in `message`. Structured side records
/// carry the decoded payload object in `payload` instead, so downstream
/// tooling never has to parse a JSON string inside JSON.
pub struct JsonAppender {
    writer: BufWriter<File>,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    channel: &'a str,
    level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack_trace: Option<&'a str>,
}

impl<'a> JsonLine<'a> {
    fn from_record(record: &'a ChannelRecord) -> Self {
        let payload = record
            .is_structured()
            .then(|| serde_json::from_str::<Value>(&record.message).ok())
            .flatten();

        Self {
            channel: &record.channel,
            level: record.level,
            time: record.time,
            message: payload.is_none().then_some(record.message.as_str()),
            payload,
            error: record.error.as_deref(),
            stack_trace: record.stack_trace.as_deref(),
        }
    }
}

impl JsonAppender {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Appender for JsonAppender {
    fn name(&self) -> &str {
        "json"
    }

    fn append(&mut self, record: &ChannelRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &JsonLine::from_record(record))?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn read_lines(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_primary_records_keep_message() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("channel.jsonl");
        let mut appender = JsonAppender::new(&log_path)?;

        for i in 0..3 {
            let record = ChannelRecord::new("PolicyEngine", LogLevel::Debug, format!("Iteration {}", i));
            appender.append(&record)?;
        }
        appender.flush()?;

        let lines = read_lines(&log_path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2]["channel"], "PolicyEngine");
        assert_eq!(lines[2]["level"], "debug");
        assert_eq!(lines[2]["message"], "Iteration 2");
        assert!(lines[2].get("payload").is_none());
        Ok(())
    }

    #[test]
    fn test_structured_records_inline_payload() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("channel.jsonl");
        let mut appender = JsonAppender::new(&log_path)?;

        let record = ChannelRecord::new(
            "[Home]_structured",
            LogLevel::Info,
            r#"{"message":"loaded","operation":"load_policies"}"#,
        );
        appender.append(&record)?;
        appender.flush()?;

        let lines = read_lines(&log_path);
        assert_eq!(lines[0]["payload"]["operation"], "load_policies");
        assert!(lines[0].get("message").is_none());
        Ok(())
    }

    #[test]
    fn test_unparseable_structured_message_falls_back_to_text() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("channel.jsonl");
        let mut appender = JsonAppender::new(&log_path)?;

        appender.append(&ChannelRecord::new("x_structured", LogLevel::Warning, "not json"))?;
        appender.flush()?;

        assert_eq!(read_lines(&log_path)[0]["message"], "not json");
        Ok(())
    }
}
