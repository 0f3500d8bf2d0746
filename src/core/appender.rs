//! Appender trait for developer channel output

use super::{error::Result, log_level::LogLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One emission on a developer log channel
///
/// A single `output` call produces a primary record on the tag channel and,
/// when structured logging applies, a second record on `<tag>_structured`
/// whose message is the JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Channel name (the entry tag)
    pub channel: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl ChannelRecord {
    pub fn new(channel: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            level,
            message: message.into(),
            time: None,
            error: None,
            stack_trace: None,
        }
    }

    /// Whether this is the structured side record
    pub fn is_structured(&self) -> bool {
        self.channel.ends_with(STRUCTURED_SUFFIX)
    }
}

/// Suffix appended to the tag for structured side records
pub const STRUCTURED_SUFFIX: &str = "_structured";

pub trait Appender: Send + Sync {
    fn append(&mut self, record: &ChannelRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
