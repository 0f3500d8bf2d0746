//! Log entry structure

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// A single diagnostic event
///
/// Entries are assembled with the consuming `with_*` methods and are
/// read-only afterwards. The timestamp is fixed at construction unless
/// one is supplied explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    level: LogLevel,
    message: String,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    screen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack_trace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<LogContext>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(&message.into()),
            timestamp: Utc::now(),
            tag: None,
            screen: None,
            operation: None,
            duration: None,
            error: None,
            stack_trace: None,
            context: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_screen(mut self, screen: impl Into<String>) -> Self {
        self.screen = Some(screen.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn screen(&self) -> Option<&str> {
        self.screen.as_deref()
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }

    pub fn context(&self) -> Option<&LogContext> {
        self.context.as_ref()
    }

    /// Text shown on the primary developer channel record
    pub fn display_message(&self) -> String {
        match (&self.operation, self.duration) {
            (Some(op), Some(d)) => format!(
                "[{}] {} ({}: {}ms)",
                self.level,
                self.message,
                op,
                d.as_millis()
            ),
            _ => format!("[{}] {}", self.level, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_sanitized() {
        let entry = LogEntry::new(LogLevel::Info, "line one\nFAKE ERROR\tx");
        assert_eq!(entry.message(), "line one\\nFAKE ERROR\\tx");
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let entry = LogEntry::new(LogLevel::Debug, "plain");
        assert!(entry.tag().is_none());
        assert!(entry.screen().is_none());
        assert!(entry.operation().is_none());
        assert!(entry.duration().is_none());
        assert!(entry.error().is_none());
        assert!(entry.stack_trace().is_none());
        assert!(entry.context().is_none());
    }

    #[test]
    fn test_explicit_timestamp_is_kept() {
        let ts = DateTime::parse_from_rfc3339("2025-01-08T10:30:45Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = LogEntry::new(LogLevel::Info, "at").with_timestamp(ts);
        assert_eq!(entry.timestamp(), ts);
    }

    #[test]
    fn test_display_message_with_timing() {
        let entry = LogEntry::new(LogLevel::Info, "done")
            .with_operation("load_policies")
            .with_duration(Duration::from_millis(42));
        assert_eq!(entry.display_message(), "[INFO] done (load_policies: 42ms)");
    }
}
