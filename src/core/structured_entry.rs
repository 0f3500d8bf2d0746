//! Structured payload emitted on the `<tag>_structured` channel

use super::log_context::LogContext;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use serde::Serialize;

/// Host details attached when `include_system_info` is enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub family: &'static str,
    pub pid: u32,
}

impl SystemInfo {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            family: std::env::consts::FAMILY,
            pid: std::process::id(),
        }
    }
}

/// Key-unique structured view of a [`LogEntry`]
///
/// Message, level and timestamp are always present; every other key is only
/// serialized when the entry carries it.
#[derive(Debug, Clone, Serialize)]
pub struct StructuredLogEntry {
    pub message: String,
    pub level: LogLevel,
    /// RFC 3339 with milliseconds
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<LogContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemInfo>,
}

impl StructuredLogEntry {
    /// Build from an entry, dropping empty strings and empty context
    pub fn from_entry(entry: &LogEntry) -> Self {
        fn non_empty(value: Option<&str>) -> Option<String> {
            value.filter(|s| !s.is_empty()).map(str::to_string)
        }

        Self {
            message: entry.message().to_string(),
            level: entry.level(),
            timestamp: entry
                .timestamp()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            tag: non_empty(entry.tag()),
            screen: non_empty(entry.screen()),
            operation: non_empty(entry.operation()),
            duration_ms: entry
                .duration()
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            error: non_empty(entry.error()),
            context: entry.context().filter(|c| !c.is_empty()).cloned(),
            system: None,
        }
    }

    #[must_use]
    pub fn with_system_info(mut self, info: SystemInfo) -> Self {
        self.system = Some(info);
        self
    }

    /// Number of populated keys beyond message, level and timestamp
    ///
    /// System info is host metadata and is not counted.
    pub fn extra_field_count(&self) -> usize {
        [
            self.tag.is_some(),
            self.screen.is_some(),
            self.operation.is_some(),
            self.duration_ms.is_some(),
            self.error.is_some(),
            self.context.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Whether the payload carries anything worth a second record
    pub fn has_extra_data(&self) -> bool {
        self.extra_field_count() > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_bare_entry_has_no_extra_data() {
        let entry = LogEntry::new(LogLevel::Info, "plain");
        let structured = StructuredLogEntry::from_entry(&entry);
        assert_eq!(structured.extra_field_count(), 0);
        assert!(!structured.has_extra_data());
    }

    #[test]
    fn test_each_optional_field_counts() {
        let entry = LogEntry::new(LogLevel::Error, "failed")
            .with_tag("[Home]")
            .with_screen("Home")
            .with_operation("sync")
            .with_duration(Duration::from_millis(5))
            .with_error("timeout")
            .with_context(LogContext::new().with_field("retry", 2));

        assert_eq!(StructuredLogEntry::from_entry(&entry).extra_field_count(), 6);
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let entry = LogEntry::new(LogLevel::Debug, "x")
            .with_screen("")
            .with_context(LogContext::new());
        let structured = StructuredLogEntry::from_entry(&entry);
        assert!(structured.screen.is_none());
        assert!(structured.context.is_none());

        let json = structured.to_json().unwrap();
        assert!(!json.contains("screen"));
        assert!(!json.contains("context"));
    }

    #[test]
    fn test_system_info_is_not_counted() {
        let entry = LogEntry::new(LogLevel::Info, "boot");
        let structured =
            StructuredLogEntry::from_entry(&entry).with_system_info(SystemInfo::current());
        assert!(!structured.has_extra_data());

        let parsed: serde_json::Value = serde_json::from_str(&structured.to_json().unwrap()).unwrap();
        assert_eq!(parsed["system"]["os"], std::env::consts::OS);
    }

    #[test]
    fn test_json_shape() {
        let entry = LogEntry::new(LogLevel::Warning, "slow")
            .with_operation("load")
            .with_duration(Duration::from_millis(1500));
        let parsed: serde_json::Value =
            serde_json::from_str(&StructuredLogEntry::from_entry(&entry).to_json().unwrap())
                .unwrap();

        assert_eq!(parsed["message"], "slow");
        assert_eq!(parsed["level"], "warning");
        assert_eq!(parsed["operation"], "load");
        assert_eq!(parsed["duration_ms"], 1500);
        assert!(parsed["timestamp"].is_string());
    }
}
