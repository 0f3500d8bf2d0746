//! Timestamp rendering for text appenders

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How an appender renders a record's time
///
/// ```
/// use policy_engine_logger::TimestampFormat;
/// use chrono::Utc;
///
/// let rendered = TimestampFormat::Iso8601.format(&Utc::now());
/// assert!(rendered.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,
    /// `10:30:45.123`, the console default
    TimeOnly,
    /// Milliseconds since the Unix epoch
    UnixMillis,
    /// Any strftime pattern
    Custom(String),
}

impl TimestampFormat {
    fn pattern(&self) -> Option<&str> {
        match self {
            Self::Iso8601 => Some("%Y-%m-%dT%H:%M:%S%.3fZ"),
            Self::TimeOnly => Some("%H:%M:%S%.3f"),
            Self::Custom(pattern) => Some(pattern),
            Self::UnixMillis => None,
        }
    }

    #[must_use]
    pub fn format(&self, time: &DateTime<Utc>) -> String {
        match self.pattern() {
            Some(pattern) => time.format(pattern).to_string(),
            None => time.timestamp_millis().to_string(),
        }
    }

    /// Render a record time that may have been left out by configuration
    #[must_use]
    pub fn format_or(&self, time: Option<&DateTime<Utc>>, placeholder: &str) -> String {
        time.map_or_else(|| placeholder.to_string(), |t| self.format(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn policy_sync_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap() + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn test_builtin_formats() {
        let time = policy_sync_time();
        assert_eq!(TimestampFormat::Iso8601.format(&time), "2025-01-08T10:30:45.123Z");
        assert_eq!(TimestampFormat::TimeOnly.format(&time), "10:30:45.123");
        assert_eq!(TimestampFormat::UnixMillis.format(&time), "1736332245123");
    }

    #[test]
    fn test_custom_pattern() {
        let format = TimestampFormat::Custom("%d/%m %H:%M".to_string());
        assert_eq!(format.format(&policy_sync_time()), "08/01 10:30");
    }

    #[test]
    fn test_missing_time_uses_placeholder() {
        assert_eq!(TimestampFormat::TimeOnly.format_or(None, "-"), "-");
        assert_eq!(
            TimestampFormat::TimeOnly.format_or(Some(&policy_sync_time()), "-"),
            "10:30:45.123"
        );
    }
}
