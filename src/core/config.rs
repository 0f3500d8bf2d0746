//! Logger configuration
//!
//! [`LoggerConfig`] is the live state a [`LogHandler`](super::LogHandler)
//! consults on every call. [`LoggerOptions`] is what callers pass to
//! `configure`: every option is optional and anything left out falls back
//! to the hard-coded default rather than the previous value.

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// Tag used when no screen or custom tag is active
pub const DEFAULT_TAG: &str = "PolicyEngine";

/// Bracketed tag derived from a screen name, or the default tag for an empty one
pub fn screen_tag(screen: &str) -> String {
    if screen.is_empty() {
        DEFAULT_TAG.to_string()
    } else {
        format!("[{}]", screen)
    }
}

/// Active logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub tag: String,
    /// Empty when no screen is active
    pub current_screen: String,
    /// Gates all output
    pub debug_mode_enabled: bool,
    pub min_level: LogLevel,
    pub include_timestamp: bool,
    pub include_stack_trace: bool,
    pub include_system_info: bool,
    pub use_structured_logging: bool,
    pub use_developer_channel: bool,
}

impl LoggerConfig {
    /// Whether debug output is on by default for this build
    pub fn default_debug_mode() -> bool {
        cfg!(debug_assertions)
    }

    /// Whether an entry at `level` passes the current gates
    pub fn accepts(&self, level: LogLevel) -> bool {
        self.debug_mode_enabled && level >= self.min_level
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            current_screen: String::new(),
            debug_mode_enabled: Self::default_debug_mode(),
            min_level: LogLevel::Debug,
            include_timestamp: true,
            include_stack_trace: true,
            include_system_info: false,
            use_structured_logging: true,
            use_developer_channel: true,
        }
    }
}

/// Options accepted by `LogHandler::configure`
///
/// # Example
///
/// ```
/// use policy_engine_logger::core::{LoggerOptions, LogLevel};
///
/// let options = LoggerOptions::new()
///     .screen("Settings")
///     .min_log_level(LogLevel::Info);
///
/// let config = options.into_config();
/// assert_eq!(config.tag, "[Settings]");
/// assert!(config.include_timestamp);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerOptions {
    pub tag: Option<String>,
    pub screen: Option<String>,
    pub is_debug_mode: Option<bool>,
    pub include_timestamp: Option<bool>,
    pub include_stack_trace: Option<bool>,
    pub include_system_info: Option<bool>,
    pub use_structured_logging: Option<bool>,
    pub use_developer_channel: Option<bool>,
    pub min_log_level: Option<LogLevel>,
}

impl LoggerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn screen(mut self, screen: impl Into<String>) -> Self {
        self.screen = Some(screen.into());
        self
    }

    #[must_use]
    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.is_debug_mode = Some(enabled);
        self
    }

    #[must_use]
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.include_timestamp = Some(enabled);
        self
    }

    #[must_use]
    pub fn include_stack_trace(mut self, enabled: bool) -> Self {
        self.include_stack_trace = Some(enabled);
        self
    }

    #[must_use]
    pub fn include_system_info(mut self, enabled: bool) -> Self {
        self.include_system_info = Some(enabled);
        self
    }

    #[must_use]
    pub fn structured_logging(mut self, enabled: bool) -> Self {
        self.use_structured_logging = Some(enabled);
        self
    }

    #[must_use]
    pub fn developer_channel(mut self, enabled: bool) -> Self {
        self.use_developer_channel = Some(enabled);
        self
    }

    #[must_use]
    pub fn min_log_level(mut self, level: LogLevel) -> Self {
        self.min_log_level = Some(level);
        self
    }

    /// Resolve into a full configuration, defaulting every omitted option
    pub fn into_config(self) -> LoggerConfig {
        let defaults = LoggerConfig::default();
        let current_screen = self.screen.unwrap_or_default();
        let tag = match self.tag {
            Some(tag) => tag,
            None => screen_tag(&current_screen),
        };

        LoggerConfig {
            tag,
            current_screen,
            debug_mode_enabled: self.is_debug_mode.unwrap_or(defaults.debug_mode_enabled),
            min_level: self.min_log_level.unwrap_or(defaults.min_level),
            include_timestamp: self.include_timestamp.unwrap_or(defaults.include_timestamp),
            include_stack_trace: self
                .include_stack_trace
                .unwrap_or(defaults.include_stack_trace),
            include_system_info: self
                .include_system_info
                .unwrap_or(defaults.include_system_info),
            use_structured_logging: self
                .use_structured_logging
                .unwrap_or(defaults.use_structured_logging),
            use_developer_channel: self
                .use_developer_channel
                .unwrap_or(defaults.use_developer_channel),
        }
    }
}
