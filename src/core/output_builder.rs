//! Per-call output options and the fluent builder around them

use super::log_context::{FieldValue, LogContext};
use super::log_handler::LogHandler;
use super::log_level::LogLevel;
use std::fmt;
use std::time::Duration;

/// Options for a single [`LogHandler::output`] call
///
/// `screen_override` replaces both the tag (as `"[screen]"`) and the screen
/// for this entry only; the handler's configuration is left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputOptions {
    pub level: LogLevel,
    pub error: Option<String>,
    pub stack_trace: Option<String>,
    pub context: Option<LogContext>,
    pub screen_override: Option<String>,
    pub operation: Option<String>,
    pub duration: Option<Duration>,
}

impl OutputOptions {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Attach a failure, rendered with its `Display` impl
    #[must_use]
    pub fn error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    #[must_use]
    pub fn stack_trace(mut self, trace: impl fmt::Display) -> Self {
        self.stack_trace = Some(trace.to_string());
        self
    }

    #[must_use]
    pub fn context(mut self, context: LogContext) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.context
            .get_or_insert_with(LogContext::new)
            .add_field(key, value);
        self
    }

    #[must_use]
    pub fn screen(mut self, screen: impl Into<String>) -> Self {
        self.screen_override = Some(screen.into());
        self
    }

    #[must_use]
    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Builder for log entries with structured fields
///
/// # Example
///
/// ```
/// use policy_engine_logger::prelude::*;
///
/// let handler = LogHandler::new();
///
/// handler.info_builder()
///     .message("Policies loaded")
///     .field("count", 12)
///     .screen("Settings")
///     .log();
/// ```
pub struct OutputBuilder<'a> {
    handler: &'a LogHandler,
    message: String,
    options: OutputOptions,
}

impl<'a> OutputBuilder<'a> {
    pub fn new(handler: &'a LogHandler, level: LogLevel) -> Self {
        Self {
            handler,
            message: String::new(),
            options: OutputOptions::new(level),
        }
    }

    #[must_use]
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message = msg.into();
        self
    }

    #[must_use]
    pub fn field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.options = self.options.field(key, value);
        self
    }

    /// Merge every field of `context` into the entry
    #[must_use]
    pub fn fields(mut self, context: LogContext) -> Self {
        for (key, value) in context {
            self.options = self.options.field(key, value);
        }
        self
    }

    #[must_use]
    pub fn error(mut self, error: impl fmt::Display) -> Self {
        self.options = self.options.error(error);
        self
    }

    #[must_use]
    pub fn stack_trace(mut self, trace: impl fmt::Display) -> Self {
        self.options = self.options.stack_trace(trace);
        self
    }

    #[must_use]
    pub fn screen(mut self, screen: impl Into<String>) -> Self {
        self.options = self.options.screen(screen);
        self
    }

    #[must_use]
    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.options = self.options.operation(operation);
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.options = self.options.duration(duration);
        self
    }

    /// Consume the builder and emit the entry
    pub fn log(self) {
        self.handler.output(self.message, self.options);
    }
}

impl LogHandler {
    pub fn debug_builder(&self) -> OutputBuilder<'_> {
        OutputBuilder::new(self, LogLevel::Debug)
    }

    pub fn info_builder(&self) -> OutputBuilder<'_> {
        OutputBuilder::new(self, LogLevel::Info)
    }

    pub fn warning_builder(&self) -> OutputBuilder<'_> {
        OutputBuilder::new(self, LogLevel::Warning)
    }

    /// # Example
    ///
    /// ```
    /// use policy_engine_logger::LogHandler;
    ///
    /// let handler = LogHandler::new();
    /// handler.error_builder()
    ///     .message("Policy sync failed")
    ///     .error("connection reset")
    ///     .field("retry_count", 3)
    ///     .log();
    /// ```
    pub fn error_builder(&self) -> OutputBuilder<'_> {
        OutputBuilder::new(self, LogLevel::Error)
    }
}
