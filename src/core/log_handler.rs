//! Main log handler implementation

use super::{
    appender::{Appender, ChannelRecord, STRUCTURED_SUFFIX},
    config::{screen_tag, LoggerConfig, LoggerOptions},
    error::Result,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output_builder::OutputOptions,
    structured_entry::{StructuredLogEntry, SystemInfo},
};
use crate::appenders::ConsoleAppender;
use parking_lot::RwLock;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<LogHandler> = OnceLock::new();

/// Diagnostic logger with level filtering, screen tagging and timing helpers
///
/// A `LogHandler` is a cheap handle: clones share configuration, appenders
/// and metrics, so every holder observes the latest `configure` call. Pass
/// one around explicitly, or use [`LogHandler::global`] for a process-wide
/// instance.
///
/// Logging calls never fail or panic from the caller's point of view.
#[derive(Clone)]
pub struct LogHandler {
    config: Arc<RwLock<LoggerConfig>>,
    appenders: Arc<RwLock<Vec<Box<dyn Appender>>>>,
    /// Metrics for observability (dropped count, total logged, etc.)
    metrics: Arc<LoggerMetrics>,
}

impl LogHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoggerConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            appenders: Arc::new(RwLock::new(Vec::new())),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// Process-wide handler writing to the console
    ///
    /// Built on first use. Tests and embedders that need isolation should
    /// construct their own handler instead.
    pub fn global() -> &'static LogHandler {
        GLOBAL.get_or_init(|| {
            LogHandler::builder()
                .appender(ConsoleAppender::new())
                .build()
        })
    }

    /// Write one record to every appender with per-appender panic isolation
    ///
    /// One failing appender never prevents the others from receiving the
    /// record. Returns `true` if any appender failed.
    fn process_record(appenders: &mut [Box<dyn Appender>], record: &ChannelRecord) -> bool {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(record)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx, panic_msg
                    );
                    has_error = true;
                }
            }
        }

        has_error
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    /// Replace the whole configuration from `options`
    ///
    /// Options left out revert to their defaults, not to their current value.
    pub fn configure(&self, options: LoggerOptions) {
        let config = options.into_config();
        *self.config.write() = config;
    }

    /// Restore the default configuration
    pub fn reset(&self) {
        *self.config.write() = LoggerConfig::default();
    }

    /// Snapshot of the active configuration
    pub fn config(&self) -> LoggerConfig {
        self.config.read().clone()
    }

    /// Switch the current screen and derive the tag from it
    ///
    /// An empty name restores the default tag. Any custom tag is replaced.
    pub fn set_screen(&self, name: impl Into<String>) {
        let name = name.into();
        let mut config = self.config.write();
        config.tag = screen_tag(&name);
        config.current_screen = name;
    }

    /// Switch the current screen and use `custom_tag` verbatim
    pub fn set_screen_tag(&self, name: impl Into<String>, custom_tag: impl Into<String>) {
        let mut config = self.config.write();
        config.current_screen = name.into();
        config.tag = custom_tag.into();
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.config.write().min_level = level;
    }

    pub fn set_debug_mode(&self, enabled: bool) {
        self.config.write().debug_mode_enabled = enabled;
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.config.read().accepts(level)
    }

    /// Emit `message` with the given options
    ///
    /// Does nothing when debug mode is off or the level is below the floor.
    /// Otherwise the entry goes to the developer channel (if enabled) and,
    /// when structured logging is on and the entry carries extra data, a
    /// second JSON record goes to `<tag>_structured`.
    pub fn output(&self, message: impl Into<String>, options: OutputOptions) {
        let config = self.config();
        if !config.accepts(options.level) {
            self.metrics.record_filtered();
            return;
        }

        let entry = Self::build_entry(&config, message.into(), options);
        if config.use_developer_channel {
            self.dispatch(&config, &entry);
        }
    }

    fn build_entry(config: &LoggerConfig, message: String, options: OutputOptions) -> LogEntry {
        let (tag, screen) = match options.screen_override {
            Some(screen) if !screen.is_empty() => (screen_tag(&screen), screen),
            _ => (config.tag.clone(), config.current_screen.clone()),
        };

        let mut entry = LogEntry::new(options.level, message).with_tag(tag);
        if !screen.is_empty() {
            entry = entry.with_screen(screen);
        }
        if let Some(operation) = options.operation {
            entry = entry.with_operation(operation);
        }
        if let Some(duration) = options.duration {
            entry = entry.with_duration(duration);
        }
        if let Some(context) = options.context {
            entry = entry.with_context(context);
        }

        let capture_trace = config.include_stack_trace
            && options.level == LogLevel::Error
            && options.error.is_some()
            && options.stack_trace.is_none();

        if let Some(error) = options.error {
            entry = entry.with_error(error);
        }
        if let Some(trace) = options.stack_trace {
            entry = entry.with_stack_trace(trace);
        } else if capture_trace {
            let trace = Backtrace::capture();
            if trace.status() == BacktraceStatus::Captured {
                entry = entry.with_stack_trace(trace.to_string());
            }
        }

        entry
    }

    fn dispatch(&self, config: &LoggerConfig, entry: &LogEntry) {
        let channel = entry.tag().unwrap_or_default().to_string();
        let time = config.include_timestamp.then(|| entry.timestamp());

        let mut primary = ChannelRecord::new(channel.clone(), entry.level(), entry.display_message());
        primary.time = time;
        primary.error = entry.error().map(str::to_string);
        if config.include_stack_trace {
            primary.stack_trace = entry.stack_trace().map(str::to_string);
        }

        let mut records = vec![primary];

        if config.use_structured_logging {
            let mut structured = StructuredLogEntry::from_entry(entry);
            if config.include_system_info {
                structured = structured.with_system_info(SystemInfo::current());
            }

            if structured.has_extra_data() {
                match structured.to_json() {
                    Ok(json) => {
                        let mut record = ChannelRecord::new(
                            format!("{}{}", channel, STRUCTURED_SUFFIX),
                            entry.level(),
                            json,
                        );
                        record.time = time;
                        records.push(record);
                        self.metrics.record_structured();
                    }
                    Err(e) => {
                        eprintln!("[LOGGER ERROR] Failed to serialize structured entry: {}", e);
                    }
                }
            }
        }

        let mut appenders = self.appenders.write();
        let mut has_error = false;
        for record in &records {
            has_error |= Self::process_record(&mut appenders, record);
        }

        if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.output(message, OutputOptions::new(LogLevel::Debug));
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.output(message, OutputOptions::new(LogLevel::Info));
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.output(message, OutputOptions::new(LogLevel::Warning));
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.output(message, OutputOptions::new(LogLevel::Error));
    }

    /// Log a message at debug level
    #[deprecated(since = "0.1.0", note = "Use debug() instead")]
    pub fn show(&self, message: impl Into<String>) {
        self.debug(message);
    }

    /// Get the number of entries lost to failing appenders
    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }
}

impl Default for LogHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandler")
            .field("config", &*self.config.read())
            .field("appenders", &self.appender_count())
            .finish()
    }
}

/// Builder for constructing a LogHandler with a fluent API
///
/// # Example
/// ```
/// use policy_engine_logger::prelude::*;
///
/// let handler = LogHandler::builder()
///     .options(LoggerOptions::new().debug_mode(true).min_log_level(LogLevel::Info))
///     .appender(ConsoleAppender::new())
///     .build();
/// ```
pub struct LogHandlerBuilder {
    config: LoggerConfig,
    appenders: Vec<Box<dyn Appender>>,
}

impl LogHandlerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            appenders: Vec::new(),
        }
    }

    /// Start from `options`, with the same defaulting as `configure`
    #[must_use = "builder methods return a new value"]
    pub fn options(mut self, options: LoggerOptions) -> Self {
        self.config = options.into_config();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.config.debug_mode_enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    pub fn build(self) -> LogHandler {
        let handler = LogHandler::with_config(self.config);
        for appender in self.appenders {
            handler.add_appender(appender);
        }
        handler
    }
}

impl Default for LogHandlerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogHandler {
    #[must_use]
    pub fn builder() -> LogHandlerBuilder {
        LogHandlerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::{LogContext, LoggerError};
    use std::time::Duration;

    fn capturing_handler() -> (LogHandler, MemoryAppender) {
        let memory = MemoryAppender::new();
        let handler = LogHandler::builder()
            .debug_mode(true)
            .appender(memory.clone())
            .build();
        (handler, memory)
    }

    #[test]
    fn test_level_floor_filters() {
        let (handler, memory) = capturing_handler();
        handler.configure(LoggerOptions::new().debug_mode(true).min_log_level(LogLevel::Warning));

        handler.debug("hidden");
        handler.info("hidden");
        assert!(memory.is_empty());
        assert_eq!(handler.metrics().filtered_count(), 2);

        handler.error("shown");
        assert_eq!(memory.primary_records().len(), 1);
    }

    #[test]
    fn test_debug_mode_off_gates_everything() {
        let (handler, memory) = capturing_handler();
        handler.set_debug_mode(false);

        handler.error("nothing");
        assert!(memory.is_empty());
    }

    #[test]
    fn test_developer_channel_off_emits_nothing() {
        let (handler, memory) = capturing_handler();
        handler.configure(LoggerOptions::new().debug_mode(true).developer_channel(false));

        handler.info("quiet");
        assert!(memory.is_empty());
    }

    #[test]
    fn test_set_screen_tags() {
        let handler = LogHandler::new();

        handler.set_screen("Home");
        assert_eq!(handler.config().tag, "[Home]");
        assert_eq!(handler.config().current_screen, "Home");

        handler.set_screen("");
        assert_eq!(handler.config().tag, crate::core::DEFAULT_TAG);

        handler.set_screen_tag("Profile", "ProfileTag");
        assert_eq!(handler.config().tag, "ProfileTag");
        assert_eq!(handler.config().current_screen, "Profile");

        handler.set_screen("Home");
        assert_eq!(handler.config().tag, "[Home]");
    }

    #[test]
    fn test_configure_overwrites_instead_of_merging() {
        let handler = LogHandler::new();
        handler.configure(
            LoggerOptions::new()
                .tag("First")
                .include_system_info(true)
                .min_log_level(LogLevel::Error),
        );
        handler.configure(LoggerOptions::new().screen("Second"));

        let config = handler.config();
        assert_eq!(config.tag, "[Second]");
        assert!(!config.include_system_info);
        assert_eq!(config.min_level, LogLevel::Debug);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let handler = LogHandler::new();
        handler.configure(
            LoggerOptions::new()
                .tag("X")
                .screen("Y")
                .debug_mode(!cfg!(debug_assertions))
                .structured_logging(false)
                .min_log_level(LogLevel::Error),
        );
        handler.reset();
        assert_eq!(handler.config(), LoggerConfig::default());
    }

    #[test]
    fn test_screen_override_is_per_entry() {
        let (handler, memory) = capturing_handler();
        handler.set_screen("Home");

        handler.output(
            "from dialog",
            OutputOptions::new(LogLevel::Info).screen("Dialog"),
        );

        let records = memory.primary_records();
        assert_eq!(records[0].channel, "[Dialog]");
        assert_eq!(handler.config().tag, "[Home]");
        assert_eq!(handler.config().current_screen, "Home");
    }

    #[test]
    fn test_structured_record_channel_and_payload() {
        let (handler, memory) = capturing_handler();
        handler.set_screen("Home");

        handler.output(
            "loaded",
            OutputOptions::new(LogLevel::Info).field("count", 4),
        );

        let structured = memory.structured_records();
        assert_eq!(structured.len(), 1);
        assert_eq!(structured[0].channel, "[Home]_structured");

        let payload: serde_json::Value = serde_json::from_str(&structured[0].message).unwrap();
        assert_eq!(payload["screen"], "Home");
        assert_eq!(payload["context"]["count"], 4);
    }

    #[test]
    fn test_no_structured_record_when_disabled() {
        let (handler, memory) = capturing_handler();
        handler.configure(LoggerOptions::new().debug_mode(true).structured_logging(false));

        handler.output(
            "x",
            OutputOptions::new(LogLevel::Info).field("k", "v"),
        );
        assert_eq!(memory.len(), 1);
        assert!(memory.structured_records().is_empty());
    }

    #[test]
    fn test_no_structured_record_without_extra_data() {
        let (handler, memory) = capturing_handler();
        handler.set_screen_tag("", "");

        handler.info("bare");
        assert_eq!(memory.len(), 1);
        assert!(memory.structured_records().is_empty());
    }

    #[test]
    fn test_timestamp_toggle() {
        let (handler, memory) = capturing_handler();
        handler.configure(LoggerOptions::new().debug_mode(true).include_timestamp(false));

        handler.info("no time");
        assert!(memory.records().iter().all(|r| r.time.is_none()));
    }

    #[test]
    fn test_stack_trace_toggle() {
        let (handler, memory) = capturing_handler();
        handler.configure(LoggerOptions::new().debug_mode(true).include_stack_trace(false));

        handler.output(
            "boom",
            OutputOptions::new(LogLevel::Error)
                .error("bad")
                .stack_trace("frame 0"),
        );
        let records = memory.primary_records();
        assert_eq!(records[0].error.as_deref(), Some("bad"));
        assert!(records[0].stack_trace.is_none());
    }

    #[test]
    fn test_system_info_in_payload() {
        let (handler, memory) = capturing_handler();
        handler.configure(LoggerOptions::new().debug_mode(true).include_system_info(true));

        handler.info("with system");
        let structured = memory.structured_records();
        let payload: serde_json::Value = serde_json::from_str(&structured[0].message).unwrap();
        assert_eq!(payload["system"]["arch"], std::env::consts::ARCH);
    }

    #[test]
    fn test_failing_appender_is_isolated() {
        struct FailingAppender;

        impl Appender for FailingAppender {
            fn append(&mut self, _record: &ChannelRecord) -> Result<()> {
                Err(LoggerError::appender("failing", "Simulated failure"))
            }

            fn flush(&mut self) -> Result<()> {
                Ok(())
            }

            fn name(&self) -> &str {
                "failing"
            }
        }

        struct PanickingAppender;

        impl Appender for PanickingAppender {
            fn append(&mut self, _record: &ChannelRecord) -> Result<()> {
                panic!("appender exploded");
            }

            fn flush(&mut self) -> Result<()> {
                Ok(())
            }

            fn name(&self) -> &str {
                "panicking"
            }
        }

        let (handler, memory) = capturing_handler();
        handler.add_appender(Box::new(FailingAppender));
        handler.add_appender(Box::new(PanickingAppender));

        handler.warning("still delivered");

        assert_eq!(memory.primary_records().len(), 1);
        assert_eq!(handler.dropped_count(), 1);
    }

    #[test]
    #[allow(deprecated)]
    fn test_show_forwards_to_debug() {
        let (handler, memory) = capturing_handler();
        handler.show("legacy");

        let records = memory.primary_records();
        assert_eq!(records[0].level, LogLevel::Debug);
        assert_eq!(records[0].message, "[DEBUG] legacy");
    }

    #[test]
    fn test_clones_share_configuration() {
        let (handler, memory) = capturing_handler();
        let other = handler.clone();

        other.set_min_level(LogLevel::Error);
        handler.info("filtered by clone's change");
        assert!(memory.is_empty());
    }

    #[test]
    fn test_timing_fields_on_primary_message() {
        let (handler, memory) = capturing_handler();
        handler.output(
            "sync done",
            OutputOptions::new(LogLevel::Info)
                .operation("sync")
                .duration(Duration::from_millis(12))
                .context(LogContext::new()),
        );
        assert_eq!(memory.primary_records()[0].message, "[INFO] sync done (sync: 12ms)");
    }

    #[test]
    fn test_global_is_a_singleton() {
        let a = LogHandler::global() as *const LogHandler;
        let b = LogHandler::global() as *const LogHandler;
        assert_eq!(a, b);
    }
}
