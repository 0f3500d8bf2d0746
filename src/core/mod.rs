//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_handler;
pub mod log_level;
pub mod metrics;
pub mod output_builder;
pub mod structured_entry;
pub mod timestamp;
pub mod timing;

pub use appender::{Appender, ChannelRecord, STRUCTURED_SUFFIX};
pub use config::{screen_tag, LoggerConfig, LoggerOptions, DEFAULT_TAG};
pub use error::{LoggerError, Result, StorageError, StorageResult};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::LogEntry;
pub use log_handler::{LogHandler, LogHandlerBuilder};
pub use log_level::LogLevel;
pub use metrics::{LoggerMetrics, MetricsSnapshot};
pub use output_builder::{OutputBuilder, OutputOptions};
pub use structured_entry::{StructuredLogEntry, SystemInfo};
pub use timestamp::TimestampFormat;
pub use timing::TimingGuard;
