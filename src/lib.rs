//! # Policy Engine Logger
//!
//! Support layer for the client-side policy engine: the storage contract
//! policy backends implement, and the diagnostic logger the rest of the
//! application writes to.
//!
//! ## Features
//!
//! - **Storage contract**: [`PolicyStorage`] / [`AsyncPolicyStorage`] with
//!   in-memory and atomic file backends
//! - **Level filtering**: debug-mode gate plus a minimum severity
//! - **Screen tagging**: entries are tagged with the active screen
//! - **Structured side records**: JSON payloads on `<tag>_structured`
//! - **Timing**: scoped timers that log on every exit path

pub mod appenders;
pub mod core;
pub mod macros;
pub mod storage;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, JsonAppender, MemoryAppender};
    pub use crate::core::{
        Appender, ChannelRecord, FieldValue, LogContext, LogEntry, LogHandler, LogHandlerBuilder,
        LogLevel, LoggerConfig, LoggerError, LoggerMetrics, LoggerOptions, MetricsSnapshot,
        OutputBuilder, OutputOptions, Result, StorageError, StorageResult, StructuredLogEntry,
        TimestampFormat, TimingGuard, DEFAULT_TAG,
    };
    pub use crate::storage::{AsyncPolicyStorage, InMemoryPolicyStorage, PolicyMap, PolicyStorage};
    #[cfg(feature = "file")]
    pub use crate::storage::FilePolicyStorage;
}

pub use appenders::{ConsoleAppender, FileAppender, JsonAppender, MemoryAppender};
pub use core::{
    Appender, ChannelRecord, FieldValue, LogContext, LogEntry, LogHandler, LogHandlerBuilder,
    LogLevel, LoggerConfig, LoggerError, LoggerMetrics, LoggerOptions, MetricsSnapshot,
    OutputBuilder, OutputOptions, Result, StorageError, StorageResult, StructuredLogEntry,
    TimestampFormat, TimingGuard, DEFAULT_TAG,
};
pub use storage::{AsyncPolicyStorage, InMemoryPolicyStorage, PolicyMap, PolicyStorage};
#[cfg(feature = "file")]
pub use storage::FilePolicyStorage;
#[cfg(feature = "async-storage")]
pub use storage::AsyncFilePolicyStorage;
