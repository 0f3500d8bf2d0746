//! `format!`-style shorthands for [`LogHandler::output`](crate::LogHandler::output)
//!
//! Each macro takes the handler first, then a format string and its
//! arguments. Level filtering and debug-mode gating still happen inside the
//! handler, so a suppressed call only costs the `format!`.
//!
//! ```
//! use policy_engine_logger::prelude::*;
//! use policy_engine_logger::{info, warning};
//!
//! let handler = LogHandler::builder().debug_mode(true).build();
//! let screen = "Checkout";
//!
//! info!(handler, "entered {}", screen);
//! warning!(handler, "{} policies missing for {}", 2, screen);
//! ```

/// Emit at a level chosen at runtime
///
/// ```
/// # use policy_engine_logger::prelude::*;
/// use policy_engine_logger::log;
///
/// let handler = LogHandler::new();
/// let level = if cfg!(debug_assertions) { LogLevel::Debug } else { LogLevel::Info };
/// log!(handler, level, "rule set {} evaluated", "password");
/// ```
#[macro_export]
macro_rules! log {
    ($handler:expr, $level:expr, $($fmt:tt)+) => {
        $handler.output(::std::format!($($fmt)+), $crate::OutputOptions::new($level))
    };
}

/// `log!` at [`LogLevel::Debug`](crate::LogLevel::Debug)
#[macro_export]
macro_rules! debug {
    ($handler:expr, $($fmt:tt)+) => {
        $crate::log!($handler, $crate::LogLevel::Debug, $($fmt)+)
    };
}

/// `log!` at [`LogLevel::Info`](crate::LogLevel::Info)
#[macro_export]
macro_rules! info {
    ($handler:expr, $($fmt:tt)+) => {
        $crate::log!($handler, $crate::LogLevel::Info, $($fmt)+)
    };
}

/// `log!` at [`LogLevel::Warning`](crate::LogLevel::Warning)
#[macro_export]
macro_rules! warning {
    ($handler:expr, $($fmt:tt)+) => {
        $crate::log!($handler, $crate::LogLevel::Warning, $($fmt)+)
    };
}

/// `log!` at [`LogLevel::Error`](crate::LogLevel::Error)
///
/// Only the message is formatted. To attach an error value, call
/// [`LogHandler::output`](crate::LogHandler::output) with
/// [`OutputOptions::error`](crate::OutputOptions::error).
#[macro_export]
macro_rules! error {
    ($handler:expr, $($fmt:tt)+) => {
        $crate::log!($handler, $crate::LogLevel::Error, $($fmt)+)
    };
}
