//! Appender implementations

pub mod console;
pub mod file;
pub mod json;
pub mod memory;

pub use console::ConsoleAppender;
pub use file::FileAppender;
pub use json::JsonAppender;
pub use memory::MemoryAppender;

// Re-export trait for convenience
pub use crate::core::{Appender, ChannelRecord};
