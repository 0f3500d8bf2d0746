//! In-memory appender
//!
//! Keeps every record in a shared buffer. Clones share the buffer, so a test
//! (or an in-app diagnostics screen) can hand one clone to the handler and
//! read through another.

use crate::core::{Appender, ChannelRecord, Result};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryAppender {
    records: Arc<Mutex<Vec<ChannelRecord>>>,
    capacity: Option<usize>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the most recent `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            capacity: Some(capacity),
        }
    }

    /// Snapshot of every captured record, oldest first
    pub fn records(&self) -> Vec<ChannelRecord> {
        self.records.lock().clone()
    }

    /// Records on the tag channel
    pub fn primary_records(&self) -> Vec<ChannelRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| !r.is_structured())
            .cloned()
            .collect()
    }

    /// Records on `<tag>_structured` channels
    pub fn structured_records(&self) -> Vec<ChannelRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.is_structured())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, record: &ChannelRecord) -> Result<()> {
        let mut records = self.records.lock();
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return Ok(());
            }
            if records.len() >= capacity {
                records.remove(0);
            }
        }
        records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
