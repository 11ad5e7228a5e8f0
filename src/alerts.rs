//! Append-only alert log

use crate::types::AlertRecord;

/// Authoritative record of every raised alert for the process lifetime
#[derive(Debug, Default)]
pub struct AlertLog {
    records: Vec<AlertRecord>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: AlertRecord) {
        self.records.push(record);
    }

    /// The most recent `limit` records, oldest first
    pub fn recent(&self, limit: usize) -> Vec<AlertRecord> {
        let start = self.records.len().saturating_sub(limit);
        self.records[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
