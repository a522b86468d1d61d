//! Record sink trait and output errors

use crate::catalog::CanonicalRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for normalized records
///
/// Records arrive one at a time, in completion order. Implementations decide
/// how and when they are persisted; `finish` is called once after the last
/// record.
pub trait RecordSink {
    /// Stores one record
    fn write_record(&mut self, record: &CanonicalRecord) -> OutputResult<()>;

    /// Flushes and closes the sink
    fn finish(&mut self) -> OutputResult<()>;

    /// Number of records stored so far
    fn records_written(&self) -> usize;
}

/// In-memory sink, used by tests and dry runs
impl RecordSink for Vec<CanonicalRecord> {
    fn write_record(&mut self, record: &CanonicalRecord) -> OutputResult<()> {
        self.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }

    fn records_written(&self) -> usize {
        self.len()
    }
}
