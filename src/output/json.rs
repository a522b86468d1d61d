//! Streaming JSON array output

use crate::catalog::CanonicalRecord;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records as one pretty-printed JSON array, element by element
///
/// Records are written as they arrive, so a crawl that is interrupted still
/// leaves every finished record on disk (the closing bracket aside).
/// Non-ASCII text is written as UTF-8, not escaped.
pub struct JsonArraySink<W: Write> {
    writer: W,
    written: usize,
    finished: bool,
}

impl JsonArraySink<BufWriter<File>> {
    /// Creates (or truncates) the result file
    pub fn create(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonArraySink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            finished: false,
        }
    }

    /// Consumes the sink and returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonArraySink<W> {
    fn write_record(&mut self, record: &CanonicalRecord) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Write(
                "record written after the array was closed".to_string(),
            ));
        }

        let separator = if self.written == 0 { "[\n" } else { ",\n" };
        self.writer.write_all(separator.as_bytes())?;
        serde_json::to_writer_pretty(&mut self.writer, record)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }

        let closing = if self.written == 0 { "[]\n" } else { "\n]\n" };
        self.writer.write_all(closing.as_bytes())?;
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    fn records_written(&self) -> usize {
        self.written
    }
}
