use crate::output::{ContactRow, OutputError, OutputResult};
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Streaming CSV sink for one region
///
/// Rows are header-less, every field quoted, and of variable width (one
/// column per email). Each row is flushed as soon as it is written.
pub struct CsvOutput {
    path: PathBuf,
    writer: Writer<File>,
    rows_written: usize,
}

impl CsvOutput {
    /// Creates (or truncates) the CSV file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        let writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quote_style(QuoteStyle::Always)
            .from_writer(file);

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows_written: 0,
        })
    }

    /// Appends one row and flushes it to the file
    pub fn write_row(&mut self, row: &ContactRow) -> OutputResult<()> {
        self.writer.write_record(row.fields())?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes, syncs and closes the file
    ///
    /// Only a successful return means every row is durably on disk. This
    /// blocks on `fsync`; async callers should go through `finish_blocking`.
    pub fn finish(self) -> OutputResult<usize> {
        let file = self
            .writer
            .into_inner()
            .map_err(|e| OutputError::Write(format!("{}: {}", self.path.display(), e.error())))?;
        file.sync_all()?;
        Ok(self.rows_written)
    }

    /// Runs `finish` on the blocking thread pool
    pub async fn finish_blocking(self) -> OutputResult<usize> {
        tokio::task::spawn_blocking(move || self.finish())
            .await
            .map_err(|e| OutputError::Write(format!("CSV close task failed: {}", e)))?
    }
}
