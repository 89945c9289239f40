//! Input data handling for cache simulation
//!
//! Reads request traces from CSV files with a `timestamp,key` header. Extra
//! columns are ignored and `#` starts a comment line. Requests are streamed
//! one file at a time, so memory use does not grow with the trace length.

use crate::models::Request;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Reader for request trace files
pub struct LogReader {
    input_dir: PathBuf,
}

impl LogReader {
    /// Create a new reader for the given input directory
    pub fn new<P: AsRef<Path>>(input_dir: P) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
        }
    }

    /// Get all trace files in the input directory, sorted by name
    pub fn get_log_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.input_dir)
            .with_context(|| format!("failed to read directory {}", self.input_dir.display()))?;

        let mut log_files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == "log" || ext == "csv" || ext == "txt" {
                        log_files.push(path);
                    }
                }
            }
        }

        // Sort files by name for consistent ordering
        log_files.sort();

        Ok(log_files)
    }

    /// Calls `f` for every request in every trace file, in order.
    ///
    /// Returns the number of requests visited. A malformed line stops the
    /// scan with an error naming the file and line.
    pub fn for_each_request<F>(&self, mut f: F) -> Result<usize>
    where
        F: FnMut(Request),
    {
        let files = self.get_log_files()?;
        if files.is_empty() {
            anyhow::bail!("no trace files found in {}", self.input_dir.display());
        }

        let mut count = 0;
        for path in &files {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            count += read_requests(file, path, &mut f)?;
            tracing::debug!(file = %path.display(), total = count, "trace file replayed");
        }
        Ok(count)
    }

    /// Parse all trace files into memory
    pub fn parse_all_files(&self) -> Result<Vec<Request>> {
        let mut requests = Vec::new();
        self.for_each_request(|request| requests.push(request))?;
        Ok(requests)
    }
}

/// Streams the requests of one CSV source into `f`.
fn read_requests<R, F>(source: R, path: &Path, f: &mut F) -> Result<usize>
where
    R: Read,
    F: FnMut(Request),
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(source);

    let mut count = 0;
    for record in reader.deserialize::<Request>() {
        let request = record.with_context(|| format!("malformed request in {}", path.display()))?;
        f(request);
        count += 1;
    }
    Ok(count)
}
