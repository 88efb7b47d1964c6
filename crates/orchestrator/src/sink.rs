//! Append-only CSV result sink
//!
//! One row per trial outcome, written as soon as the outcome exists so a
//! crashed batch still leaves a usable partial file. The header is written
//! only when the destination is absent or empty, which makes appending
//! across separate runs safe. All appends go through an internal async
//! mutex; a failed write is retried a bounded number of times and then
//! escalated, because silently dropping a result is worse than aborting.

use satbench_core::{Error, Result, TrialOutcome, CSV_FIELDS, SINK_WRITE_ATTEMPTS};
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::warn;

/// Serialized writer for the batch's destination CSV.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one outcome, creating the file and header on first use.
    pub async fn append(&self, outcome: &TrialOutcome) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut attempt = 0;
        loop {
            match self.try_append(outcome) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    attempt += 1;
                    if attempt >= SINK_WRITE_ATTEMPTS {
                        return Err(Error::sink_write(
                            &self.path,
                            format!("giving up after {attempt} attempts: {e}"),
                        ));
                    }
                    warn!(
                        path = %self.path.display(),
                        attempt,
                        error = %e,
                        "result sink append failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(50 * u64::from(attempt))).await;
                }
            }
        }
    }

    fn try_append(&self, outcome: &TrialOutcome) -> std::result::Result<(), csv::Error> {
        let header_needed = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(csv::Error::from)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        if header_needed {
            writer.write_record(CSV_FIELDS)?;
        }
        writer.write_record(outcome.to_record())?;
        writer.flush()?;
        Ok(())
    }
}
