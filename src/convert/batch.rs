//! Batch conversion into one document.
//!
//! A [`BatchConverter`] owns the single writer session of a run. Images are
//! decoded on a bounded pool of blocking workers and handed back in input
//! order to one sequencer loop, the only code that touches the writer.
//!
//! ```text
//! Idle -> Opened -> Appending* -> Closed
//!                              \-> Aborted
//! ```
//!
//! A decode failure skips the image. A page failure stops dispatching new
//! decodes, discards in-flight ones and aborts the writer without committing.

use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

use super::job::{ConversionJob, ConversionOutcome, ConversionRecord};
use crate::config::PageSpecDefaults;
use crate::decode::{DecodedImage, ImageDecoder};
use crate::error::{ExitCode, ImgToPdfError, Result};
use crate::io::{DocumentBackend, OutputTarget, WriteStatistics};

/// Lifecycle of the writer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// No writer has been opened.
    Idle,
    /// The writer is open and no input has been processed yet.
    Opened,
    /// At least one input has been processed.
    Appending,
    /// The document was committed.
    Closed,
    /// The document was discarded.
    Aborted,
}

/// Shared flag that stops further decode work.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// One record per processed input, in input order.
    pub records: Vec<ConversionRecord>,

    /// Number of inputs handed to the batch.
    pub total_inputs: usize,

    /// Final session state.
    pub state: BatchState,

    /// The fatal error that ended the batch, if any.
    pub failure: Option<ImgToPdfError>,

    /// Statistics of the committed document.
    pub statistics: Option<WriteStatistics>,

    /// Wall time of the whole batch.
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of pages produced.
    pub fn rendered(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_rendered())
            .count()
    }

    /// Number of inputs skipped because they could not be decoded.
    pub fn skipped(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, ConversionOutcome::DecodeFailed { .. }))
            .count()
    }

    /// Whether the document was committed.
    pub fn is_success(&self) -> bool {
        self.state == BatchState::Closed && self.failure.is_none()
    }

    /// Process exit code for this batch.
    ///
    /// Skipped inputs do not change the code of a committed document.
    pub fn exit_code(&self) -> ExitCode {
        self.failure
            .iter()
            .map(ImgToPdfError::exit_code)
            .fold(ExitCode::Success, ExitCode::most_severe)
    }
}

/// Drives one [`ConversionJob`] per input against a single writer.
pub struct BatchConverter {
    decoder: Arc<dyn ImageDecoder>,
    backend: Arc<dyn DocumentBackend>,
    jobs: usize,
    cancel: CancellationFlag,
}

impl BatchConverter {
    /// Create a sequential converter.
    pub fn new(decoder: Arc<dyn ImageDecoder>, backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            decoder,
            backend,
            jobs: 1,
            cancel: CancellationFlag::new(),
        }
    }

    /// Decode up to `jobs` images concurrently.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Flag that cancels this converter's runs.
    ///
    /// Once set it stays set, so every later run is cancelled too. Page
    /// failures never set it.
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Convert `inputs` into the document at `target`.
    pub async fn run(
        &self,
        inputs: &[PathBuf],
        target: &OutputTarget,
        defaults: &PageSpecDefaults,
    ) -> BatchReport {
        self.run_with_progress(inputs, target, defaults, |_, _| {})
            .await
    }

    /// Like [`run`](Self::run), calling `on_record` as each input settles.
    ///
    /// The callback receives the input's index and its record, in input order.
    pub async fn run_with_progress<F>(
        &self,
        inputs: &[PathBuf],
        target: &OutputTarget,
        defaults: &PageSpecDefaults,
        mut on_record: F,
    ) -> BatchReport
    where
        F: FnMut(usize, &ConversionRecord),
    {
        let start = Instant::now();
        let mut report = BatchReport {
            records: Vec::with_capacity(inputs.len()),
            total_inputs: inputs.len(),
            state: BatchState::Idle,
            failure: None,
            statistics: None,
            elapsed: Duration::ZERO,
        };

        if inputs.is_empty() {
            report.failure = Some(ImgToPdfError::NoInputs);
            return report;
        }

        let mut writer = match self.backend.open(target) {
            Ok(writer) => writer,
            Err(err) => {
                debug!(output = %target.path.display(), error = %err, "could not open output");
                report.failure = Some(err);
                report.elapsed = start.elapsed();
                return report;
            }
        };
        report.state = BatchState::Opened;
        debug!(
            output = %target.path.display(),
            format = %target.format,
            inputs = inputs.len(),
            jobs = self.jobs,
            "writer opened"
        );

        // Set by a page failure; lives only as long as this run.
        let halt = CancellationFlag::new();
        let job = Arc::new(ConversionJob::new(self.decoder.clone(), *defaults));
        let mut decoded = stream::iter(inputs.iter().cloned())
            .map(|path| {
                let job = Arc::clone(&job);
                let cancel = self.cancel.clone();
                let halt = halt.clone();
                async move {
                    let result = decode_blocking(job, path.clone(), cancel, halt).await;
                    (path, result)
                }
            })
            .buffered(self.jobs);

        let mut index = 0;
        while let Some((path, result)) = decoded.next().await {
            let Some(result) = result else {
                break;
            };
            report.state = BatchState::Appending;

            let outcome = job.settle(result, writer.as_mut());
            match &outcome {
                ConversionOutcome::Rendered { page, color_mode } => {
                    debug!(path = %path.display(), page, ?color_mode, "page appended");
                }
                ConversionOutcome::DecodeFailed { reason } => {
                    debug!(path = %path.display(), %reason, "skipping undecodable image");
                }
                ConversionOutcome::PageFailed { reason } => {
                    halt.cancel();
                    report.failure = Some(ImgToPdfError::page_failed(path.clone(), reason.clone()));
                }
            }

            let record = ConversionRecord { path, outcome };
            on_record(index, &record);
            report.records.push(record);
            index += 1;

            if halt.is_cancelled() || self.cancel.is_cancelled() {
                break;
            }
        }
        // Dropping the stream discards decodes still in flight.
        drop(decoded);

        if report.failure.is_none() && self.cancel.is_cancelled() {
            report.failure = Some(ImgToPdfError::other("Conversion cancelled"));
        }
        if report.failure.is_none() && writer.pages() == 0 {
            report.failure = Some(ImgToPdfError::NoInputs);
        }

        if report.failure.is_some() {
            writer.abort();
            report.state = BatchState::Aborted;
        } else {
            match writer.finish() {
                Ok(stats) => {
                    report.state = BatchState::Closed;
                    report.statistics = Some(stats);
                }
                Err(err) => {
                    report.state = BatchState::Aborted;
                    report.failure = Some(err);
                }
            }
        }

        report.elapsed = start.elapsed();
        debug!(state = ?report.state, pages = report.rendered(), "batch finished");
        report
    }
}

/// Decode on the blocking pool. `None` when either flag was set before starting.
async fn decode_blocking(
    job: Arc<ConversionJob>,
    path: PathBuf,
    cancel: CancellationFlag,
    halt: CancellationFlag,
) -> Option<Result<DecodedImage>> {
    if cancel.is_cancelled() || halt.is_cancelled() {
        return None;
    }

    let task_path = path.clone();
    let joined = tokio::task::spawn_blocking(move || job.decode(&task_path)).await;

    Some(joined.unwrap_or_else(|e| {
        Err(ImgToPdfError::failed_to_decode(
            path,
            format!("decode task failed: {e}"),
        ))
    }))
}
