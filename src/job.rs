use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use image::Rgb;
use tracing::debug;

use crate::error::JobError;
use crate::filterops::filter::{Filter, FilterOutcome, ProgressSink};
use crate::Image;

/// Event stream emitted by a running filter job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    /// A progress report from the pass, in `[0, 100]`.
    Progress(u8),
    /// The terminal event: the pass completed or was cancelled.
    Finished(FilterOutcome),
}

/// Sink that forwards progress over the job's event channel and reads the
/// shared cancellation flag.
struct ChannelSink {
    events: Sender<JobEvent>,
    cancel: Arc<AtomicBool>,
}

impl ProgressSink for ChannelSink {
    fn report(&mut self, percent: u8) {
        // the receiver may already be gone; the pass keeps running
        let _ = self.events.send(JobEvent::Progress(percent));
    }

    fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// A whole-image pass running on its own worker thread.
///
/// The caller's thread stays free; progress and the terminal outcome
/// arrive over an event channel. Cancellation is cooperative: the pass
/// polls the flag at column boundaries and abandons its partial output,
/// so a cancelled job never yields an image.
pub struct FilterJob {
    worker: Option<JoinHandle<()>>,
    events: Receiver<JobEvent>,
    cancel: Arc<AtomicBool>,
}

impl FilterJob {
    /// Start `filter` over `source` on a dedicated worker thread.
    pub fn spawn(filter: Box<dyn Filter>, source: Image<Rgb<u8>>) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        let worker = {
            let cancel = Arc::clone(&cancel);
            thread::spawn(move || {
                let mut sink = ChannelSink {
                    events: events_tx,
                    cancel,
                };
                debug!(filter = filter.name(), "filter job started");
                let outcome = filter.process(&source, &mut sink);
                match &outcome {
                    FilterOutcome::Completed(_) => {
                        debug!(filter = filter.name(), "filter job finished");
                    }
                    FilterOutcome::Cancelled => {
                        debug!(filter = filter.name(), "filter job cancelled");
                    }
                }
                let _ = sink.events.send(JobEvent::Finished(outcome));
            })
        };

        Self {
            worker: Some(worker),
            events: events_rx,
            cancel,
        }
    }

    /// Ask the pass to stop at its next poll point.
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Drain pending events without blocking.
    pub fn try_events(&self) -> impl Iterator<Item = JobEvent> + '_ {
        self.events.try_iter()
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.worker
            .as_ref()
            .map_or(true, JoinHandle::is_finished)
    }

    /// Block until the pass finishes and return its outcome, discarding
    /// any progress events still in flight.
    ///
    /// A worker that died without reporting an outcome counts as
    /// cancelled.
    pub fn wait(mut self) -> FilterOutcome {
        let mut outcome = None;
        for event in self.events.iter() {
            if let JobEvent::Finished(result) = event {
                outcome = Some(result);
                break;
            }
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        outcome.unwrap_or(FilterOutcome::Cancelled)
    }
}

/// Serializes job submission: at most one pass in flight at a time.
#[derive(Default)]
pub struct JobRunner {
    active: Option<FilterJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a job, or refuse while the previous one is still running.
    ///
    /// # Errors
    ///
    /// `Busy` when an unfinished job is in flight.
    pub fn submit(
        &mut self,
        filter: Box<dyn Filter>,
        source: Image<Rgb<u8>>,
    ) -> Result<&mut FilterJob, JobError> {
        if self.active.as_ref().is_some_and(|job| !job.is_finished()) {
            return Err(JobError::Busy);
        }
        Ok(self.active.insert(FilterJob::spawn(filter, source)))
    }

    /// The job most recently submitted, if any.
    pub fn active(&mut self) -> Option<&mut FilterJob> {
        self.active.as_mut()
    }

    /// Detach the current job, e.g. to `wait` on it.
    pub fn take(&mut self) -> Option<FilterJob> {
        self.active.take()
    }
}
