//! Runs the blocking scrape engine off the async scheduler and streams its
//! events to a single observer.
//!
//! The engine executes on tokio's blocking pool. Events cross back over an
//! unbounded channel and are delivered one at a time, in emission order, by
//! a forwarding task. [`LogEvent::Done`] ends the forwarding loop.
//!
//! A [`RunRegistry`] holds at most one active run. Starting another while
//! one is active is rejected, not queued. The slot frees once `Done` has been
//! delivered and the worker has returned.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use leadscout_core::{Lead, LogEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::browser::Browser;
use crate::cancel::StopSignal;
use crate::error::{BridgeError, ScraperError};
use crate::session::{EventSink, LeadScraper, ScrapeRequest};

/// The live consumer of a run's events, e.g. a websocket connection.
pub trait Observer: Send + 'static {
    fn deliver(&mut self, event: LogEvent) -> impl Future<Output = ()> + Send;
}

struct ActiveRun {
    id: Uuid,
    stop: StopSignal,
}

/// Single-flight slot for scrape runs.
#[derive(Default)]
pub struct RunRegistry {
    active: Mutex<Option<ActiveRun>>,
}

/// Handle to a started run.
pub struct RunHandle {
    id: Uuid,
    stop: StopSignal,
    task: JoinHandle<Result<Vec<Lead>, ScraperError>>,
}

impl RunHandle {
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Requests a cooperative stop of this run.
    pub fn stop(&self) {
        self.stop.request();
    }

    /// Waits for the run to finish and its `Done` to be delivered.
    ///
    /// # Errors
    ///
    /// The run's fatal [`ScraperError`], or [`ScraperError::WorkerPanicked`]
    /// if the forwarding task itself panicked.
    pub async fn wait(self) -> Result<Vec<Lead>, ScraperError> {
        self.task
            .await
            .unwrap_or_else(|e| Err(ScraperError::WorkerPanicked(e.to_string())))
    }
}

/// Frees the registry slot when the forwarding task ends, including by panic.
struct SlotGuard {
    registry: Arc<RunRegistry>,
    id: Uuid,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

impl RunRegistry {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.slot().is_some()
    }

    #[must_use]
    pub fn active_run(&self) -> Option<Uuid> {
        self.slot().as_ref().map(|run| run.id)
    }

    /// Requests a stop of the active run. Returns `false` when idle.
    pub fn stop(&self) -> bool {
        match self.slot().as_ref() {
            Some(run) => {
                tracing::info!(run_id = %run.id, "stop requested");
                run.stop.request();
                true
            }
            None => false,
        }
    }

    /// Starts a run: `launch` builds the browser on the worker thread, the
    /// engine drives it, and every event reaches `observer` in order.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`BridgeError::AlreadyRunning`] while another run holds the slot.
    pub fn start<B, L, O>(
        self: &Arc<Self>,
        scraper: Arc<LeadScraper>,
        request: ScrapeRequest,
        launch: L,
        mut observer: O,
    ) -> Result<RunHandle, BridgeError>
    where
        B: Browser,
        L: FnOnce() -> Result<B, ScraperError> + Send + 'static,
        O: Observer,
    {
        let id = Uuid::new_v4();
        let stop = StopSignal::new();
        {
            let mut slot = self.slot();
            if let Some(run) = slot.as_ref() {
                return Err(BridgeError::AlreadyRunning { run_id: run.id });
            }
            *slot = Some(ActiveRun {
                id,
                stop: stop.clone(),
            });
        }
        let guard = SlotGuard {
            registry: Arc::clone(self),
            id,
        };

        tracing::info!(
            run_id = %id,
            query = %request.query,
            location = %request.location,
            deep_search = request.deep_search,
            "starting scrape run"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        tx.emit(LogEvent::status("Starting scraper..."));

        let worker_stop = stop.clone();
        let worker = tokio::task::spawn_blocking(move || {
            let mut browser = match launch() {
                Ok(browser) => browser,
                Err(e) => {
                    tracing::error!(error = %e, "browser launch failed");
                    tx.emit(LogEvent::status(format!("Scrape failed: {e}")));
                    tx.emit(LogEvent::Done);
                    return Err(e);
                }
            };
            scraper.run(&mut browser, &request, &worker_stop, &tx)
        });

        let task = tokio::spawn(async move {
            let _guard = guard;
            let done_delivered = forward(rx, &mut observer).await;
            let outcome = worker
                .await
                .unwrap_or_else(|e| Err(ScraperError::WorkerPanicked(e.to_string())));
            if !done_delivered {
                // The worker died without its sentinel; close the stream for it.
                let reason = match &outcome {
                    Err(e) => e.to_string(),
                    Ok(_) => "event stream closed early".to_owned(),
                };
                observer
                    .deliver(LogEvent::status(format!("Scrape failed: {reason}")))
                    .await;
                observer.deliver(LogEvent::Done).await;
            }
            tracing::info!(run_id = %id, ok = outcome.is_ok(), "scrape run finished");
            outcome
        });

        Ok(RunHandle { id, stop, task })
    }

    fn release(&self, id: Uuid) {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|run| run.id == id) {
            *slot = None;
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Delivers events until `Done`. Returns whether `Done` was seen before the
/// channel closed.
async fn forward<O: Observer>(mut rx: UnboundedReceiver<LogEvent>, observer: &mut O) -> bool {
    while let Some(event) = rx.recv().await {
        let done = event.is_done();
        observer.deliver(event).await;
        if done {
            return true;
        }
    }
    false
}
