//! Batch processor — the sequential fetch–transform pipeline engine.
//!
//! Walks the seed sequence derived from a record store, runs the configured
//! per-item transform one item at a time, applies every result to the store,
//! and reports lifecycle and progress through a broadcast channel.
//!
//! Cancellation is cooperative: the token is checked between items only, so
//! an in-flight transform always completes before the stop takes effect. A
//! per-item failure never aborts the batch.


use std::collections::HashSet;
use std::sync::Mutex;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::FetchConfig;
use crate::naming;
use crate::store::RecordStore;
use crate::transform;
use crate::types::{Event, ItemStatus, ProcessingResult};

/// Broadcast buffer size for lifecycle events
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Drives batch runs over a record store.
///
/// The processor owns the event channel and the cancellation state; the
/// used-filename set is scoped to each `process` call and never survives
/// across runs. Starting a second run concurrently against the same store
/// is undefined and must be prevented by the caller.
pub struct BatchProcessor {
    event_tx: broadcast::Sender<Event>,
    cancel: Mutex<CancellationToken>,
}

impl BatchProcessor {
    /// Create a processor with a fresh event channel.
    pub fn new() -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            event_tx,
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Subscribe to batch lifecycle events.
    ///
    /// Multiple subscribers are supported; each receives all events
    /// independently. A subscriber that falls behind the channel buffer
    /// receives a `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Request that the current run stops after the in-flight item.
    ///
    /// Advisory only: the item currently being transformed always completes
    /// and emits its terminal event before iteration stops.
    pub fn cancel(&self) {
        self.cancel
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .cancel();
    }

    /// Install a fresh token for a new run, discarding any prior cancel.
    fn reset_cancellation(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut guard = self
            .cancel
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = token.clone();
        token
    }

    /// Emit an event to all subscribers; dropped silently when nobody listens.
    fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Run one batch over the store's current rows.
    ///
    /// Items are processed strictly in order, one at a time. Empty seeds are
    /// marked without invoking the transform; successes and failures are
    /// applied to the store and surfaced through disjoint event identities.
    /// The method itself never fails: per-item errors stay attached to their
    /// results and setup faults are routed to the logging channel.
    pub async fn process(&self, store: &mut dyn RecordStore, config: &FetchConfig) {
        let cancel = self.reset_cancellation();
        let mut used_names: HashSet<String> = HashSet::new();

        let transformer = match transform::for_config(config) {
            Ok(transformer) => transformer,
            Err(error) => {
                tracing::error!(
                    error = %error,
                    error_kind = error.kind(),
                    "could not build the transform strategy"
                );
                self.emit_event(Event::BatchStarted {
                    config: config.clone(),
                });
                self.emit_event(Event::BatchFinished {
                    config: config.clone(),
                });
                return;
            }
        };

        let seeds = store.seeds(config);
        let total = seeds.len();
        let mut processed = 0usize;

        self.emit_event(Event::BatchStarted {
            config: config.clone(),
        });

        for item in seeds {
            if cancel.is_cancelled() {
                tracing::info!(processed, total, "batch cancelled");
                break;
            }

            let result = match &item.seed {
                None => ProcessingResult::empty(item.index),
                Some(seed) => match transformer.transform(seed).await {
                    Ok(output) => {
                        // Only strategies that produce a storable payload
                        // get a filename.
                        let filename = output
                            .payload
                            .is_some()
                            .then(|| naming::allocate(seed, item.index, &mut used_names));
                        ProcessingResult::success(
                            item.index,
                            output.thumbnail,
                            filename,
                            output.payload,
                        )
                    }
                    Err(error) => {
                        tracing::warn!(
                            row = item.index + 1,
                            error = %error,
                            "item transform failed"
                        );
                        ProcessingResult::failed(item.index, error)
                    }
                },
            };

            store.update(&result);

            match result.status {
                ItemStatus::Fail => self.emit_event(Event::ItemError { result }),
                _ => self.emit_event(Event::ItemUpdated { result }),
            }

            processed += 1;
            self.emit_event(Event::Progress {
                current: processed,
                total,
            });
        }

        self.emit_event(Event::BatchFinished {
            config: config.clone(),
        });
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}
