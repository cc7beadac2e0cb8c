//! Observable `{data, loading, error}` state around a single async operation.
//!
//! Each `execute` claims a new generation. Only the settlement of the most
//! recently claimed generation may write terminal state, so a slow earlier
//! call can never overwrite a newer one, and `reset` discards whatever is
//! still in flight. The in-flight request itself is not cancelled.

use std::{
    borrow::Cow,
    error::Error as StdError,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::GatewayError;

const UNKNOWN_CAUSE: &str = "unknown error";
const UNLABELED_OPERATION: &str = "request";

#[derive(Debug, Clone, PartialEq)]
pub struct OperationState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> OperationState<T> {
    pub fn is_initial(&self) -> bool {
        self.data.is_none() && !self.loading && self.error.is_none()
    }
}

/// `"<label> failed: <cause>"`, with fallbacks so the result is never blank.
pub fn format_operation_error(label: &str, cause: &dyn StdError) -> String {
    let label = match label.trim() {
        "" => UNLABELED_OPERATION,
        label => label,
    };
    let cause = cause.to_string();
    let cause = match cause.trim() {
        "" => UNKNOWN_CAUSE,
        cause => cause,
    };
    format!("{label} failed: {cause}")
}

type OperationFn<I, O, E> = dyn Fn(I) -> BoxFuture<'static, Result<O, E>> + Send + Sync;

struct TrackerShared<O> {
    generation: AtomicU64,
    state: watch::Sender<OperationState<O>>,
}

// The generation counter is only read or written inside watch update
// closures, which run under the channel's write lock.
impl<O: Clone> TrackerShared<O> {
    fn claim(&self) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
            state.loading = true;
        });
        generation
    }

    fn settle<E: StdError>(&self, label: &str, generation: u64, outcome: &Result<O, E>) {
        let applied = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::Relaxed) != generation {
                return false;
            }
            match outcome {
                Ok(value) => {
                    state.data = Some(value.clone());
                    state.error = None;
                }
                Err(err) => {
                    state.error = Some(format_operation_error(label, err));
                }
            }
            state.loading = false;
            true
        });

        match (applied, outcome) {
            (false, _) => debug!(
                operation = label,
                generation, "tracker: discarded stale settlement"
            ),
            (true, Ok(_)) => debug!(operation = label, generation, "tracker: settled"),
            (true, Err(err)) => warn!(
                operation = label,
                generation,
                error = %err,
                "tracker: operation failed"
            ),
        }
    }

    fn abandon(&self, label: &str, generation: u64) {
        let cleared = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::Relaxed) != generation || !state.loading {
                return false;
            }
            state.loading = false;
            true
        });
        if cleared {
            debug!(
                operation = label,
                generation, "tracker: execute dropped before settlement"
            );
        }
    }

    fn reset(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::Relaxed);
            *state = OperationState::default();
        });
    }
}

/// Clears `loading` if an `execute` future is dropped before it settles.
struct PendingSettlement<O: Clone> {
    shared: Arc<TrackerShared<O>>,
    label: Cow<'static, str>,
    generation: u64,
    settled: bool,
}

impl<O: Clone> Drop for PendingSettlement<O> {
    fn drop(&mut self) {
        if !self.settled {
            self.shared.abandon(&self.label, self.generation);
        }
    }
}

pub struct OperationTracker<I, O, E = GatewayError> {
    label: Cow<'static, str>,
    operation: Arc<OperationFn<I, O, E>>,
    shared: Arc<TrackerShared<O>>,
}

impl<I, O, E> Clone for OperationTracker<I, O, E> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            operation: Arc::clone(&self.operation),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<I, O, E> OperationTracker<I, O, E>
where
    I: Send + 'static,
    O: Clone + Send + Sync + 'static,
    E: StdError + Send + 'static,
{
    pub fn new<F, Fut>(label: impl Into<Cow<'static, str>>, operation: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
    {
        let operation: Arc<OperationFn<I, O, E>> =
            Arc::new(move |input| operation(input).boxed());
        let (state, _) = watch::channel(OperationState::default());
        Self {
            label: label.into(),
            operation,
            shared: Arc::new(TrackerShared {
                generation: AtomicU64::new(0),
                state,
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> OperationState<O> {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationState<O>> {
        self.shared.state.subscribe()
    }

    /// Marks the tracker as loading before returning, then runs the operation
    /// when the returned future is polled.
    ///
    /// The caller always receives this invocation's own outcome, even when a
    /// newer `execute` or a `reset` means it is not recorded in the state.
    pub fn execute(&self, input: I) -> impl Future<Output = Result<O, E>> + Send + 'static {
        let generation = self.shared.claim();
        debug!(operation = %self.label, generation, "tracker: execute started");

        let pending = (self.operation)(input);
        let mut guard = PendingSettlement {
            shared: Arc::clone(&self.shared),
            label: self.label.clone(),
            generation,
            settled: false,
        };

        async move {
            let outcome = pending.await;
            guard.settled = true;
            guard.shared.settle(&guard.label, guard.generation, &outcome);
            outcome
        }
    }

    /// Back to the initial state; any settlement still in flight is ignored.
    pub fn reset(&self) {
        self.shared.reset();
        debug!(operation = %self.label, "tracker: reset");
    }
}

#[cfg(test)]
#[path = "tests/tracker_tests.rs"]
mod tests;
