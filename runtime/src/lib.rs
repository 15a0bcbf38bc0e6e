//! # Booking Flow Runtime
//!
//! The `Store` runtime for the booking-flow reducer architecture.
//!
//! The store owns state behind an async lock, runs the reducer synchronously
//! for each incoming action, and executes the returned effects as spawned
//! tasks. Actions produced by completed effects are fed back into the
//! reducer, closing the loop:
//!
//! ```text
//! action ─► reducer ─► state change + effects
//!    ▲                        │
//!    └──── feedback action ◄──┘ (spawned)
//! ```
//!
//! Reducers complete before `send` returns; only effect execution is
//! concurrent. Callers that need effect results applied (a test, or a CLI
//! about to read final state) use [`Store::drain`] to wait for in-flight
//! effects to settle.

use booking_flow_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

pub use error::StoreError;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("store is shutting down")]
        ShutdownInProgress,

        /// Waiting for in-flight effects timed out
        #[error("timed out with {0} effects still running")]
        DrainTimeout(usize),
    }
}

struct Inner<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: RwLock<S>,
    reducer: R,
    environment: E,
    shutdown: AtomicBool,
    pending_effects: AtomicUsize,
}

/// The store runtime: state + reducer + environment.
///
/// # Example
///
/// ```ignore
/// let store = Store::new(BookingState::default(), BookingReducer, environment);
/// store.send(BookingAction::Open).await?;
/// let step = store.state(|s| s.step).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    inner: Arc<Inner<S, A, E, R>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
                pending_effects: AtomicUsize::new(0),
            }),
        }
    }

    /// Send an action to the store.
    ///
    /// Acquires the state write lock, runs the reducer, then starts
    /// execution of the returned effects. Returns once the reducer has
    /// finished; effects complete in the background.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if [`Store::shutdown`]
    /// was already initiated.
    pub async fn send(&self, action: A) -> Result<(), StoreError> {
        if self.inner.shutdown.load(Ordering::Acquire) {
            return Err(StoreError::ShutdownInProgress);
        }
        Self::dispatch(Arc::clone(&self.inner), action).await;
        Ok(())
    }

    /// Read a projection of the current state.
    pub async fn state<F, T>(&self, read: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.inner.state.read().await;
        read(&state)
    }

    /// Number of effects currently in flight.
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.inner.pending_effects.load(Ordering::Acquire)
    }

    /// Wait until all in-flight effects (and the feedback actions they
    /// produce) have settled.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DrainTimeout`] if effects are still running
    /// when `timeout` expires.
    pub async fn drain(&self, timeout: Duration) -> Result<(), StoreError> {
        let start = tokio::time::Instant::now();
        let poll_interval = Duration::from_millis(10);

        loop {
            let pending = self.inner.pending_effects.load(Ordering::Acquire);
            if pending == 0 {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                tracing::warn!(pending, "drain timed out with effects still running");
                return Err(StoreError::DrainTimeout(pending));
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Initiate graceful shutdown: reject new actions, then drain.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DrainTimeout`] if in-flight effects do not
    /// settle within `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::debug!("initiating store shutdown");
        self.inner.shutdown.store(true, Ordering::Release);
        self.drain(timeout).await
    }

    async fn dispatch(inner: Arc<Inner<S, A, E, R>>, action: A) {
        let effects = {
            let mut state = inner.state.write().await;
            inner.reducer.reduce(&mut state, action, &inner.environment)
        };

        for effect in effects {
            Self::execute(Arc::clone(&inner), effect);
        }
    }

    fn execute(inner: Arc<Inner<S, A, E, R>>, effect: Effect<A>) {
        match effect {
            Effect::None => {}
            Effect::Future(fut) => {
                inner.pending_effects.fetch_add(1, Ordering::AcqRel);
                tokio::spawn(async move {
                    if let Some(action) = fut.await {
                        tracing::trace!("effect produced a feedback action");
                        Self::dispatch(Arc::clone(&inner), action).await;
                    }
                    inner.pending_effects.fetch_sub(1, Ordering::AcqRel);
                });
            }
        }
    }
}
