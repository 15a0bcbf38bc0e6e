//! # Booking Flow Core
//!
//! Core traits and types for the booking-flow reducer architecture.
//!
//! The booking workflow is modeled as unidirectional data flow:
//!
//! - **State**: the accumulated draft and wizard position
//! - **Action**: every input the workflow can receive (user events and
//!   effect feedback)
//! - **Reducer**: pure function `(State, Action, Environment) → Effects`
//! - **Effect**: a description of deferred async work (not its execution)
//! - **Environment**: injected dependencies behind traits
//!
//! Reducers run synchronously and own all business logic; the runtime crate
//! executes the effects they return and feeds produced actions back in.

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

/// The core trait for business logic.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Effects returned from a single reduce call.
    ///
    /// Most actions produce zero or one effect; four slots keep the common
    /// case off the heap.
    pub type Effects<Action> = SmallVec<[Effect<Action>; 4]>;

    /// The Reducer trait - core abstraction for business logic.
    ///
    /// A reducer validates the incoming action, updates state in place, and
    /// returns descriptions of any side effects to run. It never performs
    /// I/O itself; everything external arrives through `Environment`.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Effects<Self::Action>;
    }
}

/// Side effect descriptions.
pub mod effect {
    use futures::future::BoxFuture;
    use std::future::Future;

    /// Describes a side effect to be executed by the store runtime.
    ///
    /// Effects are values, not execution: a reducer returns them and the
    /// runtime drives them on the async runtime. A completed effect may
    /// produce a follow-up action that is fed back into the reducer.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation.
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back
        /// into the reducer.
        Future(BoxFuture<'static, Option<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Wraps a future into a `Future` effect.
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Whether this effect is the no-op.
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }

    // Manual Debug implementation since the boxed future has none
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}

/// Dependency injection traits.
///
/// All external dependencies are abstracted behind traits and injected via
/// the reducer's Environment parameter, which keeps every reducer fully
/// testable with fixed fakes.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Abstracts time so reducers never read the wall clock directly.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// A small string key-value store.
    ///
    /// The abuse-mitigation counters persist through this seam. Implementors
    /// must treat read and write failures as degraded service: `get` returns
    /// `None` and `set`/`delete` drop the write, logging internally, so a
    /// broken backing store can never fail a booking.
    pub trait KeyValueStore: Send + Sync {
        /// Read the value stored under `key`, if any.
        fn get(&self, key: &str) -> Option<String>;

        /// Store `value` under `key`, replacing any previous value.
        fn set(&self, key: &str, value: &str);

        /// Remove the value stored under `key`, if any.
        fn delete(&self, key: &str);
    }
}
