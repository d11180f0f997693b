//! # Todolist Runtime
//!
//! Runtime implementation for the todolist reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer and executes effects
//! - **Feedback loop**: Actions produced by effects are queued and reduced
//!   before `send` returns
//!
//! Everything runs synchronously on the caller's thread. There is exactly one
//! writer, so the store needs no locking: `send` takes `&mut self`.
//!
//! ## Example
//!
//! ```ignore
//! use todolist_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use std::collections::VecDeque;
use todolist_core::{effect::Effect, reducer::Reducer};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept feeding actions back past the configured limit
        ///
        /// State reflects every action reduced before the limit was hit.
        #[error("Effect feedback exceeded {0} actions")]
        FeedbackLimitExceeded(usize),
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use todolist_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_feedback_actions(8);
/// assert_eq!(config.max_feedback_actions, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of effect-produced actions reduced per `send`
    pub max_feedback_actions: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_feedback_actions: usize) -> Self {
        Self {
            max_feedback_actions,
        }
    }

    /// Set the feedback action limit
    #[must_use]
    pub const fn with_max_feedback_actions(mut self, limit: usize) -> Self {
        self.max_feedback_actions = limit;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_actions: 32,
        }
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{Effect, Reducer, StoreConfig, StoreError, VecDeque};

    /// The Store - runtime coordinator for a reducer
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut store = Store::new(
    ///     TodoState::default(),
    ///     TodoReducer::new(),
    ///     environment,
    /// );
    ///
    /// store.send(TodoAction::Hydrate)?;
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub const fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                config,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Calls reducer with (state, action, environment)
        /// 2. Executes returned effects in order
        /// 3. Reduces any actions the effects produced (feedback loop)
        ///
        /// Returns the total number of actions reduced, including the one sent.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] if effects produce more
        /// than `max_feedback_actions` follow-up actions.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<usize, StoreError> {
            tracing::debug!("Processing action");

            let mut queue = VecDeque::from([action]);
            let mut reduced = 0_usize;

            while let Some(action) = queue.pop_front() {
                if reduced > self.config.max_feedback_actions {
                    tracing::error!(
                        limit = self.config.max_feedback_actions,
                        "Effect feedback limit exceeded, dropping remaining actions"
                    );
                    return Err(StoreError::FeedbackLimitExceeded(
                        self.config.max_feedback_actions,
                    ));
                }

                let effects = {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();
                    self.reducer.reduce(&mut self.state, action, &self.environment)
                };
                reduced += 1;

                tracing::trace!("Executing {} effects", effects.len());
                for effect in effects {
                    Self::execute_effect(effect, &mut queue);
                }
            }

            tracing::debug!(reduced, "Action processing completed");
            Ok(reduced)
        }

        /// Execute a single effect, queueing any action it produces
        fn execute_effect(effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Run(task) => {
                    tracing::trace!("Executing Effect::Run");
                    if let Some(action) = task() {
                        tracing::trace!("Effect::Run produced an action, queueing feedback");
                        queue.push_back(action);
                    }
                },
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.todos.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Borrow the injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Borrow the store configuration
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// Consume the store and return its state
        #[must_use]
        pub fn into_state(self) -> S {
            self.state
        }
    }
}

pub use store::Store;
