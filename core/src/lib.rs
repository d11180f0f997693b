//! # Todolist Core
//!
//! Core traits and types for the todolist reducer architecture.
//!
//! This crate provides the abstractions the rest of the workspace is built on:
//! a pure reducer that turns `(State, Action, Environment)` into state changes
//! plus effect descriptions, and the storage seam those effects write through.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (user intents and internal events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```ignore
//! use todolist_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = CounterEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         env: &CounterEnvironment,
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         state.count += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Key-value persistence seam used by effects
pub mod storage;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime. They are
/// values returned from reducers; the reducer itself never performs I/O.
pub mod effect {
    /// Boxed synchronous computation that may feed an action back to the reducer
    pub type Task<Action> = Box<dyn FnOnce() -> Option<Action> + Send>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime, in order, on the
    /// caller's thread.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary synchronous computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Run(Task<Action>),
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Run(_) => write!(f, "Effect::Run(<task>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a closure as a [`Effect::Run`]
        #[must_use]
        pub fn run<F>(task: F) -> Self
        where
            F: FnOnce() -> Option<Action> + Send + 'static,
        {
            Effect::Run(Box::new(task))
        }

        /// Returns true if executing this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}
