//! A unidirectional data flow (UDF) state container for Rust.
//!
//! Events flow in through a [`Dispatcher`], feature logic turns them into
//! State commits and one-shot Effects through a [`Scope`], and the UI
//! observes both as streams. Asynchronous work reports progress with the
//! [`Resource`] protocol (`Loading`, then `Success` or `Error`) and is
//! folded back into State by tasks bound to the container's lifetime.
//!
//! - State is replaced, never mutated in place, and every commit is
//!   published to all observers in one total order
//!   ([`StateContainer::observe_state`] replays the latest State).
//! - Effects are live-only: [`StateContainer::observe_effects`] never
//!   replays past ones.
//! - Dropping or closing the container cancels its tasks; nothing is
//!   observable afterwards.
//!
//! The [`catalog`] module builds a complete feature on top: list and
//! detail loading with duplicate-load guards, error effects, and a
//! connectivity stream exposed next to State.
//!
//! ## Example
//!
//! ```rust
//! use futures::future::BoxFuture;
//! use futures::StreamExt;
//! use oxide_udf::{Scope, StateContainer, StoreConfig, UdfLogic};
//!
//! enum Event { Increment }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct State { count: i32 }
//!
//! #[derive(Clone, Debug)]
//! enum Effect { Overflowed }
//!
//! struct Counter;
//!
//! impl UdfLogic<Event, State, Effect> for Counter {
//!     fn initial_state(&self) -> State {
//!         State { count: 0 }
//!     }
//!
//!     fn handle_event(&self, event: Event, scope: &Scope<State, Effect>) {
//!         match event {
//!             Event::Increment if scope.current_state().count == i32::MAX => {
//!                 scope.set_effect(Effect::Overflowed);
//!             }
//!             Event::Increment => {
//!                 scope.set_state(|state| State { count: state.count + 1 });
//!             }
//!         }
//!     }
//! }
//!
//! // Any executor works; here every task gets its own thread.
//! let spawner = |task: BoxFuture<'static, ()>| {
//!     std::thread::spawn(move || futures::executor::block_on(task));
//! };
//!
//! let container = StateContainer::new(Counter, spawner, &StoreConfig::default());
//! let mut states = container.observe_state();
//! container.dispatch(Event::Increment);
//!
//! futures::executor::block_on(async {
//!     assert_eq!(states.next().await, Some(State { count: 0 }));
//!     assert_eq!(states.next().await, Some(State { count: 1 }));
//! });
//! ```

// Module declarations
pub mod catalog;
mod config;
mod connectivity;
mod dispatcher;
mod logic;
mod observation;
pub mod resource;
mod runtime;
mod scope;

// Public re-exports
pub use config::{ConfigError, StoreConfig};
pub use connectivity::{ConnectivityMonitor, ConnectivityObserver};
pub use dispatcher::Dispatcher;
pub use logic::UdfLogic;
pub use observation::{EffectStream, Observation, StateStream};
pub use resource::{Resource, ResourceStream};
pub use runtime::{Spawner, StateContainer};
pub use scope::{Scope, TaskHandle};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use runtime::{create_test_spawner, TestStateContainer};
