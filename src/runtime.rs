//! The state container that owns State and runs the event loop.

use std::sync::Arc;

use flume::Receiver;
use futures::future::BoxFuture;

use crate::{Dispatcher, EffectStream, Scope, StateStream, StoreConfig, UdfLogic};

/// A spawner trait for executing futures on an async runtime.
///
/// This abstraction allows you to use whatever concurrency model you want
/// (tokio, async-std, a thread pool, ...). The container runs its event
/// loop and every launched task through it, so it must execute futures
/// concurrently with the caller.
///
/// Function pointers and closures automatically implement this trait via the blanket implementation.
pub trait Spawner {
    /// Spawn a future on the async runtime.
    fn spawn(&self, future: BoxFuture<'static, ()>);
}

/// Implement Spawner for any callable type that matches the signature.
///
/// This includes function pointers, closures, and function items.
impl<F> Spawner for F
where
    F: Fn(BoxFuture<'static, ()>),
{
    fn spawn(&self, future: BoxFuture<'static, ()>) {
        self(future)
    }
}

/// The authoritative owner of one feature's State.
///
/// This is the core of the framework. It:
/// 1. Installs the initial State from [`UdfLogic::initial_state`]
/// 2. Queues dispatched events on an unbounded channel
/// 3. Hands each event, in order, to [`UdfLogic::handle_event`] on its event loop
/// 4. Publishes every commit to State observers and every effect to Effect observers
///
/// Dropping the container (or calling [`close`](Self::close)) tears it
/// down: in-flight tasks are cancelled and nothing is committed or emitted
/// afterwards.
///
/// For testing with manual control, use [`TestStateContainer`].
///
/// See the [crate-level documentation](crate) for a complete example.
///
/// # Type Parameters
///
/// * `Event` - The event type of the feature
/// * `State` - The state snapshot type of the feature
/// * `Effect` - The one-shot effect type of the feature
pub struct StateContainer<Event, State, Effect>
where
    State: Clone + Send + 'static,
    Effect: Clone + Send + 'static,
{
    scope: Scope<State, Effect>,
    dispatcher: Dispatcher<Event>,
}

impl<Event, State, Effect> StateContainer<Event, State, Effect>
where
    Event: Send + 'static,
    State: Clone + Send + 'static,
    Effect: Clone + Send + 'static,
{
    /// Create a container and start its event loop on `spawner`.
    ///
    /// # Arguments
    ///
    /// * `logic` - Feature logic implementing UdfLogic
    /// * `spawner` - Spawner to execute the event loop and launched tasks
    /// * `config` - Container tuning
    pub fn new<Logic, Spawn>(logic: Logic, spawner: Spawn, config: &StoreConfig) -> Self
    where
        Logic: UdfLogic<Event, State, Effect> + Send + 'static,
        Spawn: Spawner + Send + Sync + 'static,
    {
        let (event_sender, event_receiver) = flume::unbounded();
        let scope = Scope::new(
            logic.initial_state(),
            Arc::new(spawner),
            config.effect_capacity,
        );

        let loop_scope = scope.clone();
        scope.launch(event_loop(logic, event_receiver, loop_scope));

        StateContainer {
            scope,
            dispatcher: Dispatcher::new(event_sender),
        }
    }

    /// Queue an event. Never blocks, never fails.
    pub fn dispatch(&self, event: Event) {
        self.dispatcher.dispatch(event);
    }

    /// A cloneable handle for dispatching from callbacks.
    pub fn dispatcher(&self) -> Dispatcher<Event> {
        self.dispatcher.clone()
    }

    /// The latest committed State.
    pub fn current_state(&self) -> State {
        self.scope.current_state()
    }

    /// The current State, then every subsequent commit in commit order.
    ///
    /// The stream completes only after teardown.
    pub fn observe_state(&self) -> StateStream<State> {
        self.scope.observe_state()
    }

    /// Effects emitted after this call. Never replayed.
    pub fn observe_effects(&self) -> EffectStream<Effect> {
        self.scope.observe_effects()
    }

    /// Tear the container down. Idempotent.
    pub fn close(&self) {
        self.scope.close();
    }

    pub fn is_closed(&self) -> bool {
        self.scope.is_closed()
    }
}

impl<Event, State, Effect> Drop for StateContainer<Event, State, Effect>
where
    State: Clone + Send + 'static,
    Effect: Clone + Send + 'static,
{
    fn drop(&mut self) {
        self.scope.close();
    }
}

async fn event_loop<Event, State, Effect, Logic>(
    logic: Logic,
    events: Receiver<Event>,
    scope: Scope<State, Effect>,
) where
    State: Clone + Send + 'static,
    Effect: Clone + Send + 'static,
    Logic: UdfLogic<Event, State, Effect>,
{
    while let Ok(event) = events.recv_async().await {
        // Abort only lands at a suspension point; queued events never suspend.
        if scope.is_closed() {
            break;
        }
        logic.handle_event(event, &scope);
    }
    tracing::trace!("event loop finished");
}

#[cfg(any(test, feature = "testing"))]
/// Test spawner function that executes futures synchronously.
///
/// This blocks on the future immediately rather than spawning it on an async runtime.
pub fn test_spawner_fn(fut: BoxFuture<'static, ()>) {
    // Execute the future synchronously for deterministic testing
    futures::executor::block_on(fut);
}

#[cfg(any(test, feature = "testing"))]
/// Creates a test spawner that executes futures synchronously.
///
/// This is useful for testing - it blocks on the future immediately rather
/// than spawning it on an async runtime. Use this with [`TestStateContainer`]
/// and repositories whose sequences complete without outside help.
///
/// Returns a function pointer that can be passed directly to container constructors
/// without heap allocation.
pub fn create_test_spawner() -> fn(BoxFuture<'static, ()>) {
    test_spawner_fn
}

#[cfg(any(test, feature = "testing"))]
/// Test container with manual event processing control.
///
/// Only available with the `testing` feature or during tests.
///
/// Unlike [`StateContainer`], this container has no event loop. Dispatched
/// events wait in the queue until [`process_events`](Self::process_events)
/// is called, which handles them on the calling thread. Combined with
/// [`create_test_spawner`], every launched task also completes before
/// `process_events` returns.
///
/// ```rust
/// use oxide_udf::{create_test_spawner, Scope, StoreConfig, TestStateContainer, UdfLogic};
///
/// enum Event { Increment }
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct State { count: i32 }
///
/// struct Counter;
///
/// impl UdfLogic<Event, State, ()> for Counter {
///     fn initial_state(&self) -> State { State { count: 0 } }
///     fn handle_event(&self, _event: Event, scope: &Scope<State, ()>) {
///         scope.set_state(|state| State { count: state.count + 1 });
///     }
/// }
///
/// let mut container = TestStateContainer::new(Counter, create_test_spawner(), &StoreConfig::default());
/// container.dispatch(Event::Increment);
/// assert_eq!(container.current_state().count, 0);
///
/// container.process_events();
/// assert_eq!(container.current_state().count, 1);
/// ```
pub struct TestStateContainer<Event, State, Effect, Logic>
where
    State: Clone + Send + 'static,
    Effect: Clone + Send + 'static,
{
    logic: Logic,
    scope: Scope<State, Effect>,
    event_receiver: Receiver<Event>,
    dispatcher: Dispatcher<Event>,
}

#[cfg(any(test, feature = "testing"))]
impl<Event, State, Effect, Logic> TestStateContainer<Event, State, Effect, Logic>
where
    Event: Send + 'static,
    State: Clone + Send + 'static,
    Effect: Clone + Send + 'static,
    Logic: UdfLogic<Event, State, Effect>,
{
    /// Create a new test container.
    ///
    /// # Arguments
    ///
    /// * `logic` - Feature logic implementing UdfLogic
    /// * `spawner` - Spawner for tasks launched by the logic
    /// * `config` - Container tuning
    pub fn new<Spawn>(logic: Logic, spawner: Spawn, config: &StoreConfig) -> Self
    where
        Spawn: Spawner + Send + Sync + 'static,
    {
        let (event_sender, event_receiver) = flume::unbounded();
        let scope = Scope::new(
            logic.initial_state(),
            Arc::new(spawner),
            config.effect_capacity,
        );

        TestStateContainer {
            logic,
            scope,
            event_receiver,
            dispatcher: Dispatcher::new(event_sender),
        }
    }

    /// Process all queued events.
    ///
    /// This processes events until the queue is empty, including events
    /// dispatched while processing. Nothing is handled after teardown.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            if self.scope.is_closed() {
                break;
            }
            self.logic.handle_event(event, &self.scope);
        }
    }

    pub fn dispatch(&self, event: Event) {
        self.dispatcher.dispatch(event);
    }

    pub fn dispatcher(&self) -> Dispatcher<Event> {
        self.dispatcher.clone()
    }

    pub fn current_state(&self) -> State {
        self.scope.current_state()
    }

    pub fn observe_state(&self) -> StateStream<State> {
        self.scope.observe_state()
    }

    pub fn observe_effects(&self) -> EffectStream<Effect> {
        self.scope.observe_effects()
    }

    /// The scope handed to the logic, for direct inspection in tests.
    pub fn scope(&self) -> &Scope<State, Effect> {
        &self.scope
    }

    pub fn close(&self) {
        self.scope.close();
    }
}
