//! The single-writer State slot and the handle event handlers work through.

use core::future::Future;
use std::sync::Arc;

use flume::{Sender, TrySendError};
use futures::future::{AbortHandle, Abortable};
use spin::Mutex;

use crate::{EffectStream, Observation, Spawner, StateStream};

/// Everything observers can see, guarded by one lock so that State
/// commits and Effect emissions share a single total order.
struct Slot<State, Effect> {
    state: State,
    revision: u64,
    state_observers: Vec<Sender<State>>,
    effect_observers: Vec<Sender<Effect>>,
    closed: bool,
}

impl<State, Effect: Clone> Slot<State, Effect> {
    fn deliver(&mut self, effect: Effect) {
        let revision = self.revision;
        self.effect_observers
            .retain(|observer| match observer.try_send(effect.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(revision, "effect observer queue full, effect dropped");
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            });
    }
}

struct Tasks {
    next_id: u64,
    running: Vec<(u64, AbortHandle)>,
    closed: bool,
}

/// Handle to a task started with [`Scope::launch`].
#[derive(Clone, Debug)]
pub struct TaskHandle {
    id: u64,
    abort: AbortHandle,
}

impl TaskHandle {
    /// Cancel the task at its next suspension point.
    pub fn abort(&self) {
        tracing::trace!(task = self.id, "task abort requested");
        self.abort.abort();
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// The container-side handle given to [`UdfLogic::handle_event`](crate::UdfLogic::handle_event).
///
/// A `Scope` reads and commits State, emits Effects, and launches tasks
/// bound to the container's lifetime. It is cheap to clone; move clones
/// into launched futures to fold asynchronous results back into State.
///
/// Every commit runs the given reducer against the current State and
/// installs the result atomically. Once the container is torn down every
/// commit, emission and launch is rejected, so nothing becomes
/// observable after teardown.
///
/// Reducers run while the slot is locked and must not call back into the
/// scope.
pub struct Scope<State, Effect> {
    slot: Arc<Mutex<Slot<State, Effect>>>,
    tasks: Arc<Mutex<Tasks>>,
    spawner: Arc<dyn Spawner + Send + Sync>,
    effect_capacity: usize,
}

impl<State, Effect> Clone for Scope<State, Effect> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            tasks: Arc::clone(&self.tasks),
            spawner: Arc::clone(&self.spawner),
            effect_capacity: self.effect_capacity,
        }
    }
}

impl<State, Effect> Scope<State, Effect>
where
    State: Clone + Send + 'static,
    Effect: Clone + Send + 'static,
{
    pub(crate) fn new(
        initial_state: State,
        spawner: Arc<dyn Spawner + Send + Sync>,
        effect_capacity: usize,
    ) -> Self {
        Scope {
            slot: Arc::new(Mutex::new(Slot {
                state: initial_state,
                revision: 0,
                state_observers: Vec::new(),
                effect_observers: Vec::new(),
                closed: false,
            })),
            tasks: Arc::new(Mutex::new(Tasks {
                next_id: 0,
                running: Vec::new(),
                closed: false,
            })),
            spawner,
            effect_capacity: effect_capacity.max(1),
        }
    }

    /// The latest committed State.
    pub fn current_state(&self) -> State {
        self.slot.lock().state.clone()
    }

    /// Number of commits since construction.
    pub fn revision(&self) -> u64 {
        self.slot.lock().revision
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }

    /// Commit `reducer(&current)` as the new State.
    ///
    /// Returns `false` if the container has been torn down.
    pub fn set_state<F>(&self, reducer: F) -> bool
    where
        F: FnOnce(&State) -> State,
    {
        self.try_commit(|state| Some((reducer(state), None)))
    }

    /// Commit a new State and emit `effect` right after it, as one step.
    ///
    /// Observers that read State after receiving the effect see the
    /// State it belongs to.
    pub fn set_state_and_effect<F>(&self, reducer: F, effect: Effect) -> bool
    where
        F: FnOnce(&State) -> State,
    {
        self.try_commit(move |state| Some((reducer(state), Some(effect))))
    }

    /// Emit a one-shot effect to the observers attached right now.
    pub fn set_effect(&self, effect: Effect) -> bool {
        let mut slot = self.slot.lock();
        if slot.closed {
            tracing::trace!("effect emitted after teardown was dropped");
            return false;
        }
        slot.deliver(effect);
        true
    }

    /// Commit conditionally.
    ///
    /// `reducer` returns `None` to leave State untouched (nothing is
    /// broadcast), or the new State with an optional effect to emit after
    /// it. Returns `true` only if a commit happened.
    pub fn try_commit<F>(&self, reducer: F) -> bool
    where
        F: FnOnce(&State) -> Option<(State, Option<Effect>)>,
    {
        let mut slot = self.slot.lock();
        if slot.closed {
            tracing::trace!("commit after teardown was dropped");
            return false;
        }

        let Some((next, effect)) = reducer(&slot.state) else {
            return false;
        };

        slot.state = next;
        slot.revision += 1;

        let snapshot = slot.state.clone();
        slot.state_observers
            .retain(|observer| observer.send(snapshot.clone()).is_ok());
        tracing::trace!(
            revision = slot.revision,
            observers = slot.state_observers.len(),
            "state committed"
        );

        if let Some(effect) = effect {
            slot.deliver(effect);
        }
        true
    }

    /// Observe State: the current snapshot, then every commit in order.
    pub fn observe_state(&self) -> StateStream<State> {
        let (sender, receiver) = flume::unbounded();
        let mut slot = self.slot.lock();
        // Cannot fail, the receiver is alive.
        let _ = sender.send(slot.state.clone());
        if !slot.closed {
            slot.state_observers.push(sender);
        }
        Observation::new(receiver)
    }

    /// Observe effects emitted from now on.
    pub fn observe_effects(&self) -> EffectStream<Effect> {
        let (sender, receiver) = flume::bounded(self.effect_capacity);
        let mut slot = self.slot.lock();
        if !slot.closed {
            slot.effect_observers.push(sender);
        }
        Observation::new(receiver)
    }

    /// Run `future` on the container's spawner, bound to its lifetime.
    ///
    /// Returns `None` without spawning if the container has been torn down.
    pub fn launch<F>(&self, future: F) -> Option<TaskHandle>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (abort, registration) = AbortHandle::new_pair();
        let id = {
            let mut tasks = self.tasks.lock();
            if tasks.closed {
                tracing::trace!("launch after teardown was dropped");
                return None;
            }
            let id = tasks.next_id;
            tasks.next_id += 1;
            tasks.running.push((id, abort.clone()));
            id
        };

        let tasks = Arc::clone(&self.tasks);
        let task = async move {
            if Abortable::new(future, registration).await.is_err() {
                tracing::trace!(task = id, "task aborted");
            }
            tasks.lock().running.retain(|(running, _)| *running != id);
        };
        self.spawner.spawn(Box::pin(task));

        Some(TaskHandle { id, abort })
    }

    /// Number of launched tasks that have not finished yet.
    pub fn running_tasks(&self) -> usize {
        self.tasks.lock().running.len()
    }

    /// Tear down: reject further work, detach observers, cancel tasks.
    ///
    /// Idempotent.
    pub(crate) fn close(&self) {
        {
            let mut slot = self.slot.lock();
            if slot.closed {
                return;
            }
            slot.closed = true;
            slot.state_observers.clear();
            slot.effect_observers.clear();
        }

        let running = {
            let mut tasks = self.tasks.lock();
            tasks.closed = true;
            core::mem::take(&mut tasks.running)
        };
        tracing::debug!(cancelled = running.len(), "container torn down");
        for (_, abort) in running {
            abort.abort();
        }
    }
}
