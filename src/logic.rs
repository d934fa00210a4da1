//! Feature logic trait defining the UDF contract.

use crate::Scope;

/// Feature logic trait defining the UDF contract.
///
/// Implementations provide two functions:
/// - [`initial_state`](Self::initial_state): the State that exists before any event
/// - [`handle_event`](Self::handle_event): decide what an event means and
///   commit State, emit Effects, or launch work through the [`Scope`]
///
/// Events are handled one at a time, in dispatch order, on the container's
/// event loop. Work that suspends (network I/O, waiting on a
/// [`ResourceStream`](crate::ResourceStream)) belongs in a task started
/// with [`Scope::launch`], which folds its results back through the same
/// scope.
///
/// See the [crate-level documentation](crate) for a complete example.
pub trait UdfLogic<Event, State, Effect> {
    /// The State installed at container construction.
    fn initial_state(&self) -> State;

    /// Handle one event.
    ///
    /// This must not block; it never returns an error. Failures are
    /// expressed as State changes or Effects.
    ///
    /// # Arguments
    ///
    /// * `event` - The event to handle
    /// * `scope` - Access to the current State, commits, effects and tasks
    fn handle_event(&self, event: Event, scope: &Scope<State, Effect>);
}
