//! Event intake handle for a state container.

use flume::Sender;

/// Cloneable handle that feeds events into a container.
///
/// Hand clones of this to UI callbacks so they can raise events without
/// holding the container itself.
///
/// `Dispatcher` wraps an unbounded lock-free channel sender, so
/// [`dispatch`](Self::dispatch) never blocks and never fails. Events sent
/// after the container has been torn down are dropped.
///
/// # Example
///
/// ```rust
/// use oxide_udf::{Dispatcher, Scope, StateContainer, StoreConfig, UdfLogic};
/// use futures::future::BoxFuture;
///
/// enum Event { Refresh }
///
/// struct Ignore;
///
/// impl UdfLogic<Event, (), ()> for Ignore {
///     fn initial_state(&self) {}
///     fn handle_event(&self, _event: Event, _scope: &Scope<(), ()>) {}
/// }
///
/// let container = StateContainer::new(Ignore, |_task: BoxFuture<'static, ()>| {}, &StoreConfig::default());
/// let dispatcher: Dispatcher<Event> = container.dispatcher();
/// let on_pull_to_refresh = move || dispatcher.dispatch(Event::Refresh);
/// on_pull_to_refresh();
/// ```
pub struct Dispatcher<Event>(pub(crate) Sender<Event>);

impl<Event> Clone for Dispatcher<Event> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Event> Dispatcher<Event> {
    pub(crate) fn new(sender: Sender<Event>) -> Self {
        Self(sender)
    }

    /// Queue an event for handling.
    ///
    /// Safe to call concurrently from any thread.
    pub fn dispatch(&self, event: Event) {
        if self.0.send(event).is_err() {
            tracing::trace!("event dispatched after teardown was dropped");
        }
    }
}
