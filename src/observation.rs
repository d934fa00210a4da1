//! Observer-side streams for State and Effects.

use core::pin::Pin;
use core::task::{Context, Poll};

use flume::r#async::RecvStream;
use flume::Receiver;
use futures::{Stream, StreamExt};

/// A stream of values pushed by a container or monitor to one observer.
///
/// Obtained from [`StateContainer::observe_state`](crate::StateContainer::observe_state),
/// [`StateContainer::observe_effects`](crate::StateContainer::observe_effects) or
/// [`ConnectivityMonitor::subscribe`](crate::ConnectivityMonitor::subscribe).
/// Dropping it detaches the observer.
pub struct Observation<T: 'static> {
    receiver: Receiver<T>,
    stream: RecvStream<'static, T>,
}

/// Replay-latest-then-live stream of committed states.
pub type StateStream<State> = Observation<State>;

/// Live-only stream of one-shot effects.
pub type EffectStream<Effect> = Observation<Effect>;

impl<T: 'static> Observation<T> {
    pub(crate) fn new(receiver: Receiver<T>) -> Self {
        let stream = receiver.clone().into_stream();
        Self { receiver, stream }
    }

    /// Take the next value if one is already queued, without waiting.
    pub fn next_ready(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// `true` once the producing side has gone away and nothing is queued.
    pub fn is_finished(&self) -> bool {
        self.receiver.is_disconnected() && self.receiver.is_empty()
    }
}

#[cfg(any(test, feature = "testing"))]
impl<T: 'static> Observation<T> {
    /// Take every value that is already queued.
    ///
    /// Only available with the `testing` feature. Useful with
    /// [`TestStateContainer`](crate::TestStateContainer), where all work
    /// completes synchronously.
    pub fn drain_ready(&mut self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T: 'static> Stream for Observation<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.stream.poll_next_unpin(cx)
    }
}
