//! Network reachability as a live boolean stream.

use std::sync::Arc;

use flume::Sender;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use spin::Mutex;

use crate::Observation;

/// Source of the "is the network reachable" signal.
///
/// [`observe`](Self::observe) yields the current value immediately, then
/// a new value each time reachability changes. The stream never completes
/// while the source is alive and has no loading state.
pub trait ConnectivityObserver: Send + Sync {
    fn observe(&self) -> BoxStream<'static, bool>;
}

struct Reachability {
    reachable: bool,
    observers: Vec<Sender<bool>>,
}

/// Shared reachability cell fed by the platform.
///
/// The platform pushes raw values with [`set_reachable`](Self::set_reachable)
/// or [`drive`](Self::drive); repeated values are swallowed, so observers
/// only see changes.
///
/// # Example
///
/// ```rust
/// use oxide_udf::ConnectivityMonitor;
///
/// let monitor = ConnectivityMonitor::new(true);
/// let mut updates = monitor.subscribe();
///
/// monitor.set_reachable(true);
/// monitor.set_reachable(false);
///
/// assert_eq!(updates.next_ready(), Some(true));
/// assert_eq!(updates.next_ready(), Some(false));
/// assert_eq!(updates.next_ready(), None);
/// ```
#[derive(Clone)]
pub struct ConnectivityMonitor {
    shared: Arc<Mutex<Reachability>>,
}

impl ConnectivityMonitor {
    pub fn new(reachable: bool) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Reachability {
                reachable,
                observers: Vec::new(),
            })),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.shared.lock().reachable
    }

    /// Record the platform's latest reading.
    ///
    /// Returns `true` if the value changed and was published.
    pub fn set_reachable(&self, reachable: bool) -> bool {
        let mut shared = self.shared.lock();
        if shared.reachable == reachable {
            return false;
        }
        shared.reachable = reachable;
        shared
            .observers
            .retain(|observer| observer.send(reachable).is_ok());
        tracing::info!(reachable, "connectivity changed");
        true
    }

    /// The current value, then every change.
    pub fn subscribe(&self) -> Observation<bool> {
        let (sender, receiver) = flume::unbounded();
        let mut shared = self.shared.lock();
        // Cannot fail, the receiver is alive.
        let _ = sender.send(shared.reachable);
        shared.observers.push(sender);
        Observation::new(receiver)
    }

    /// Feed the monitor from a raw platform signal until it ends.
    pub async fn drive<S>(&self, source: S)
    where
        S: Stream<Item = bool>,
    {
        source
            .for_each(|reachable| {
                self.set_reachable(reachable);
                futures::future::ready(())
            })
            .await;
        tracing::debug!("connectivity source ended");
    }
}

impl ConnectivityObserver for ConnectivityMonitor {
    fn observe(&self) -> BoxStream<'static, bool> {
        self.subscribe().boxed()
    }
}
