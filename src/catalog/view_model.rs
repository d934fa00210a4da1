//! The catalog feature assembled for a UI layer.

use std::sync::Arc;

use futures::stream::BoxStream;

use super::{CatalogConfig, CatalogEffect, CatalogEvent, CatalogLogic, CatalogRepository, CatalogState};
use crate::{
    ConnectivityObserver, Dispatcher, EffectStream, Spawner, StateContainer, StateStream,
};

/// The catalog feature as the UI sees it.
///
/// Three independent observables: committed State, one-shot Effects, and
/// raw connectivity. Connectivity is never folded into State.
pub struct CatalogViewModel {
    container: StateContainer<CatalogEvent, CatalogState, CatalogEffect>,
    connectivity: Arc<dyn ConnectivityObserver>,
}

impl CatalogViewModel {
    pub fn new<Spawn>(
        repository: Arc<dyn CatalogRepository>,
        connectivity: Arc<dyn ConnectivityObserver>,
        config: &CatalogConfig,
        spawner: Spawn,
    ) -> Self
    where
        Spawn: Spawner + Send + Sync + 'static,
    {
        let logic = CatalogLogic::new(repository, config);
        tracing::debug!(guard_policy = ?config.guard_policy, "catalog view model created");
        Self {
            container: StateContainer::new(logic, spawner, &config.store),
            connectivity,
        }
    }

    pub fn dispatch(&self, event: CatalogEvent) {
        self.container.dispatch(event);
    }

    pub fn dispatcher(&self) -> Dispatcher<CatalogEvent> {
        self.container.dispatcher()
    }

    pub fn current_state(&self) -> CatalogState {
        self.container.current_state()
    }

    pub fn observe_state(&self) -> StateStream<CatalogState> {
        self.container.observe_state()
    }

    pub fn observe_effects(&self) -> EffectStream<CatalogEffect> {
        self.container.observe_effects()
    }

    /// Current reachability, then every change.
    pub fn observe_connectivity(&self) -> BoxStream<'static, bool> {
        self.connectivity.observe()
    }

    /// Tear down: cancel in-flight fetches, detach observers.
    pub fn close(&self) {
        self.container.close();
    }
}
