//! Event handling and Resource folding for the catalog feature.

use std::sync::Arc;

use spin::Mutex;

use super::{CatalogConfig, CatalogRepository, GuardPolicy, Item, ItemDetail};
use crate::{resource, Scope, TaskHandle, UdfLogic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    LoadList,
    LoadDetail { id: u32 },
}

/// Fetches that have started and not yet settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InFlight {
    pub list: bool,
    /// Id of the detail being fetched.
    pub detail: Option<u32>,
}

impl InFlight {
    pub fn any(&self) -> bool {
        self.list || self.detail.is_some()
    }
}

/// Snapshot of the catalog screens.
///
/// `is_loading` is true exactly while some fetch is in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub items: Vec<Item>,
    pub detail: Option<ItemDetail>,
    pub is_loading: bool,
    pub in_flight: InFlight,
}

impl CatalogState {
    fn with_in_flight(self, in_flight: InFlight) -> Self {
        CatalogState {
            is_loading: in_flight.any(),
            in_flight,
            ..self
        }
    }

    fn list_requested(&self) -> Self {
        let in_flight = InFlight {
            list: true,
            ..self.in_flight
        };
        self.clone().with_in_flight(in_flight)
    }

    fn list_settled(&self, items: Vec<Item>) -> Self {
        let in_flight = InFlight {
            list: false,
            ..self.in_flight
        };
        CatalogState {
            items,
            ..self.clone()
        }
        .with_in_flight(in_flight)
    }

    fn detail_requested(&self, id: u32) -> Self {
        let in_flight = InFlight {
            detail: Some(id),
            ..self.in_flight
        };
        // A different item's page must not show while this one loads.
        let detail = self.detail.clone().filter(|detail| detail.id() == id);
        CatalogState {
            detail,
            ..self.clone()
        }
        .with_in_flight(in_flight)
    }

    fn detail_settled(&self, id: u32, detail: Option<ItemDetail>) -> Self {
        let in_flight = InFlight {
            detail: self.in_flight.detail.filter(|pending| *pending != id),
            ..self.in_flight
        };
        CatalogState {
            detail,
            ..self.clone()
        }
        .with_in_flight(in_flight)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEffect {
    ShowError(String),
}

enum Admission {
    Start,
    Suppress,
    Supersede { previous: u32 },
}

impl GuardPolicy {
    fn admits_list(self, state: &CatalogState) -> bool {
        match self {
            GuardPolicy::InFlight => state.items.is_empty() && !state.in_flight.list,
            GuardPolicy::PresenceOfData => state.items.is_empty(),
        }
    }

    fn admit_detail(self, state: &CatalogState, id: u32) -> Admission {
        match self {
            GuardPolicy::PresenceOfData if state.detail.is_some() => Admission::Suppress,
            GuardPolicy::PresenceOfData => Admission::Start,
            GuardPolicy::InFlight => match state.in_flight.detail {
                Some(pending) if pending == id => Admission::Suppress,
                Some(previous) => Admission::Supersede { previous },
                None if state.detail.as_ref().map(ItemDetail::id) == Some(id) => {
                    Admission::Suppress
                }
                None => Admission::Start,
            },
        }
    }
}

/// Catalog feature logic: list and detail loading with duplicate guards.
pub struct CatalogLogic {
    repository: Arc<dyn CatalogRepository>,
    guard_policy: GuardPolicy,
    fallback_error_message: Arc<str>,
    detail_task: Mutex<Option<TaskHandle>>,
}

impl CatalogLogic {
    pub fn new(repository: Arc<dyn CatalogRepository>, config: &CatalogConfig) -> Self {
        Self {
            repository,
            guard_policy: config.guard_policy,
            fallback_error_message: Arc::from(config.fallback_error_message.as_str()),
            detail_task: Mutex::new(None),
        }
    }

    fn load_list(&self, scope: &Scope<CatalogState, CatalogEffect>) {
        scope.set_state(CatalogState::list_requested);
        let sequence = self.repository.fetch_list();
        let fallback = Arc::clone(&self.fallback_error_message);
        let fold = scope.clone();

        scope.launch(async move {
            match resource::settle(sequence).await.unwrap_or(Err(None)) {
                Ok(items) => {
                    tracing::info!(count = items.len(), "list loaded");
                    fold.set_state(move |state| state.list_settled(items));
                }
                Err(message) => {
                    let message = error_text(message, &fallback);
                    tracing::warn!(%message, "list load failed");
                    fold.set_state_and_effect(
                        |state| state.list_settled(Vec::new()),
                        CatalogEffect::ShowError(message),
                    );
                }
            }
        });
    }

    fn load_detail(&self, id: u32, scope: &Scope<CatalogState, CatalogEffect>) {
        scope.set_state(move |state| state.detail_requested(id));
        let sequence = self.repository.fetch_detail(id);
        let fallback = Arc::clone(&self.fallback_error_message);
        let policy = self.guard_policy;
        let fold = scope.clone();

        let task = scope.launch(async move {
            let outcome = resource::settle(sequence).await.unwrap_or(Err(None));
            fold.try_commit(move |state| {
                // A superseded fetch must not overwrite the newer request.
                if policy == GuardPolicy::InFlight && state.in_flight.detail != Some(id) {
                    tracing::debug!(id, "stale detail result discarded");
                    return None;
                }
                match outcome {
                    Ok(detail) => {
                        tracing::info!(id, "detail loaded");
                        Some((state.detail_settled(id, Some(detail)), None))
                    }
                    Err(message) => {
                        let message = error_text(message, &fallback);
                        tracing::warn!(id, %message, "detail load failed");
                        Some((
                            state.detail_settled(id, None),
                            Some(CatalogEffect::ShowError(message)),
                        ))
                    }
                }
            });
        });
        *self.detail_task.lock() = task;
    }
}

fn error_text(message: Option<String>, fallback: &str) -> String {
    message
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

impl UdfLogic<CatalogEvent, CatalogState, CatalogEffect> for CatalogLogic {
    fn initial_state(&self) -> CatalogState {
        CatalogState::default()
    }

    fn handle_event(&self, event: CatalogEvent, scope: &Scope<CatalogState, CatalogEffect>) {
        let state = scope.current_state();
        match event {
            CatalogEvent::LoadList => {
                if self.guard_policy.admits_list(&state) {
                    self.load_list(scope);
                } else {
                    tracing::debug!("list load suppressed");
                }
            }
            CatalogEvent::LoadDetail { id } => match self.guard_policy.admit_detail(&state, id) {
                Admission::Suppress => tracing::debug!(id, "detail load suppressed"),
                Admission::Start => self.load_detail(id, scope),
                Admission::Supersede { previous } => {
                    tracing::debug!(id, previous, "detail load supersedes the one in flight");
                    let previous_task = self.detail_task.lock().take();
                    if let Some(task) = previous_task {
                        task.abort();
                    }
                    self.load_detail(id, scope);
                }
            },
        }
    }
}
