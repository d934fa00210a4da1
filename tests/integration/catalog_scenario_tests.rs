use mockall::predicate::eq;
use oxide_udf::catalog::{
    CatalogConfig, CatalogEffect, CatalogEvent, CatalogState, InFlight, Item, ItemDetail,
    MockCatalogRepository,
};
use oxide_udf::Resource;

use super::{catalog_container, scripted};

fn loaded_list() -> Vec<Item> {
    vec![Item::new(1, "X")]
}

#[test]
fn given_a_fresh_container_should_start_empty_and_idle() {
    let container = catalog_container(MockCatalogRepository::new(), &CatalogConfig::default());

    let state = container.current_state();

    assert!(state.items.is_empty());
    assert_eq!(state.detail, None);
    assert!(!state.is_loading);
}

#[test]
fn given_a_successful_list_fetch_should_commit_loading_then_items() {
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_list()
        .times(1)
        .returning(|| scripted(vec![Resource::Loading, Resource::Success(loaded_list())]));
    let mut container = catalog_container(repository, &CatalogConfig::default());
    let mut states = container.observe_state();

    container.dispatch(CatalogEvent::LoadList);
    container.process_events();

    let observed = states.drain_ready();
    assert_eq!(observed.len(), 3);
    assert_eq!(observed[0], CatalogState::default());
    assert!(observed[1].is_loading);
    assert!(observed[1].items.is_empty());
    assert!(!observed[2].is_loading);
    assert_eq!(observed[2].items, loaded_list());
    assert_eq!(observed[2].in_flight, InFlight::default());
}

#[test]
fn given_an_empty_successful_list_should_commit_an_empty_list_without_effect() {
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_list()
        .returning(|| scripted(vec![Resource::Loading, Resource::Success(Vec::new())]));
    let mut container = catalog_container(repository, &CatalogConfig::default());
    let mut effects = container.observe_effects();

    container.dispatch(CatalogEvent::LoadList);
    container.process_events();

    assert!(container.current_state().items.is_empty());
    assert!(!container.current_state().is_loading);
    assert!(effects.drain_ready().is_empty());
}

#[test]
fn given_a_failed_detail_fetch_should_clear_detail_and_show_the_error_once() {
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_detail()
        .with(eq(42))
        .times(1)
        .returning(|_| scripted(vec![Resource::Loading, Resource::error("network down")]));
    let mut container = catalog_container(repository, &CatalogConfig::default());
    let mut effects = container.observe_effects();

    container.dispatch(CatalogEvent::LoadDetail { id: 42 });
    container.process_events();

    let state = container.current_state();
    assert_eq!(state.detail, None);
    assert!(!state.is_loading);
    assert_eq!(
        effects.drain_ready(),
        vec![CatalogEffect::ShowError("network down".to_string())]
    );
}

#[test]
fn given_a_failed_list_fetch_should_empty_the_list_and_show_the_error_once() {
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_list()
        .times(1)
        .returning(|| scripted(vec![Resource::Loading, Resource::error("503 Service Unavailable")]));
    let mut container = catalog_container(repository, &CatalogConfig::default());
    let mut effects = container.observe_effects();

    container.dispatch(CatalogEvent::LoadList);
    container.process_events();

    assert!(container.current_state().items.is_empty());
    assert!(!container.current_state().is_loading);
    assert_eq!(
        effects.drain_ready(),
        vec![CatalogEffect::ShowError("503 Service Unavailable".to_string())]
    );
}

#[test]
fn given_an_error_without_message_should_show_the_fallback_text() {
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_list()
        .returning(|| scripted(vec![Resource::Loading, Resource::Error(None)]));
    repository
        .expect_fetch_detail()
        .returning(|_| scripted(vec![Resource::Loading, Resource::error("")]));
    let mut container = catalog_container(repository, &CatalogConfig::default());
    let mut effects = container.observe_effects();

    container.dispatch(CatalogEvent::LoadList);
    container.dispatch(CatalogEvent::LoadDetail { id: 3 });
    container.process_events();

    let fallback = CatalogEffect::ShowError("Something went wrong".to_string());
    assert_eq!(effects.drain_ready(), vec![fallback.clone(), fallback]);
}

#[test]
fn given_a_configured_fallback_should_use_it() {
    let config = CatalogConfig {
        fallback_error_message: "Try again later".to_string(),
        ..CatalogConfig::default()
    };
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_list()
        .returning(|| scripted(vec![Resource::Loading, Resource::Error(None)]));
    let mut container = catalog_container(repository, &config);
    let mut effects = container.observe_effects();

    container.dispatch(CatalogEvent::LoadList);
    container.process_events();

    assert_eq!(
        effects.drain_ready(),
        vec![CatalogEffect::ShowError("Try again later".to_string())]
    );
}

#[test]
fn given_a_sequence_without_terminal_value_should_settle_as_an_error() {
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_list()
        .returning(|| scripted(vec![Resource::Loading]));
    let mut container = catalog_container(repository, &CatalogConfig::default());
    let mut effects = container.observe_effects();

    container.dispatch(CatalogEvent::LoadList);
    container.process_events();

    assert!(!container.current_state().is_loading);
    assert_eq!(
        effects.drain_ready(),
        vec![CatalogEffect::ShowError("Something went wrong".to_string())]
    );
}

#[test]
fn given_a_successful_detail_fetch_should_install_the_detail() {
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_detail()
        .with(eq(7))
        .returning(|id| {
            scripted(vec![
                Resource::Loading,
                Resource::Success(ItemDetail::new(Item::new(id, "Seven"))),
            ])
        });
    let mut container = catalog_container(repository, &CatalogConfig::default());
    let mut states = container.observe_state();

    container.dispatch(CatalogEvent::LoadDetail { id: 7 });
    container.process_events();

    let observed = states.drain_ready();
    assert_eq!(observed[1].in_flight.detail, Some(7));
    assert!(observed[1].is_loading);
    let last = observed.last().unwrap();
    assert_eq!(last.detail.as_ref().map(ItemDetail::id), Some(7));
    assert!(!last.is_loading);
}
