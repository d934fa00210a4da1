use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::StreamExt;
use oxide_udf::catalog::{
    CatalogConfig, CatalogEffect, CatalogEvent, CatalogLogic, CatalogViewModel, GuardPolicy, Item,
    MockCatalogRepository,
};
use oxide_udf::{ConnectivityMonitor, Resource, StateContainer, StoreConfig};

use super::{init_tracing, scripted, MockMilestoneDependency, TestEvent, TestLogic};

fn tokio_spawner(task: BoxFuture<'static, ()>) {
    tokio::spawn(task);
}

fn thread_spawner(task: BoxFuture<'static, ()>) {
    std::thread::spawn(move || futures::executor::block_on(task));
}

fn view_model(repository: MockCatalogRepository, monitor: &ConnectivityMonitor) -> CatalogViewModel {
    init_tracing();
    CatalogViewModel::new(
        Arc::new(repository),
        Arc::new(monitor.clone()),
        &CatalogConfig::default(),
        tokio_spawner,
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_teardown_mid_fetch_should_not_commit_the_late_result() {
    let (sender, receiver) = flume::unbounded();
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_list()
        .times(1)
        .returning(move || receiver.clone().into_stream().boxed());
    let view_model = view_model(repository, &ConnectivityMonitor::new(true));
    let mut states = view_model.observe_state();
    let mut effects = view_model.observe_effects();

    assert!(!states.next().await.unwrap().is_loading);
    view_model.dispatch(CatalogEvent::LoadList);
    sender.send(Resource::Loading).unwrap();
    assert!(states.next().await.unwrap().is_loading);

    view_model.close();
    let _ = sender.send(Resource::Success(vec![Item::new(1, "X")]));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = view_model.current_state();
    assert!(state.is_loading);
    assert!(state.items.is_empty());
    assert_eq!(states.next().await, None);
    assert_eq!(effects.next().await, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_an_error_effect_should_observe_the_terminal_state_after_it() {
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_detail()
        .returning(|_| scripted(vec![Resource::Loading, Resource::error("network down")]));
    let view_model = view_model(repository, &ConnectivityMonitor::new(true));
    let mut effects = view_model.observe_effects();

    view_model.dispatch(CatalogEvent::LoadDetail { id: 42 });

    let effect = tokio::time::timeout(Duration::from_secs(5), effects.next())
        .await
        .unwrap();
    assert_eq!(effect, Some(CatalogEffect::ShowError("network down".to_string())));
    let state = view_model.current_state();
    assert_eq!(state.detail, None);
    assert!(!state.is_loading);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_a_successful_list_should_stream_loading_then_items() {
    let mut repository = MockCatalogRepository::new();
    repository
        .expect_fetch_list()
        .times(1)
        .returning(|| scripted(vec![Resource::Loading, Resource::Success(vec![Item::new(1, "X")])]));
    let view_model = view_model(repository, &ConnectivityMonitor::new(true));
    let states = view_model.observe_state();

    view_model.dispatch(CatalogEvent::LoadList);

    let observed: Vec<_> = tokio::time::timeout(Duration::from_secs(5), states.take(3).collect())
        .await
        .unwrap();
    assert!(!observed[0].is_loading);
    assert!(observed[1].is_loading);
    assert_eq!(observed[2].items, vec![Item::new(1, "X")]);
    assert!(!observed[2].is_loading);
}

#[tokio::test]
async fn given_connectivity_changes_should_stream_current_value_then_changes() {
    let monitor = ConnectivityMonitor::new(false);
    let view_model = view_model(MockCatalogRepository::new(), &monitor);
    let mut connectivity = view_model.observe_connectivity();

    assert_eq!(connectivity.next().await, Some(false));

    monitor.set_reachable(true);
    monitor.set_reachable(true);
    monitor.set_reachable(false);

    assert_eq!(connectivity.next().await, Some(true));
    assert_eq!(connectivity.next().await, Some(false));
    assert!(view_model.current_state().items.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_dispatchers_should_observe_a_single_commit_order() {
    init_tracing();
    let mut milestones = MockMilestoneDependency::new();
    milestones.expect_is_milestone().returning(|_| false);
    let container = StateContainer::new(
        TestLogic {
            milestones: Box::new(milestones),
        },
        tokio_spawner,
        &StoreConfig::default(),
    );
    let states = container.observe_state();

    let mut dispatchers = Vec::new();
    for _ in 0..4 {
        let dispatcher = container.dispatcher();
        dispatchers.push(std::thread::spawn(move || {
            for _ in 0..25 {
                dispatcher.dispatch(TestEvent::IncrementLater);
            }
        }));
    }
    for dispatcher in dispatchers {
        dispatcher.join().unwrap();
    }

    let counts: Vec<i32> = tokio::time::timeout(
        Duration::from_secs(5),
        states.map(|state| state.count).take(101).collect(),
    )
    .await
    .unwrap();
    assert_eq!(counts, (0..=100).collect::<Vec<_>>());
}

#[test]
fn given_queued_loads_when_closed_mid_handler_should_not_call_the_repository_again() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let (entered_sender, entered) = flume::unbounded();
    let (release, released) = flume::unbounded::<()>();
    let mut repository = MockCatalogRepository::new();
    let counted = Arc::clone(&calls);
    repository.expect_fetch_list().returning(move || {
        if counted.fetch_add(1, Ordering::SeqCst) == 0 {
            let _ = entered_sender.send(());
            let _ = released.recv();
        }
        scripted(vec![Resource::Loading, Resource::Success(Vec::new())])
    });
    let config = CatalogConfig {
        guard_policy: GuardPolicy::PresenceOfData,
        ..CatalogConfig::default()
    };
    let container = StateContainer::new(
        CatalogLogic::new(Arc::new(repository), &config),
        thread_spawner,
        &config.store,
    );

    for _ in 0..6 {
        container.dispatch(CatalogEvent::LoadList);
    }
    entered.recv_timeout(Duration::from_secs(5)).unwrap();
    container.close();
    release.send(()).unwrap();
    std::thread::sleep(Duration::from_millis(100));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(container.current_state().items.is_empty());
}
