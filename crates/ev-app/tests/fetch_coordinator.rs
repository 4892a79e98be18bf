mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{FakeBackend, fixed_now};
use ev_app::{
    ChartKind, DashboardSession, FetchCoordinator, FetchOutput, FetchRequest, QueryKind,
};
use ev_config::DashboardConfig;
use ev_core::CityId;
use ev_store::Action;

const WAIT: Duration = Duration::from_secs(5);

fn slow_dublin() -> Arc<FakeBackend> {
    let mut backend = FakeBackend::irish();
    backend
        .delays
        .insert("dublin".to_string(), Duration::from_millis(300));
    Arc::new(backend)
}

fn markers_for(city: &str) -> FetchRequest {
    FetchRequest::MarkersByCity {
        city: CityId::from(city),
        at: fixed_now(),
    }
}

#[test]
fn superseded_marker_response_never_reaches_store() {
    let backend = slow_dublin();
    let mut coordinator = FetchCoordinator::new(Arc::clone(&backend));
    let mut session =
        DashboardSession::with_clock(Arc::clone(&backend), &DashboardConfig::default(), fixed_now)
            .unwrap();

    let first = coordinator.issue(markers_for("dublin"));
    session.dispatch(Action::SelectLocation(CityId::from("cork")));
    let second = coordinator.issue(markers_for("cork"));

    assert!(first.is_cancelled());
    assert!(second.generation > first.generation);

    let done = coordinator.wait_all(WAIT);
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].signature, second.signature);
    for completion in done {
        session.apply(completion);
    }

    // let the slow dublin worker finish; nothing of it may surface
    thread::sleep(Duration::from_millis(500));
    assert!(coordinator.drain().is_empty());

    let ids: Vec<&str> = session
        .state()
        .markers
        .iter()
        .map(|m| m.info.id.as_str())
        .collect();
    assert_eq!(ids, vec!["c1"]);
}

#[test]
fn identical_request_is_reused() {
    let backend = slow_dublin();
    let mut coordinator = FetchCoordinator::new(backend);

    let a = coordinator.issue(markers_for("dublin"));
    let b = coordinator.issue(markers_for("dublin"));
    assert_eq!(a.generation, b.generation);
    assert_eq!(coordinator.pending(), 1);

    let done = coordinator.wait_all(WAIT);
    assert_eq!(done.len(), 1);
    assert_eq!(coordinator.pending(), 0);
}

#[test]
fn different_kinds_do_not_supersede_each_other() {
    let backend = Arc::new(FakeBackend::irish());
    let mut coordinator = FetchCoordinator::new(backend);
    let session = DashboardSession::with_clock(
        Arc::new(FakeBackend::irish()),
        &DashboardConfig::default(),
        fixed_now,
    )
    .unwrap();

    coordinator.issue(session.chart_request(ChartKind::GridEnergy));
    coordinator.issue(session.chart_request(ChartKind::CityEnergy));
    coordinator.issue(FetchRequest::Locations);
    assert_eq!(coordinator.pending(), 3);

    let done = coordinator.wait_all(WAIT);
    assert_eq!(done.len(), 3);
    assert!(done.iter().all(|c| c.result.is_ok()));
    assert!(done.iter().any(|c| c.signature.kind == QueryKind::Locations));
    assert_eq!(coordinator.dropped(), 0);
}

#[test]
fn cancelled_request_yields_nothing() {
    let backend = slow_dublin();
    let mut coordinator = FetchCoordinator::new(backend);
    let ticket = coordinator.issue(markers_for("dublin"));
    coordinator.cancel(QueryKind::Markers);

    assert!(ticket.is_cancelled());
    assert!(coordinator.wait(Duration::from_millis(10)).is_none());
    thread::sleep(Duration::from_millis(500));
    assert!(coordinator.drain().is_empty());
}

#[test]
fn failed_fetch_is_applied_as_notification() {
    let backend = Arc::new(FakeBackend {
        failing: true,
        ..FakeBackend::irish()
    });
    let mut coordinator = FetchCoordinator::new(Arc::clone(&backend));
    let mut session =
        DashboardSession::with_clock(backend, &DashboardConfig::default(), fixed_now).unwrap();

    coordinator.issue(session.marker_request().unwrap());
    let completion = coordinator.wait(WAIT).unwrap();
    assert!(!matches!(completion.result, Ok(FetchOutput::Markers(_))));
    assert!(session.apply(completion).is_none());
    assert_eq!(
        session.state().notifications.latest().unwrap().message,
        "backend exploded"
    );
}
