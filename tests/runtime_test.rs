//! Runtime bridge and worker against the demo backend

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use garage_dash::app::App;
use garage_dash::controller::{
    ControllerSettings, DashboardController, Delivery, FetchRequest, RefreshSource,
};
use garage_dash::domain::{FilterState, Tab};
use garage_dash::infrastructure::runtime::run_fetch;
use garage_dash::infrastructure::{DemoGarageApi, GarageApi, RuntimeBridge, RuntimeEvent};

fn demo() -> DemoGarageApi {
    DemoGarageApi::new().with_today(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
}

fn wait_for_event(bridge: &RuntimeBridge) -> RuntimeEvent {
    bridge
        .recv_timeout(Duration::from_secs(5))
        .expect("runtime answered in time")
}

#[test]
fn bridge_round_trip_renders_dashboard() {
    let bridge = RuntimeBridge::new(Arc::new(demo()), Duration::from_secs(5)).unwrap();
    let mut controller = DashboardController::new(ControllerSettings::default());
    controller.mount(Instant::now());
    let mut app = App::new(controller, "demo backend");

    bridge.submit(app.controller.take_fetch_requests()).unwrap();
    app.apply_runtime_event(wait_for_event(&bridge));

    assert!(!app.controller.is_busy());
    assert!(!app.controller.screen().is_loading());
    let widgets = app.controller.screen().widgets.as_ref().unwrap();
    assert!(widgets.kpis.iter().all(|card| card.value != "-"));
}

#[test]
fn bridge_drops_superseded_results() {
    let api = demo().with_latency(Duration::from_millis(30));
    let bridge = RuntimeBridge::new(Arc::new(api), Duration::from_secs(5)).unwrap();
    let mut controller = DashboardController::new(ControllerSettings::default());
    controller.mount(Instant::now());

    controller.select_tab(Tab::Jobs);
    controller.select_tab(Tab::Sales);
    bridge.submit(controller.take_fetch_requests()).unwrap();

    let mut applied = Vec::new();
    for _ in 0..3 {
        let event = wait_for_event(&bridge);
        let (ticket, outcome) = event.into_response().unwrap();
        if controller.apply_response(&ticket, outcome) == Delivery::Applied {
            applied.push(ticket.tab);
        }
    }
    assert_eq!(applied, vec![Tab::Sales]);
    assert_eq!(controller.screen().tab, Tab::Sales);
    assert!(controller.tab_count(Tab::Jobs).is_none());
}

#[test]
fn bridge_reports_backend_failure() {
    let api = Arc::new(demo());
    api.set_failing(true);
    let bridge = RuntimeBridge::new(api, Duration::from_secs(5)).unwrap();
    let mut controller = DashboardController::new(ControllerSettings::default());
    controller.mount(Instant::now());

    bridge.submit(controller.take_fetch_requests()).unwrap();
    match wait_for_event(&bridge) {
        RuntimeEvent::FetchFailed { ticket, message } => {
            assert!(message.contains("unavailable"), "{message}");
            assert_eq!(
                controller.apply_response(&ticket, Err(message)),
                Delivery::Applied
            );
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(controller.screen().containers.iter().all(|c| c.state.is_failed()));
}

#[tokio::test]
async fn run_fetch_times_out() {
    let api = demo().with_latency(Duration::from_millis(500));
    let mut controller = DashboardController::new(ControllerSettings::default());
    controller.mount(Instant::now());
    let request = controller.take_fetch_requests().remove(0);

    let event = run_fetch(&api, request, Duration::from_millis(20)).await;
    assert!(matches!(event, RuntimeEvent::FetchFailed { .. }));
}

#[tokio::test]
async fn run_fetch_applies_tab_filters() {
    let api = demo();
    let mut controller = DashboardController::new(ControllerSettings::default());
    controller.mount(Instant::now());
    controller.select_tab(Tab::Jobs);
    controller.apply_filters(Tab::Jobs, FilterState::default().with_status("In Progress"));
    let request: FetchRequest = controller.take_fetch_requests().pop().unwrap();
    assert_eq!(request.source, RefreshSource::FilterChange);

    match run_fetch(&api, request, Duration::from_secs(5)).await {
        RuntimeEvent::TabReady { snapshot, .. } => {
            let statuses: Vec<_> = snapshot
                .buckets
                .values()
                .flatten()
                .filter_map(|record| record.status.as_deref())
                .collect();
            assert!(!statuses.is_empty());
            assert!(statuses.iter().all(|status| *status == "In Progress"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_fetches_keep_their_tickets() {
    let api = demo().with_latency(Duration::from_millis(10));
    let mut controller = DashboardController::new(ControllerSettings::default());
    controller.mount(Instant::now());
    for tab in [Tab::Jobs, Tab::Appointments, Tab::Inspections] {
        controller.select_tab(tab);
    }
    let requests = controller.take_fetch_requests();
    let seqs: Vec<u64> = requests.iter().map(|r| r.ticket.seq).collect();

    let events = futures::future::join_all(
        requests
            .into_iter()
            .map(|request| run_fetch(&api, request, Duration::from_secs(5))),
    )
    .await;

    let returned: Vec<u64> = events
        .into_iter()
        .filter_map(|event| event.into_response())
        .map(|(ticket, _)| ticket.seq)
        .collect();
    assert_eq!(returned, seqs);
}

#[tokio::test]
async fn demo_backend_describes_itself() {
    let api: Arc<dyn GarageApi> = Arc::new(demo());
    assert_eq!(api.describe(), "demo backend");
}
