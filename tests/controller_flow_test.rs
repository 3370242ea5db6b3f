//! Controller flows driven end to end without a terminal or a backend

use std::time::{Duration, Instant};

use garage_dash::controller::{
    ControllerSettings, DashboardController, Delivery, FetchQuery, FetchRequest, Payload,
    RefreshSource, DEFAULT_REFRESH_INTERVAL,
};
use garage_dash::domain::{
    DashboardSnapshot, FilterPolicy, FilterState, Kpis, SummaryRecord, Tab, TabSnapshot,
};
use garage_dash::view::dashboard::{KPI_UNKNOWN, RECENTLY_CLOSED};
use garage_dash::view::Panel;

fn mounted(policy: FilterPolicy) -> (DashboardController, Instant) {
    let mut controller = DashboardController::new(ControllerSettings {
        policy,
        ..ControllerSettings::default()
    });
    let now = Instant::now();
    controller.mount(now);
    (controller, now)
}

fn single(controller: &mut DashboardController) -> FetchRequest {
    let mut requests = controller.take_fetch_requests();
    assert_eq!(requests.len(), 1, "expected exactly one fetch: {requests:?}");
    requests.remove(0)
}

fn empty_dashboard() -> Result<Payload, String> {
    Ok(Payload::Dashboard(DashboardSnapshot::default()))
}

fn jobs_snapshot() -> TabSnapshot {
    TabSnapshot::default().with_bucket(
        "active",
        vec![SummaryRecord {
            name: "JC-0001".to_string(),
            customer: Some("C-001".to_string()),
            vehicle: Some("V-001".to_string()),
            status: Some("In Progress".to_string()),
            ..SummaryRecord::default()
        }],
    )
}

#[test]
fn mount_renders_shell_and_fetches_dashboard() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    let request = single(&mut controller);

    assert_eq!(request.source, RefreshSource::Initial);
    assert_eq!(request.query, FetchQuery::Dashboard { company: None });
    assert_eq!(controller.active_tab(), Tab::Dashboard);
    assert!(controller.screen().is_loading());
    assert!(controller.is_busy());
    assert!(controller.timer().is_armed());
}

#[test]
fn only_the_latest_tab_selection_renders() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    controller.take_fetch_requests();

    controller.select_tab(Tab::Jobs);
    let jobs = single(&mut controller);
    controller.select_tab(Tab::Appointments);
    let appointments = single(&mut controller);

    // Jobs answers last but was superseded
    let appointments_snapshot = TabSnapshot::default()
        .with_bucket("today", vec![SummaryRecord::named("SA-0001")]);
    assert_eq!(
        controller.apply_response(&appointments.ticket, Ok(Payload::Tab(appointments_snapshot))),
        Delivery::Applied
    );
    assert_eq!(
        controller.apply_response(&jobs.ticket, Ok(Payload::Tab(jobs_snapshot()))),
        Delivery::Stale
    );

    assert_eq!(controller.screen().tab, Tab::Appointments);
    assert_eq!(controller.screen().containers[0].rows()[0].title, "SA-0001");
    assert_eq!(controller.tab_count(Tab::Jobs), None);
}

#[test]
fn dashboard_round_trip_only_renders_final_response() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    let first = single(&mut controller);

    controller.select_tab(Tab::Sales);
    let sales = single(&mut controller);
    controller.select_tab(Tab::Dashboard);
    let last = single(&mut controller);

    let stale_snapshot = DashboardSnapshot {
        recently_closed_jobs: vec![SummaryRecord::named("JC-OLD")],
        ..DashboardSnapshot::default()
    };
    assert_eq!(
        controller.apply_response(&first.ticket, Ok(Payload::Dashboard(stale_snapshot))),
        Delivery::Stale
    );
    assert_eq!(
        controller.apply_response(&sales.ticket, Ok(Payload::Tab(TabSnapshot::default()))),
        Delivery::Stale
    );
    assert!(controller.screen().is_loading());

    let fresh = DashboardSnapshot {
        recently_closed_jobs: vec![SummaryRecord::named("JC-NEW")],
        ..DashboardSnapshot::default()
    };
    assert_eq!(
        controller.apply_response(&last.ticket, Ok(Payload::Dashboard(fresh))),
        Delivery::Applied
    );
    let closed = controller.screen().container(RECENTLY_CLOSED).unwrap();
    assert_eq!(closed.rows().len(), 1);
    assert_eq!(closed.rows()[0].title, "JC-NEW");
}

#[test]
fn empty_buckets_show_placeholders_on_every_tab() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    let request = single(&mut controller);
    controller.apply_response(&request.ticket, empty_dashboard());
    for container in &controller.screen().containers {
        assert_eq!(container.state, Panel::Empty(container.placeholder));
    }

    for tab in [Tab::Jobs, Tab::Appointments, Tab::Inspections, Tab::Sales] {
        controller.select_tab(tab);
        let request = single(&mut controller);
        controller.apply_response(&request.ticket, Ok(Payload::Tab(TabSnapshot::default())));
        let screen = controller.screen();
        assert_eq!(screen.containers.len(), tab.buckets().len(), "{tab}");
        for container in &screen.containers {
            assert_eq!(container.state, Panel::Empty(container.placeholder), "{tab}");
        }
        assert_eq!(controller.tab_count(tab), Some(0));
    }
}

#[test]
fn filters_on_hidden_tab_are_stored_without_fetching() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    controller.take_fetch_requests();

    let jobs_filters = FilterState::default().with_status("Draft");
    controller.apply_filters(Tab::Jobs, jobs_filters.clone());
    assert!(controller.take_fetch_requests().is_empty());
    assert_eq!(controller.filters(Tab::Jobs), &jobs_filters);

    controller.select_tab(Tab::Jobs);
    let request = single(&mut controller);
    assert_eq!(
        request.query,
        FetchQuery::Tab {
            tab: Tab::Jobs,
            filters: jobs_filters,
            company: None,
        }
    );
}

#[test]
fn filters_on_active_tab_fetch_once() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    controller.select_tab(Tab::Inspections);
    controller.take_fetch_requests();

    let filters = FilterState::default()
        .with_job_card("no")
        .with_dates("2025-01-01", "2025-01-31");
    controller.apply_filters(Tab::Inspections, filters.clone());
    let request = single(&mut controller);

    assert_eq!(request.source, RefreshSource::FilterChange);
    assert_eq!(request.ticket.filters, filters);
    let bar = controller.screen().filter_bar.as_ref().unwrap();
    assert!(bar.fields.iter().any(|(_, value)| value == "no"));
}

#[test]
fn filter_change_makes_in_flight_result_stale() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    controller.select_tab(Tab::Jobs);
    let before = single(&mut controller);

    controller.apply_filters(Tab::Jobs, FilterState::default().with_status("Closed"));
    let after = single(&mut controller);

    assert_eq!(
        controller.apply_response(&before.ticket, Ok(Payload::Tab(jobs_snapshot()))),
        Delivery::Stale
    );
    assert_eq!(
        controller.apply_response(&after.ticket, Ok(Payload::Tab(TabSnapshot::default()))),
        Delivery::Applied
    );
}

#[test]
fn jobs_tab_renders_rows_and_badge() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    controller.take_fetch_requests();
    controller.select_tab(Tab::Jobs);
    let superseded = single(&mut controller);
    controller.apply_filters(Tab::Jobs, FilterState::default().with_status("In Progress"));
    let request = single(&mut controller);
    assert_eq!(request.source, RefreshSource::FilterChange);
    assert_eq!(request.ticket.filters.status, "In Progress");

    let snapshot = jobs_snapshot().with_count("active", 1).with_count("pending", 0);
    assert_eq!(
        controller.apply_response(&superseded.ticket, Ok(Payload::Tab(snapshot.clone()))),
        Delivery::Stale
    );
    assert_eq!(
        controller.apply_response(&request.ticket, Ok(Payload::Tab(snapshot))),
        Delivery::Applied
    );

    let active = controller.screen().container("active").unwrap();
    let row = &active.rows()[0];
    assert_eq!(row.title, "JC-0001");
    assert_eq!(row.subtext, "C-001 V-001");
    assert_eq!(row.badge.as_deref(), Some("In Progress"));
    assert_eq!(row.target.as_ref().unwrap().route(), "/app/job-card/JC-0001");
    assert_eq!(controller.tab_count(Tab::Jobs), Some(1));
    assert!(!controller.is_busy());
}

#[test]
fn null_kpis_show_dash_on_every_card() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    let request = single(&mut controller);

    let snapshot = DashboardSnapshot::from_value(&serde_json::json!({ "kpis": null }));
    controller.apply_response(&request.ticket, Ok(Payload::Dashboard(snapshot)));

    let widgets = controller.screen().widgets.as_ref().unwrap();
    assert_eq!(widgets.kpis.len(), 4);
    assert!(widgets.kpis.iter().all(|card| card.value == KPI_UNKNOWN));
}

#[test]
fn huge_task_counts_render_without_overflow() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    let request = single(&mut controller);

    let snapshot = DashboardSnapshot::from_value(&serde_json::json!({
        "today_completed_tasks": { "completed": 1e18, "total": 1e18 },
        "daily_jobs_chart": [
            { "date": "2025-03-13", "count": 1e19 },
            { "date": "2025-03-14", "count": 1e19 }
        ],
        "job_status_summary": [{ "status": "Draft", "count": 1e19 }]
    }));
    let delivery = controller.apply_response(&request.ticket, Ok(Payload::Dashboard(snapshot)));
    assert_eq!(delivery, Delivery::Applied);

    let widgets = controller.screen().widgets.as_ref().unwrap();
    assert_eq!(
        widgets.tasks,
        Panel::Ready((1_000_000_000_000_000_000, 1_000_000_000_000_000_000, 100))
    );
}

#[test]
fn kpis_render_when_present() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    let request = single(&mut controller);

    let snapshot = DashboardSnapshot {
        kpis: Some(Kpis {
            jobs_in_progress: 3,
            ..Kpis::default()
        }),
        ..DashboardSnapshot::default()
    };
    controller.apply_response(&request.ticket, Ok(Payload::Dashboard(snapshot)));
    let widgets = controller.screen().widgets.as_ref().unwrap();
    assert_eq!(widgets.kpis[0].value, "3");
}

#[test]
fn failure_marks_panels_and_keeps_timer() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    let request = single(&mut controller);

    let delivery =
        controller.apply_response(&request.ticket, Err("connection refused".to_string()));
    assert_eq!(delivery, Delivery::Applied);
    assert!(controller.screen().containers.iter().all(|c| c.state.is_failed()));
    assert_eq!(controller.last_error(), Some("connection refused"));
    assert!(controller.timer().is_armed());
    assert!(!controller.is_busy());

    controller.refresh(RefreshSource::Manual);
    let retry = single(&mut controller);
    controller.apply_response(&retry.ticket, Ok(Payload::Dashboard(DashboardSnapshot::default())));
    assert_eq!(controller.last_error(), None);
}

#[test]
fn timer_refreshes_active_tab_every_period() {
    let (mut controller, start) = mounted(FilterPolicy::Persist);
    controller.select_tab(Tab::Sales);
    controller.take_fetch_requests();

    assert!(!controller.poll_timer(start + Duration::from_secs(119)));
    assert!(controller.take_fetch_requests().is_empty());

    assert!(controller.poll_timer(start + DEFAULT_REFRESH_INTERVAL));
    let request = single(&mut controller);
    assert_eq!(request.source, RefreshSource::Timer);
    assert_eq!(request.ticket.tab, Tab::Sales);

    assert!(!controller.poll_timer(start + DEFAULT_REFRESH_INTERVAL + Duration::from_secs(1)));
    assert!(controller.poll_timer(start + DEFAULT_REFRESH_INTERVAL * 2));
}

#[test]
fn timer_refresh_keeps_rendered_rows_until_response() {
    let (mut controller, start) = mounted(FilterPolicy::Persist);
    controller.select_tab(Tab::Jobs);
    let request = single(&mut controller);
    controller.apply_response(&request.ticket, Ok(Payload::Tab(jobs_snapshot())));

    controller.poll_timer(start + DEFAULT_REFRESH_INTERVAL);
    single(&mut controller);
    assert!(!controller.is_busy());
    assert_eq!(controller.screen().container("active").unwrap().rows().len(), 1);
}

#[test]
fn nothing_happens_after_dispose() {
    let (mut controller, start) = mounted(FilterPolicy::Persist);
    let pending = single(&mut controller);

    controller.dispose();
    assert!(!controller.timer().is_armed());
    assert!(!controller.poll_timer(start + DEFAULT_REFRESH_INTERVAL * 3));
    controller.select_tab(Tab::Jobs);
    controller.refresh(RefreshSource::Manual);
    assert!(controller.take_fetch_requests().is_empty());

    assert_eq!(
        controller.apply_response(&pending.ticket, empty_dashboard()),
        Delivery::Stale
    );
    assert!(controller.screen().is_loading());
}

#[test]
fn persist_policy_keeps_filters_across_tabs() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    controller.select_tab(Tab::Jobs);
    controller.apply_filters(Tab::Jobs, FilterState::default().with_status("Draft"));
    controller.select_tab(Tab::Sales);
    controller.select_tab(Tab::Jobs);
    assert_eq!(controller.filters(Tab::Jobs).status, "Draft");
}

#[test]
fn reset_policy_clears_filters_on_switch() {
    let (mut controller, _) = mounted(FilterPolicy::ResetOnSwitch);
    controller.select_tab(Tab::Jobs);
    controller.apply_filters(Tab::Jobs, FilterState::default().with_status("Draft"));
    controller.select_tab(Tab::Sales);
    controller.take_fetch_requests();

    controller.select_tab(Tab::Jobs);
    let request = single(&mut controller);
    assert!(controller.filters(Tab::Jobs).is_empty());
    assert!(request.ticket.filters.is_empty());
}

#[test]
fn company_change_refetches_and_scopes_queries() {
    let (mut controller, _) = mounted(FilterPolicy::Persist);
    let before = single(&mut controller);

    controller.set_company(Some("  Main Garage ".to_string()));
    let request = single(&mut controller);
    assert_eq!(controller.company(), Some("Main Garage"));
    assert_eq!(
        request.query,
        FetchQuery::Dashboard {
            company: Some("Main Garage".to_string())
        }
    );
    assert_eq!(
        controller.apply_response(&before.ticket, empty_dashboard()),
        Delivery::Stale
    );

    controller.set_company(Some(String::new()));
    assert_eq!(controller.company(), None);
}
