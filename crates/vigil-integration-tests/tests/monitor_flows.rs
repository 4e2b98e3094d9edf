//! # Campaign 2: Monitoring Sweeps Across the Stack
//!
//! Drives the interval monitor over a real service, store, and calendar:
//! mixed-tier sweeps, notifier failure containment, and escalation through
//! repeated ticks.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};

use vigil_calendar::{HolidayCalendar, WorkingDayCalculator};
use vigil_core::{CaseId, Clock, FixedClock};
use vigil_engine::{
    CaseRegistration, ComplianceStatus, EnforcementConfig, MemoryStore, Notifier,
    RecordingNotifier, TimelineEnforcementService, TimelineEventKind,
};
use vigil_monitor::{ComplianceMonitor, MonitorConfig};

struct Stack {
    monitor: ComplianceMonitor,
    service: Arc<TimelineEnforcementService>,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<FixedClock>,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn make_stack(start: NaiveDate) -> Stack {
    let clock = Arc::new(FixedClock::at(
        Utc.from_utc_datetime(&start.and_hms_opt(9, 0, 0).unwrap()),
    ));
    let notifier = Arc::new(RecordingNotifier::new());
    let service = Arc::new(TimelineEnforcementService::new(
        Arc::new(MemoryStore::new()),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        WorkingDayCalculator::new(Arc::new(HolidayCalendar::netherlands())),
        EnforcementConfig::default(),
    ));
    let monitor = ComplianceMonitor::new(Arc::clone(&service), MonitorConfig::default());
    Stack {
        monitor,
        service,
        notifier,
        clock,
    }
}

fn set_day(stack: &Stack, day: NaiveDate) {
    stack
        .clock
        .set(Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).unwrap()));
}

fn register(stack: &Stack, trigger: NaiveDate) -> CaseId {
    let case_id = CaseId::new();
    stack
        .service
        .initialize_compliance(case_id.clone(), trigger, CaseRegistration::default())
        .unwrap();
    case_id
}

// =========================================================================
// Mixed-tier sweep
// =========================================================================

#[test]
fn one_sweep_handles_every_tier_at_once() {
    let stack = make_stack(date(2026, 1, 5));
    // Deadlines: 13 Jan for the Monday trigger, 14 Jan for the Tuesday one.
    let monday_case = register(&stack, date(2026, 1, 5));
    let tuesday_case = register(&stack, date(2026, 1, 6));

    // On the 13th the Monday case is breached (0 days) and the Tuesday
    // case is at risk (1 day).
    set_day(&stack, date(2026, 1, 13));
    let summary = stack.monitor.run_tick();

    assert_eq!(summary.evaluated, 2);
    assert_eq!(summary.emergencies_triggered, 1);
    assert_eq!(summary.failures, 0);
    // Emergency audience of five plus at-risk audience of three.
    assert_eq!(summary.alerts_dispatched, 8);

    let breached = stack.service.assess(&monday_case).unwrap();
    assert_eq!(breached.status(), ComplianceStatus::Emergency);
    assert!(breached.context.emergency_protocol_active);

    let at_risk = stack.service.assess(&tuesday_case).unwrap();
    assert_eq!(at_risk.status(), ComplianceStatus::AtRisk);
    assert!(!at_risk.context.emergency_protocol_active);
}

// =========================================================================
// Notifier failure containment
// =========================================================================

#[test]
fn failing_notifier_does_not_fail_the_sweep() {
    let stack = make_stack(date(2026, 1, 5));
    register(&stack, date(2026, 1, 5));
    register(&stack, date(2026, 1, 5));

    stack.notifier.set_failing(Some("smtp relay offline".to_string()));
    set_day(&stack, date(2026, 1, 12));
    let summary = stack.monitor.run_tick();

    // Every case still completed its evaluation; no delivery landed.
    assert_eq!(summary.evaluated, 2);
    assert_eq!(summary.failures, 0);
    assert_eq!(summary.alerts_dispatched, 0);
    assert_eq!(stack.notifier.delivery_count(), 0);

    // Alerts were still recorded on the audit trail.
    for case_id in stack.service.open_case_ids().unwrap() {
        let issued = stack
            .service
            .timeline(&case_id)
            .unwrap()
            .into_iter()
            .filter(|e| e.kind == TimelineEventKind::AlertIssued)
            .count();
        assert_eq!(issued, 1);
    }
}

// =========================================================================
// Escalation through repeated ticks
// =========================================================================

#[test]
fn repeated_ticks_walk_a_case_up_the_ladder() {
    let stack = make_stack(date(2026, 1, 5));
    let case_id = register(&stack, date(2026, 1, 5));

    set_day(&stack, date(2026, 1, 11));
    stack.monitor.run_tick();
    assert_eq!(
        stack.service.assess(&case_id).unwrap().status(),
        ComplianceStatus::InProgress
    );

    set_day(&stack, date(2026, 1, 12));
    stack.monitor.run_tick();
    assert_eq!(
        stack.service.assess(&case_id).unwrap().status(),
        ComplianceStatus::AtRisk
    );

    set_day(&stack, date(2026, 1, 14));
    let breach_tick = stack.monitor.run_tick();
    assert_eq!(breach_tick.emergencies_triggered, 1);

    let final_state = stack.service.assess(&case_id).unwrap();
    assert_eq!(final_state.status(), ComplianceStatus::Emergency);
    assert!(final_state.context.emergency_protocol_active);

    // The protocol never fires twice.
    let after = stack.monitor.run_tick();
    assert_eq!(after.emergencies_triggered, 0);
    let activations = stack
        .service
        .timeline(&case_id)
        .unwrap()
        .into_iter()
        .filter(|e| e.kind == TimelineEventKind::EmergencyTriggered)
        .count();
    assert_eq!(activations, 1);
}

// =========================================================================
// Background loop over the shared stack
// =========================================================================

#[tokio::test(start_paused = true)]
async fn background_loop_tracks_cases_registered_while_running() {
    let stack = make_stack(date(2026, 1, 5));
    let monitor = Arc::new(ComplianceMonitor::new(
        Arc::clone(&stack.service),
        MonitorConfig::default().with_poll_interval(Duration::from_secs(30)),
    ));

    monitor.start().unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // A case registered after start is picked up by the next sweep.
    register(&stack, date(2026, 1, 5));
    tokio::time::sleep(Duration::from_secs(45)).await;

    monitor.stop().await.unwrap();
    let status = monitor.status();
    assert!(status.ticks_completed >= 2);
    let last = status.last_tick.unwrap();
    assert_eq!(last.evaluated, 1);
}
