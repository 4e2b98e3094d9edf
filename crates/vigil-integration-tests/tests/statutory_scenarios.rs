//! # Campaign 1: Statutory Deadline Scenarios
//!
//! End-to-end flows through the enforcement engine over real calendars:
//! deadline projection, tier escalation, late-registration breach, and the
//! severity write guard. Each scenario wires the full service stack
//! (store, notifier, clock, calculator) the way a deployment does.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use vigil_calendar::{HolidayCalendar, WorkingDayCalculator};
use vigil_core::{CaseId, Clock, FixedClock, JurisdictionId};
use vigil_engine::{
    CaseRegistration, ComplianceStatus, EnforcementConfig, MemoryStore, Notifier,
    RecordingNotifier, StakeholderRole, TimelineEnforcementService, TimelineEventKind,
};

struct Stack {
    service: TimelineEnforcementService,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<FixedClock>,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Wire a service over the given calendar with the clock parked at 09:00
/// on `start`.
fn stack_with(calendar: HolidayCalendar, start: NaiveDate) -> Stack {
    let clock = Arc::new(FixedClock::at(
        Utc.from_utc_datetime(&start.and_hms_opt(9, 0, 0).unwrap()),
    ));
    let notifier = Arc::new(RecordingNotifier::new());
    let service = TimelineEnforcementService::new(
        Arc::new(MemoryStore::new()),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        WorkingDayCalculator::new(Arc::new(calendar)),
        EnforcementConfig::default(),
    );
    Stack {
        service,
        notifier,
        clock,
    }
}

fn nl_stack(start: NaiveDate) -> Stack {
    stack_with(HolidayCalendar::netherlands(), start)
}

fn set_day(stack: &Stack, day: NaiveDate) {
    stack
        .clock
        .set(Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).unwrap()));
}

// =========================================================================
// Scenario 1: Plain week — Monday trigger, deadline the following Tuesday
// =========================================================================

#[test]
fn monday_trigger_over_a_plain_week() {
    let stack = nl_stack(date(2026, 1, 5));
    let case_id = CaseId::new();

    let assessment = stack
        .service
        .initialize_compliance(case_id.clone(), date(2026, 1, 5), CaseRegistration::default())
        .unwrap();

    // Six working days from Monday the 5th: Tue 6 .. Fri 9, Mon 12, Tue 13.
    assert_eq!(assessment.context.deadline, date(2026, 1, 13));
    assert_eq!(assessment.days_remaining, 8);
    assert_eq!(assessment.status(), ComplianceStatus::Pending);
    assert!(!assessment.context.emergency_protocol_active);

    // Registration is on the audit trail; nothing was dispatched yet.
    let events = stack.service.timeline(&case_id).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, TimelineEventKind::Registration);
    assert_eq!(stack.notifier.delivery_count(), 0);
}

// =========================================================================
// Scenario 2: Friday trigger into a holiday bridge
// =========================================================================

/// Calendar for a jurisdiction whose June holidays fall on a Monday and
/// the Tuesday after, directly behind a weekend.
fn bridge_calendar() -> HolidayCalendar {
    HolidayCalendar::from_entries(
        JurisdictionId::new("XX").unwrap(),
        2026..=2026,
        vec![
            (date(2026, 6, 8), "Public Holiday".to_string()),
            (date(2026, 6, 9), "Public Holiday (second day)".to_string()),
        ],
    )
    .unwrap()
}

#[test]
fn friday_trigger_skips_weekend_and_holiday_bridge() {
    let stack = stack_with(bridge_calendar(), date(2026, 6, 5));
    let case_id = CaseId::new();

    // Trigger Friday 5 June 2026. Saturday, Sunday, and the Monday–Tuesday
    // holidays are all skipped; the six working days consumed are Wed 10,
    // Thu 11, Fri 12, Mon 15, Tue 16, Wed 17.
    let assessment = stack
        .service
        .initialize_compliance(case_id, date(2026, 6, 5), CaseRegistration::default())
        .unwrap();

    assert_eq!(assessment.context.deadline, date(2026, 6, 17));

    // A naive six-calendar-day add would have landed on the 11th.
    let naive = date(2026, 6, 5) + chrono::Duration::days(6);
    assert_eq!(naive, date(2026, 6, 11));
    assert!(assessment.context.deadline > naive);
    assert_eq!(assessment.days_remaining, 12);
}

// =========================================================================
// Scenario 3: Late registration opens already breached
// =========================================================================

#[test]
fn late_registration_fires_the_emergency_protocol() {
    // Registered on 20 January for a death on the 5th: the 13 January
    // deadline is a week gone.
    let stack = nl_stack(date(2026, 1, 20));
    let case_id = CaseId::new();

    let assessment = stack
        .service
        .initialize_compliance(
            case_id.clone(),
            date(2026, 1, 5),
            CaseRegistration::default().with_jurisdiction(JurisdictionId::new("NL").unwrap()),
        )
        .unwrap();

    assert_eq!(assessment.days_remaining, -7);
    assert_eq!(assessment.status(), ComplianceStatus::Emergency);
    assert!(assessment.context.emergency_protocol_active);

    // The escalation reached the authority and management, not just the
    // family circle.
    let roles: Vec<StakeholderRole> = stack
        .notifier
        .deliveries()
        .into_iter()
        .map(|(role, _)| role)
        .collect();
    assert!(roles.contains(&StakeholderRole::Municipality));
    assert!(roles.contains(&StakeholderRole::Management));
    assert!(roles.contains(&StakeholderRole::Family));

    let kinds: Vec<TimelineEventKind> = stack
        .service
        .timeline(&case_id)
        .unwrap()
        .into_iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TimelineEventKind::Registration,
            TimelineEventKind::EmergencyTriggered,
        ]
    );
}

// =========================================================================
// Scenario 4: One day closer, one tier up, one event
// =========================================================================

#[test]
fn one_simulated_day_escalates_exactly_one_tier() {
    let stack = nl_stack(date(2026, 1, 5));
    let case_id = CaseId::new();
    stack
        .service
        .initialize_compliance(case_id.clone(), date(2026, 1, 5), CaseRegistration::default())
        .unwrap();

    // Two calendar days before the deadline: in_progress.
    set_day(&stack, date(2026, 1, 11));
    let first = stack.service.monitor_compliance(&case_id).unwrap();
    assert_eq!(first.days_remaining, 2);
    assert_eq!(first.status(), ComplianceStatus::InProgress);

    let tier_changes = |stack: &Stack| {
        stack
            .service
            .timeline(&case_id)
            .unwrap()
            .into_iter()
            .filter(|e| e.kind == TimelineEventKind::StatusTierChange)
            .count()
    };
    assert_eq!(tier_changes(&stack), 1);

    // One simulated day later: at_risk, and exactly one new event.
    set_day(&stack, date(2026, 1, 12));
    let second = stack.service.monitor_compliance(&case_id).unwrap();
    assert_eq!(second.days_remaining, 1);
    assert_eq!(second.status(), ComplianceStatus::AtRisk);
    assert_eq!(tier_changes(&stack), 2);

    // Re-evaluating with no time passing appends nothing.
    stack.service.monitor_compliance(&case_id).unwrap();
    assert_eq!(tier_changes(&stack), 2);
}

// =========================================================================
// Scenario 5: A stale clock never downgrades the persisted tier
// =========================================================================

#[test]
fn stale_evaluation_cannot_downgrade_severity() {
    let stack = nl_stack(date(2026, 1, 5));
    let case_id = CaseId::new();
    stack
        .service
        .initialize_compliance(case_id.clone(), date(2026, 1, 5), CaseRegistration::default())
        .unwrap();

    // Evaluate close to the deadline first.
    set_day(&stack, date(2026, 1, 12));
    let fresh = stack.service.monitor_compliance(&case_id).unwrap();
    assert_eq!(fresh.status(), ComplianceStatus::AtRisk);

    // A straggler evaluation observes an earlier clock. Its computed tier
    // is lower, so the guard keeps the stored one.
    set_day(&stack, date(2026, 1, 6));
    let stale = stack.service.monitor_compliance(&case_id).unwrap();
    assert_eq!(stale.status(), ComplianceStatus::AtRisk);

    let persisted = stack.service.assess(&case_id).unwrap();
    assert_eq!(persisted.status(), ComplianceStatus::AtRisk);

    // The stale pass changed nothing, so no tier-change event was added.
    let tier_changes = stack
        .service
        .timeline(&case_id)
        .unwrap()
        .into_iter()
        .filter(|e| e.kind == TimelineEventKind::StatusTierChange)
        .count();
    assert_eq!(tier_changes, 1);
}

// =========================================================================
// Full lifecycle: registration to closure across every tier
// =========================================================================

#[test]
fn case_walks_the_full_tier_ladder_and_closes() {
    let stack = nl_stack(date(2026, 1, 5));
    let case_id = CaseId::new();
    stack
        .service
        .initialize_compliance(
            case_id.clone(),
            date(2026, 1, 5),
            CaseRegistration::default()
                .with_jurisdiction(JurisdictionId::new("NL").unwrap())
                .with_identity_verified(true),
        )
        .unwrap();

    let expectations = [
        (date(2026, 1, 8), ComplianceStatus::Pending),
        (date(2026, 1, 11), ComplianceStatus::InProgress),
        (date(2026, 1, 12), ComplianceStatus::AtRisk),
        (date(2026, 1, 13), ComplianceStatus::Emergency),
    ];
    for (day, expected) in expectations {
        set_day(&stack, day);
        let assessment = stack.service.monitor_compliance(&case_id).unwrap();
        assert_eq!(assessment.status(), expected, "tier on {day}");
    }

    // Monitoring marks the breach; activation is the caller's move.
    let before = stack.service.assess(&case_id).unwrap();
    assert!(!before.context.emergency_protocol_active);
    stack.service.trigger_emergency_response(&case_id).unwrap();
    let after = stack.service.assess(&case_id).unwrap();
    assert!(after.context.emergency_protocol_active);

    // Close the case; enforcement stops but reporting continues.
    stack.service.close_case(&case_id).unwrap();
    assert!(stack.service.open_case_ids().unwrap().is_empty());
    assert!(stack.service.monitor_compliance(&case_id).is_err());
    assert!(stack.service.assess(&case_id).is_ok());

    let kinds: Vec<TimelineEventKind> = stack
        .service
        .timeline(&case_id)
        .unwrap()
        .into_iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TimelineEventKind::Registration,
            TimelineEventKind::StatusTierChange,
            TimelineEventKind::StatusTierChange,
            TimelineEventKind::StatusTierChange,
            TimelineEventKind::EmergencyTriggered,
        ]
    );
}
