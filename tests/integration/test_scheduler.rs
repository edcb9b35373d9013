//! End-to-end tests for the conflict-resolution workflow.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempo::{
    AdvisoryGateway, AdvisoryError, CompletionProvider, EventInput, EventMode, EventPatch,
    Priority, Result, ScheduleError, ScheduleOutcome, Scheduler, TempoError, WorkingHours,
};

/// Provider that replays canned responses in order, optionally pausing to
/// widen the suspension window.
#[derive(Clone)]
struct ScriptedProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.iter().map(|r| r.to_string()).collect(),
            )),
            delay: None,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AdvisoryError::Api("no scripted response".to_string()).into())
    }
}

fn scheduler(responses: &[&str]) -> Scheduler<ScriptedProvider> {
    Scheduler::new(AdvisoryGateway::new(
        ScriptedProvider::new(responses),
        WorkingHours::default(),
    ))
}

fn input(title: &str, start: &str, end: &str) -> EventInput {
    EventInput {
        title: title.to_string(),
        description: format!("{title} description"),
        mode: EventMode::Online,
        venue: "meet.example.com".to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        priority: Some(Priority::Medium),
        tags: Vec::new(),
        working_hours: None,
    }
}

fn committed(outcome: ScheduleOutcome) -> tempo::Event {
    match outcome {
        ScheduleOutcome::Committed(event) => event,
        ScheduleOutcome::Conflict(report) => {
            panic!("expected commit, got conflict with {:?}", report.conflicts)
        }
    }
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_assigns_id_and_commits() {
    let scheduler = scheduler(&[]);
    let event = committed(
        scheduler
            .create(input("Standup", "2024-01-15T09:00:00Z", "2024-01-15T09:30:00Z"))
            .await
            .unwrap(),
    );

    assert!(!event.id.is_empty());
    assert_eq!(event.duration_minutes(), 30);
    assert_eq!(scheduler.list().await.len(), 1);
}

#[tokio::test]
async fn test_missing_priority_is_inferred() {
    let scheduler = scheduler(&["high"]);
    let mut req = input("Incident review", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
    req.priority = None;

    let event = committed(scheduler.create(req).await.unwrap());
    assert_eq!(event.priority, Priority::High);
}

#[tokio::test]
async fn test_malformed_priority_response_falls_back_to_medium() {
    let scheduler = scheduler(&["it depends on your mood"]);
    let mut req = input("Coffee", "2024-01-15T09:00:00Z", "2024-01-15T09:15:00Z");
    req.priority = None;

    let event = committed(scheduler.create(req).await.unwrap());
    assert_eq!(event.priority, Priority::Medium);
}

#[tokio::test]
async fn test_create_overlapping_one_event_reports_it() {
    let scheduler = scheduler(&[
        "```json\n{\"startTime\": \"2024-01-15T13:00:00Z\"}\n```",
    ]);
    let existing = committed(
        scheduler
            .create(input("Booked", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .await
            .unwrap(),
    );

    let outcome = scheduler
        .create(input("Clash", "2024-01-15T09:30:00Z", "2024-01-15T10:30:00Z"))
        .await
        .unwrap();

    let ScheduleOutcome::Conflict(report) = outcome else {
        panic!("expected conflict");
    };
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].id, existing.id);
    assert_eq!(
        report.suggestion.unwrap().to_rfc3339(),
        "2024-01-15T13:00:00+00:00"
    );
    // The candidate was not stored.
    assert_eq!(scheduler.list().await.len(), 1);
}

#[tokio::test]
async fn test_touching_events_commit() {
    let scheduler = scheduler(&[]);
    committed(
        scheduler
            .create(input("First", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .await
            .unwrap(),
    );
    // Starts exactly when the first ends: no conflict under the half-open rule.
    committed(
        scheduler
            .create(input("Second", "2024-01-15T10:00:00Z", "2024-01-15T11:00:00Z"))
            .await
            .unwrap(),
    );
    assert_eq!(scheduler.list().await.len(), 2);
}

#[tokio::test]
async fn test_unparsable_suggestion_degrades_to_none() {
    let scheduler = scheduler(&["just move it to the afternoon"]);
    committed(
        scheduler
            .create(input("Booked", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .await
            .unwrap(),
    );

    let outcome = scheduler
        .create(input("Clash", "2024-01-15T09:00:00Z", "2024-01-15T09:30:00Z"))
        .await
        .unwrap();

    let ScheduleOutcome::Conflict(report) = outcome else {
        panic!("expected conflict");
    };
    assert!(report.suggestion.is_none());
    assert_eq!(report.conflicts.len(), 1);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_moves_event_and_frees_old_window() {
    let scheduler = scheduler(&[]);
    let event = committed(
        scheduler
            .create(input("Movable", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .await
            .unwrap(),
    );

    let patch = EventPatch {
        start_time: Some("2024-01-15T14:00:00Z".to_string()),
        end_time: Some("2024-01-15T15:00:00Z".to_string()),
        ..Default::default()
    };
    let updated = match scheduler.update(&event.id, patch).await.unwrap() {
        ScheduleOutcome::Committed(e) => e,
        ScheduleOutcome::Conflict(_) => panic!("expected commit"),
    };
    assert_eq!(updated.id, event.id);

    // Only the updated version remains; the old window is free again.
    let events = scheduler.list().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].start().to_rfc3339(), "2024-01-15T14:00:00+00:00");

    committed(
        scheduler
            .create(input("Newcomer", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .await
            .unwrap(),
    );
}

#[tokio::test]
async fn test_update_does_not_conflict_with_itself() {
    let scheduler = scheduler(&[]);
    let event = committed(
        scheduler
            .create(input("Shifting", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .await
            .unwrap(),
    );

    // New window overlaps the stored (old) window of the same event.
    let patch = EventPatch {
        start_time: Some("2024-01-15T09:30:00Z".to_string()),
        end_time: Some("2024-01-15T10:30:00Z".to_string()),
        ..Default::default()
    };
    committed(scheduler.update(&event.id, patch).await.unwrap());
}

#[tokio::test]
async fn test_update_merged_window_must_stay_ordered() {
    let scheduler = scheduler(&[]);
    let event = committed(
        scheduler
            .create(input("Pinned", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .await
            .unwrap(),
    );

    // Only the end moves, landing before the kept start.
    let patch = EventPatch {
        end_time: Some("2024-01-15T08:00:00Z".to_string()),
        ..Default::default()
    };
    let err = scheduler.update(&event.id, patch).await.unwrap_err();
    assert!(matches!(
        err,
        TempoError::Schedule(ScheduleError::InvalidTimeRange { .. })
    ));
    // Stored event is untouched.
    assert_eq!(
        scheduler.get(&event.id).await.unwrap().end().to_rfc3339(),
        "2024-01-15T10:00:00+00:00"
    );
}

// ============================================================================
// Delete / reads
// ============================================================================

#[tokio::test]
async fn test_delete_returns_event_and_missing_is_not_found() {
    let scheduler = scheduler(&[]);
    let event = committed(
        scheduler
            .create(input("Doomed", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .await
            .unwrap(),
    );

    let removed = scheduler.delete(&event.id).await.unwrap();
    assert_eq!(removed.id, event.id);
    assert!(scheduler.list().await.is_empty());

    let err = scheduler.delete(&event.id).await.unwrap_err();
    assert!(matches!(
        err,
        TempoError::Schedule(ScheduleError::NotFound(_))
    ));
    assert!(scheduler.list().await.is_empty());
}

#[tokio::test]
async fn test_list_is_ordered_and_idempotent() {
    let scheduler = scheduler(&[]);
    committed(
        scheduler
            .create(input("Late", "2024-01-15T15:00:00Z", "2024-01-15T16:00:00Z"))
            .await
            .unwrap(),
    );
    committed(
        scheduler
            .create(input("Early", "2024-01-15T08:00:00Z", "2024-01-15T09:00:00Z"))
            .await
            .unwrap(),
    );

    let first: Vec<String> = scheduler.list().await.into_iter().map(|e| e.id).collect();
    let second: Vec<String> = scheduler.list().await.into_iter().map(|e| e.id).collect();
    assert_eq!(first, second);

    let titles: Vec<String> = scheduler
        .list()
        .await
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, ["Early", "Late"]);
}

#[tokio::test]
async fn test_filter_by_tag() {
    let scheduler = scheduler(&[]);
    let mut tagged = input("Tagged", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
    tagged.tags = vec!["work".to_string()];
    committed(scheduler.create(tagged).await.unwrap());

    committed(
        scheduler
            .create(input("Plain", "2024-01-15T11:00:00Z", "2024-01-15T12:00:00Z"))
            .await
            .unwrap(),
    );

    let filtered = scheduler.filter_by_tag("work").await;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].title, "Tagged");
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_creates_never_double_book() {
    // Both requests suspend at the priority call before snapshotting; the
    // loser must observe the winner's commit and report a conflict.
    let provider = ScriptedProvider::new(&["high", "low"]).with_delay(Duration::from_millis(20));
    let scheduler = Arc::new(Scheduler::new(AdvisoryGateway::new(
        provider,
        WorkingHours::default(),
    )));

    let mut a = input("Racer A", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
    a.priority = None;
    let mut b = input("Racer B", "2024-01-15T09:30:00Z", "2024-01-15T10:30:00Z");
    b.priority = None;

    let (ra, rb) = tokio::join!(
        {
            let s = scheduler.clone();
            async move { s.create(a).await.unwrap() }
        },
        {
            let s = scheduler.clone();
            async move { s.create(b).await.unwrap() }
        }
    );

    let outcomes = [ra, rb];
    let commits = outcomes
        .iter()
        .filter(|o| matches!(o, ScheduleOutcome::Committed(_)))
        .count();
    assert_eq!(commits, 1, "exactly one racer may commit");
    assert_eq!(scheduler.list().await.len(), 1);
}

// ============================================================================
// Advisory passthroughs
// ============================================================================

#[tokio::test]
async fn test_reschedule_suggests_time_for_stored_event() {
    let scheduler = scheduler(&[
        "```json\n{\"startTime\": \"2024-01-16T09:00:00Z\"}\n```",
    ]);
    let event = committed(
        scheduler
            .create(input("Sprawling", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .await
            .unwrap(),
    );

    let suggested = scheduler.reschedule(&event.id).await.unwrap();
    assert_eq!(suggested.to_rfc3339(), "2024-01-16T09:00:00+00:00");
}

#[tokio::test]
async fn test_summarize_and_query() {
    let scheduler = scheduler(&["A quiet day.", "Nothing after lunch."]);
    committed(
        scheduler
            .create(input("Only one", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .await
            .unwrap(),
    );

    assert_eq!(scheduler.summarize().await.unwrap(), "A quiet day.");
    assert_eq!(
        scheduler.answer_query("what's this afternoon?").await.unwrap(),
        "Nothing after lunch."
    );
}
