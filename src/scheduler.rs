//! Conflict-resolution orchestrator.
//!
//! Composes the normalizer, overlap detector, store, and advisory gateway
//! into the create/update workflow:
//!
//! normalize → assign priority if absent → snapshot → detect conflicts →
//! if conflicting, request a suggestion and report instead of committing;
//! if clear, re-check against the live schedule and commit.
//!
//! Suspension happens only at advisory calls. Because the conflict check
//! runs against a snapshot taken before those calls, the schedule can
//! change underneath a request; the commit therefore re-runs the conflict
//! check under the write lock and reports a conflict instead of
//! double-booking when it lost the race.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::advisory::{AdvisoryGateway, CompletionProvider};
use crate::error::{Result, ScheduleError};
use crate::schedule::{
    normalize, overlap, ConflictReport, Event, EventInput, EventPatch, EventStore, ScheduleOutcome,
    WorkingHours,
};

/// Orchestrator for create/update/delete and advisory operations over a
/// single shared schedule.
pub struct Scheduler<P: CompletionProvider> {
    store: Arc<RwLock<EventStore>>,
    advisory: AdvisoryGateway<P>,
}

impl<P: CompletionProvider> Scheduler<P> {
    /// Create a scheduler with a fresh, empty store.
    pub fn new(advisory: AdvisoryGateway<P>) -> Self {
        Self {
            store: Arc::new(RwLock::new(EventStore::new())),
            advisory,
        }
    }

    // ========================================================================
    // Create / update
    // ========================================================================

    /// Create an event. Returns the stored event, or a conflict report if
    /// the candidate overlaps the existing schedule.
    pub async fn create(&self, input: EventInput) -> Result<ScheduleOutcome> {
        let (start_ms, end_ms) = normalize::normalize_window(&input.start_time, &input.end_time)?;

        // Best-effort inference; cannot fail the request.
        let priority = match input.priority {
            Some(priority) => priority,
            None => {
                self.advisory
                    .suggest_priority(&input.title, &input.description)
                    .await
            }
        };

        let now = Utc::now();
        let candidate = Event {
            id: uuid::Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            mode: input.mode,
            venue: input.venue,
            start_ms,
            end_ms,
            priority,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        };

        self.resolve_and_commit(candidate, input.working_hours.as_ref())
            .await
    }

    /// Update an event by merging partial fields over the stored version,
    /// then running the same conflict-resolution workflow. The merged
    /// candidate keeps its id, so conflict checks exclude it.
    pub async fn update(&self, id: &str, patch: EventPatch) -> Result<ScheduleOutcome> {
        let stored = self
            .store
            .read()
            .await
            .get(id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))?;

        let mut candidate = stored;
        patch.apply_to(&mut candidate)?;
        // Re-validate defensively: a partial merge can invert the window.
        normalize::check_ordered(candidate.start_ms, candidate.end_ms)?;

        self.resolve_and_commit(candidate, patch.working_hours.as_ref())
            .await
    }

    /// Shared tail of the create/update workflow: snapshot, detect,
    /// advise or commit.
    async fn resolve_and_commit(
        &self,
        candidate: Event,
        working_hours: Option<&WorkingHours>,
    ) -> Result<ScheduleOutcome> {
        let snapshot = self.store.read().await.list();
        let conflicts = overlap::find_conflicts(&candidate, &snapshot);

        if !conflicts.is_empty() {
            debug!(
                "Event {} conflicts with {} existing event(s)",
                candidate.id,
                conflicts.len()
            );
            let suggestion = match self
                .advisory
                .suggest_time(&candidate, &snapshot, working_hours)
                .await
            {
                Ok(start) => Some(start),
                Err(e) => {
                    warn!("No reschedule suggestion available: {e}");
                    None
                }
            };
            return Ok(ScheduleOutcome::Conflict(ConflictReport {
                conflicts,
                suggestion,
            }));
        }

        // The snapshot predates any advisory suspension, so the schedule
        // may have changed; re-check against the live state before commit.
        let mut store = self.store.write().await;
        let live_conflicts = overlap::find_conflicts(&candidate, &store.list());
        if !live_conflicts.is_empty() {
            warn!(
                "Schedule changed under event {}; reporting conflict instead of committing",
                candidate.id
            );
            return Ok(ScheduleOutcome::Conflict(ConflictReport {
                conflicts: live_conflicts,
                suggestion: None,
            }));
        }

        info!("Committing event: {} ({})", candidate.title, candidate.id);
        store.put(candidate.clone());
        Ok(ScheduleOutcome::Committed(candidate))
    }

    // ========================================================================
    // Delete / reads
    // ========================================================================

    /// Delete an event. No conflict semantics; returns the removed event.
    pub async fn delete(&self, id: &str) -> Result<Event> {
        self.store
            .write()
            .await
            .remove(id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()).into())
    }

    /// Fetch a single event.
    pub async fn get(&self, id: &str) -> Result<Event> {
        self.store
            .read()
            .await
            .get(id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()).into())
    }

    /// All events, start-time ascending.
    pub async fn list(&self) -> Vec<Event> {
        self.store.read().await.list()
    }

    /// Events carrying the given tag, in listing order.
    pub async fn filter_by_tag(&self, tag: &str) -> Vec<Event> {
        self.store.read().await.filter_by_tag(tag)
    }

    // ========================================================================
    // Advisory passthroughs
    // ========================================================================

    /// Standalone reschedule suggestion for a stored event. Here the
    /// advisory answer is the entire point of the call, so gateway failure
    /// propagates instead of degrading.
    pub async fn reschedule(&self, id: &str) -> Result<DateTime<Utc>> {
        let event = self.get(id).await?;
        let snapshot = self.store.read().await.list();
        self.advisory.suggest_time(&event, &snapshot, None).await
    }

    /// Rewrite a description via the advisory gateway.
    pub async fn improve_description(&self, text: &str) -> Result<String> {
        self.advisory.improve_description(text).await
    }

    /// Summarize the current schedule.
    pub async fn summarize(&self) -> Result<String> {
        let snapshot = self.store.read().await.list();
        self.advisory.summarize(&snapshot).await
    }

    /// Answer a free-form question about the current schedule.
    pub async fn answer_query(&self, query: &str) -> Result<String> {
        let snapshot = self.store.read().await.list();
        self.advisory.answer_query(query, &snapshot).await
    }
}
