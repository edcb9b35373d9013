//! Typed advisory wrappers: priority inference, reschedule suggestions,
//! and free-text assistance over a completion provider.
//!
//! The gateway holds no state across calls. Failure normalization is
//! deliberately asymmetric: priority inference degrades to `medium` and
//! never blocks event creation, while a malformed reschedule suggestion is
//! a hard [`AdvisoryError::Unavailable`] — fabricating a start time there
//! risks a silent double-booking.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::error::{AdvisoryError, Result, TempoError};
use crate::schedule::{Event, Priority, WorkingHours};

use super::CompletionProvider;

/// Fenced JSON block inside an advisory response.
static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("Invalid regex"));

/// Structured payload expected from a reschedule suggestion.
#[derive(Debug, Deserialize)]
struct TimeSuggestion {
    #[serde(rename = "startTime")]
    start_time: String,
}

/// Contract wrapper around the external text-completion capability.
pub struct AdvisoryGateway<P: CompletionProvider> {
    provider: P,
    default_hours: WorkingHours,
}

impl<P: CompletionProvider> AdvisoryGateway<P> {
    /// Create a gateway with the working-hours defaults used when a
    /// request does not bound the suggestion window itself.
    pub fn new(provider: P, default_hours: WorkingHours) -> Self {
        Self {
            provider,
            default_hours,
        }
    }

    // ========================================================================
    // Priority inference (best-effort)
    // ========================================================================

    /// Infer a priority from the event title and description.
    ///
    /// Best-effort by contract: any response that is not exactly one of
    /// `low`, `medium`, `high` after trimming and case-folding, and any
    /// provider failure, falls back to [`Priority::Medium`].
    pub async fn suggest_priority(&self, title: &str, description: &str) -> Priority {
        let prompt = format!(
            "Classify the priority of this event. \
             Reply with exactly one word: low, medium, or high.\n\n\
             Title: {title}\nDescription: {description}"
        );

        match self.provider.complete(&prompt).await {
            Ok(text) => match text.parse::<Priority>() {
                Ok(priority) => priority,
                Err(()) => {
                    warn!("Unparsable priority response {:?}, falling back to medium", text);
                    Priority::Medium
                }
            },
            Err(e) => {
                warn!("Priority suggestion failed ({e}), falling back to medium");
                Priority::Medium
            }
        }
    }

    // ========================================================================
    // Reschedule suggestion (hard contract)
    // ========================================================================

    /// Suggest a new start time for a candidate that conflicts with the
    /// given schedule.
    ///
    /// The response must contain a fenced JSON object with a single
    /// `startTime` field in RFC 3339 form; anything else is
    /// [`AdvisoryError::Unavailable`].
    pub async fn suggest_time(
        &self,
        candidate: &Event,
        schedule: &[Event],
        working_hours: Option<&WorkingHours>,
    ) -> Result<DateTime<Utc>> {
        let hours = working_hours.unwrap_or(&self.default_hours);
        let prompt = self.build_time_prompt(candidate, schedule, hours);
        debug!("Requesting reschedule suggestion for event {}", candidate.id);

        let text = self
            .provider
            .complete(&prompt)
            .await
            .map_err(|e| AdvisoryError::Unavailable(format!("completion failed: {e}")))?;

        let suggested = parse_time_suggestion(&text)?;
        Ok(suggested)
    }

    fn build_time_prompt(
        &self,
        candidate: &Event,
        schedule: &[Event],
        hours: &WorkingHours,
    ) -> String {
        let mut listing = String::new();
        for event in schedule.iter().filter(|e| e.id != candidate.id) {
            listing.push_str(&format!("- {} ({})\n", event.title, event.window()));
        }
        if listing.is_empty() {
            listing.push_str("(none)\n");
        }

        format!(
            "The event \"{}\" ({} minutes) clashes with the schedule below. \
             Suggest a new start time between {} and {} that avoids every \
             listed event.\n\nSchedule:\n{}\n\
             Reply with a fenced JSON object containing a single startTime \
             field in RFC 3339 form, for example:\n\
             ```json\n{{\"startTime\": \"2024-01-15T14:00:00Z\"}}\n```",
            candidate.title,
            candidate.duration_minutes(),
            hours.start,
            hours.end,
            listing,
        )
    }

    // ========================================================================
    // Free-text assistance
    // ========================================================================

    /// Rewrite an event description. Any non-empty response is accepted.
    pub async fn improve_description(&self, text: &str) -> Result<String> {
        let prompt = format!(
            "Improve this event description. Keep it concise and factual. \
             Reply with the improved description only.\n\n{text}"
        );
        self.text_completion(&prompt).await
    }

    /// Summarize a schedule in prose.
    pub async fn summarize(&self, events: &[Event]) -> Result<String> {
        let prompt = format!(
            "Summarize this schedule in a short paragraph.\n\n{}",
            schedule_listing(events)
        );
        self.text_completion(&prompt).await
    }

    /// Answer a free-form question about the schedule.
    pub async fn answer_query(&self, query: &str, events: &[Event]) -> Result<String> {
        let prompt = format!(
            "Answer the question using only the schedule below.\n\n\
             Schedule:\n{}\nQuestion: {query}",
            schedule_listing(events)
        );
        self.text_completion(&prompt).await
    }

    async fn text_completion(&self, prompt: &str) -> Result<String> {
        let text = self
            .provider
            .complete(prompt)
            .await
            .map_err(|e| AdvisoryError::Unavailable(format!("completion failed: {e}")))?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AdvisoryError::Unavailable("empty response".to_string()).into());
        }
        Ok(trimmed.to_string())
    }
}

/// Human-readable event listing for prompts.
fn schedule_listing(events: &[Event]) -> String {
    if events.is_empty() {
        return "(no events)\n".to_string();
    }
    let mut listing = String::new();
    for event in events {
        listing.push_str(&format!(
            "- {} [{}] ({})\n",
            event.title, event.priority, event.window()
        ));
    }
    listing
}

/// Extract and parse the fenced `startTime` payload from a response.
fn parse_time_suggestion(text: &str) -> std::result::Result<DateTime<Utc>, TempoError> {
    let block = FENCED_JSON
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| AdvisoryError::Unavailable("no fenced JSON block in response".to_string()))?;

    let suggestion: TimeSuggestion = serde_json::from_str(block)
        .map_err(|e| AdvisoryError::Unavailable(format!("malformed suggestion JSON: {e}")))?;

    DateTime::parse_from_rfc3339(&suggestion.start_time)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            AdvisoryError::Unavailable(format!(
                "suggested startTime is not RFC 3339: {:?}",
                suggestion.start_time
            ))
            .into()
        })
}
