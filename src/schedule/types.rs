//! Core schedule types: events, priorities, and conflict reports.
//!
//! An [`Event`] is the normalized representation the engine operates on;
//! wire inputs ([`EventInput`], [`EventPatch`]) carry RFC 3339 timestamp
//! strings that the normalizer converts to epoch milliseconds.

use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

use super::normalize;

// ============================================================================
// Event
// ============================================================================

/// A scheduled event with a normalized, comparable time window.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    /// Unique identifier, assigned on creation, immutable thereafter.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Whether the event happens online or at a physical venue.
    pub mode: EventMode,
    /// Venue name or meeting link.
    pub venue: String,
    /// Start instant in epoch milliseconds.
    pub start_ms: i64,
    /// End instant in epoch milliseconds. Invariant: `start_ms < end_ms`.
    pub end_ms: i64,
    /// Event priority.
    pub priority: Priority,
    /// Ordered tags; duplicates permitted.
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
    /// When the event was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Start instant as a `DateTime`.
    pub fn start(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.start_ms)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// End instant as a `DateTime`.
    pub fn end(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.end_ms)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Duration of the event in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_ms - self.start_ms) / 60_000
    }

    /// Human-readable time window, used in advisory prompts.
    pub fn window(&self) -> String {
        format!("{} to {}", self.start().to_rfc3339(), self.end().to_rfc3339())
    }
}

/// Whether an event happens online or at a physical venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    #[default]
    Online,
    Offline,
}

// ============================================================================
// Priority
// ============================================================================

/// Event priority. Inferred by the advisory gateway when absent from input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    /// Strict parse after trimming and case-folding. Anything that is not
    /// exactly one of the three tokens is rejected.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(()),
        }
    }
}

// ============================================================================
// Working hours
// ============================================================================

/// Bounds for the reschedule suggestion window, as `HH:MM` strings.
/// Input-only; never persisted on the stored event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: "09:00".to_string(),
            end: "18:00".to_string(),
        }
    }
}

// ============================================================================
// Wire inputs
// ============================================================================

/// Inbound candidate event with wire-format (RFC 3339) timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub mode: EventMode,
    pub venue: String,
    /// RFC 3339 start timestamp.
    pub start_time: String,
    /// RFC 3339 end timestamp.
    pub end_time: String,
    /// If absent, the advisory gateway assigns one.
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Bounds for a reschedule suggestion, should one be needed.
    #[serde(default)]
    pub working_hours: Option<WorkingHours>,
}

/// Partial update for an existing event. Unset fields keep their stored
/// values; the merged candidate is re-normalized before commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mode: Option<EventMode>,
    #[serde(default)]
    pub venue: Option<String>,
    /// RFC 3339 start timestamp.
    #[serde(default)]
    pub start_time: Option<String>,
    /// RFC 3339 end timestamp.
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Bounds for a reschedule suggestion, should one be needed.
    #[serde(default)]
    pub working_hours: Option<WorkingHours>,
}

impl EventPatch {
    /// Merge this patch over an event. Timestamps are parsed here; the
    /// ordering invariant is re-checked by the caller before commit.
    pub fn apply_to(&self, event: &mut Event) -> std::result::Result<(), ScheduleError> {
        if let Some(ref title) = self.title {
            event.title = title.clone();
        }
        if let Some(ref description) = self.description {
            event.description = description.clone();
        }
        if let Some(mode) = self.mode {
            event.mode = mode;
        }
        if let Some(ref venue) = self.venue {
            event.venue = venue.clone();
        }
        if let Some(ref start) = self.start_time {
            event.start_ms = normalize::parse_instant(start)?;
        }
        if let Some(ref end) = self.end_time {
            event.end_ms = normalize::parse_instant(end)?;
        }
        if let Some(priority) = self.priority {
            event.priority = priority;
        }
        if let Some(ref tags) = self.tags {
            event.tags = tags.clone();
        }
        event.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Conflict report returned instead of committing an overlapping candidate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConflictReport {
    /// Existing events that overlap the candidate, start-time ascending.
    pub conflicts: Vec<Event>,
    /// Advisory reschedule suggestion; `None` when the gateway could not
    /// produce one.
    pub suggestion: Option<DateTime<Utc>>,
}

/// Result of a create or update request.
#[derive(Debug, Clone)]
pub enum ScheduleOutcome {
    /// The candidate was conflict-free and is now stored.
    Committed(Event),
    /// The candidate overlapped existing events and was not stored.
    Conflict(ConflictReport),
}
