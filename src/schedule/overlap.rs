//! Overlap detection over half-open time intervals.
//!
//! Pure and deterministic; no advisory or I/O involvement.

use super::types::Event;

/// Half-open interval overlap: `[s1, e1)` and `[s2, e2)` conflict iff
/// `s1 < e2 && e1 > s2`. Touching endpoints never conflict.
pub fn overlaps(s1: i64, e1: i64, s2: i64, e2: i64) -> bool {
    s1 < e2 && e1 > s2
}

/// Find the events in `schedule` that conflict with `candidate`.
///
/// The candidate is excluded from comparison against itself by id; on the
/// update path the event being updated is still present in the schedule
/// under its old values. Order of `schedule` (start-time ascending from
/// the store) is preserved.
pub fn find_conflicts(candidate: &Event, schedule: &[Event]) -> Vec<Event> {
    schedule
        .iter()
        .filter(|existing| existing.id != candidate.id)
        .filter(|existing| {
            overlaps(
                candidate.start_ms,
                candidate.end_ms,
                existing.start_ms,
                existing.end_ms,
            )
        })
        .cloned()
        .collect()
}
