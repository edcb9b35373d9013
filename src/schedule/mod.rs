//! Schedule engine: event types, time normalization, overlap detection,
//! and in-memory storage.
//!
//! ```text
//! inbound payload → normalize → Scheduler (reads EventStore,
//!     may consult the advisory gateway) → store mutation or conflict report
//! ```
//!
//! The pieces here are deliberately small and pure; the workflow that
//! composes them lives in [`crate::scheduler`].

pub mod normalize;
pub mod overlap;
mod store;
pub mod types;

pub use store::EventStore;
pub use types::{
    ConflictReport, Event, EventInput, EventMode, EventPatch, Priority, ScheduleOutcome,
    WorkingHours,
};
