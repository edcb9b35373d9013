//! Tempo: AI-assisted scheduling engine
//!
//! A single-user scheduling service that manages timed events and avoids
//! double-booking. Create and update requests flow through a
//! conflict-resolution workflow: time normalization, overlap detection
//! against the current schedule, and — when a candidate clashes — a
//! reschedule suggestion from an external text-completion capability.

pub mod advisory;
pub mod api;
pub mod config;
pub mod error;
pub mod schedule;
pub mod scheduler;

pub use advisory::{AdvisoryGateway, ApiCompletionProvider, CompletionProvider};
pub use api::{create_router, ApiState, RestApiConfig};
pub use config::Config;
pub use error::{AdvisoryError, ConfigError, Result, ScheduleError, TempoError};
pub use schedule::{
    ConflictReport, Event, EventInput, EventMode, EventPatch, EventStore, Priority,
    ScheduleOutcome, WorkingHours,
};
pub use scheduler::Scheduler;
