//! REST transport layer.
//!
//! Thin by design: handlers check payload shape at the edge, call the
//! scheduler, and map the error taxonomy onto status codes. All scheduling
//! semantics live in [`crate::scheduler`].

pub mod handlers;
mod rest;

pub use handlers::ApiState;
pub use rest::{create_router, RestApiConfig};
