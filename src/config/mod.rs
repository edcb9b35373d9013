//! Configuration for the Tempo scheduling engine.

mod settings;

pub use settings::{parse_hhmm, AdvisoryConfig, Config, SchedulingConfig, ServerConfig};
