//! Advisory gateway: contract wrappers around an external text-completion
//! capability.
//!
//! The capability itself is a single method, [`CompletionProvider::complete`];
//! everything the engine needs (priority inference, reschedule suggestions,
//! description rewriting, summaries, schedule Q&A) is a typed wrapper with
//! its own response parsing and failure normalization in
//! [`AdvisoryGateway`].

mod api;
mod gateway;
mod traits;

pub use api::ApiCompletionProvider;
pub use gateway::AdvisoryGateway;
pub use traits::CompletionProvider;
