//! Advisory capability trait definitions.

use async_trait::async_trait;

/// Trait for text-completion providers.
///
/// The engine never assumes how the text is produced; any provider that
/// answers a prompt with free text can sit behind this trait.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Produce a completion for the given prompt.
    async fn complete(&self, prompt: &str) -> crate::error::Result<String>;
}
