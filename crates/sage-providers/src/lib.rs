//! Provider adapters for the text-completion service.

/// Groq provider implementation.
pub mod groq;
/// Canned-response provider for tests and offline runs.
pub mod mock;

pub use groq::GroqProvider;
pub use mock::MockProvider;
