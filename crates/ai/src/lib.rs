//! Provider fallback text generation.
//!
//! Given a prompt, `FallbackChain` tries each configured AI provider in a
//! fixed priority order (OpenAI, then Groq, then Anthropic, then Gemini) and
//! returns the first completion that comes back well formed. Providers
//! without an API key are not attempted at all; a failing provider is
//! skipped silently and the next one is tried. When nothing succeeds the
//! chain returns a fixed, user-displayable sentinel instead of an error, so
//! callers never need an error branch for generation.
//!
//! Outbound HTTP goes through the `ProviderTransport` trait; production uses
//! the reqwest-backed implementation, tests script responses through it.

pub mod chain;
pub mod providers;
pub mod transport;

pub use chain::{FallbackChain, GenerateError, TextGenerator, GENERATION_FAILED_TEXT};
pub use providers::{Provider, ProviderKind};
pub use transport::{HttpProviderTransport, ProviderRequest, ProviderTransport, RequestAuth, TransportError};
