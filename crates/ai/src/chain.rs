use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::debug;

use phrasey_core::config::ProvidersConfig;

use crate::providers::{Provider, ProviderKind};
use crate::transport::{ProviderTransport, TransportError};

/// Returned to users when no provider produced a completion. A displayable
/// reply rather than an error, so callers never branch on generation
/// failure.
pub const GENERATION_FAILED_TEXT: &str = "⚠️ AI 응답 실패";

/// Outcome of one provider attempt. The chain treats every variant the same
/// way: skip the provider and move on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("response carried no completion text")]
    NoCompletion,
}

/// Failure surface of the `TextGenerator` seam. `FallbackChain` never emits
/// one; the type exists so other implementations can fail and the command
/// layer keeps a single error path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct GenerateError(pub String);

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Priority-ordered, best-effort completion across the configured
/// providers: a first-success fold with one attempt per provider and no
/// retries.
pub struct FallbackChain {
    providers: Vec<Provider>,
    transport: Arc<dyn ProviderTransport>,
}

impl FallbackChain {
    pub fn new(providers: Vec<Provider>, transport: Arc<dyn ProviderTransport>) -> Self {
        Self { providers, transport }
    }

    /// Builds the chain from configuration. Providers whose key is absent or
    /// blank are left out entirely; the priority order itself is fixed.
    pub fn from_config(config: &ProvidersConfig, transport: Arc<dyn ProviderTransport>) -> Self {
        let providers = ProviderKind::PRIORITY
            .into_iter()
            .filter_map(|kind| {
                let key = match kind {
                    ProviderKind::OpenAi => config.openai_api_key.as_ref(),
                    ProviderKind::Groq => config.groq_api_key.as_ref(),
                    ProviderKind::Anthropic => config.anthropic_api_key.as_ref(),
                    ProviderKind::Gemini => config.gemini_api_key.as_ref(),
                }?;
                let key = key.expose_secret().trim();
                if key.is_empty() {
                    return None;
                }
                Some(Provider::new(kind, key.to_string().into()))
            })
            .collect();

        Self { providers, transport }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(Provider::name).collect()
    }

    /// Returns the first successful completion in priority order, or the
    /// sentinel text when every eligible provider fails or none is
    /// configured. Never an error.
    pub async fn complete(&self, prompt: &str) -> String {
        for provider in &self.providers {
            match self.attempt(provider, prompt).await {
                Ok(text) => {
                    debug!(provider = provider.name(), "provider completion accepted");
                    return text;
                }
                Err(error) => {
                    debug!(
                        provider = provider.name(),
                        error = %error,
                        "provider attempt failed; moving to next"
                    );
                }
            }
        }

        debug!(providers = self.providers.len(), "no provider produced a completion");
        GENERATION_FAILED_TEXT.to_string()
    }

    async fn attempt(&self, provider: &Provider, prompt: &str) -> Result<String, AttemptError> {
        let raw = self.transport.post_json(provider.request(prompt)).await?;
        provider.extract_completion(&raw).ok_or(AttemptError::NoCompletion)
    }
}

#[async_trait]
impl TextGenerator for FallbackChain {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        Ok(self.complete(prompt).await)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio::sync::Mutex;

    use phrasey_core::config::ProvidersConfig;

    use super::{FallbackChain, TextGenerator, GENERATION_FAILED_TEXT};
    use crate::providers::{ANTHROPIC_MESSAGES_URL, GEMINI_GENERATE_URL, GROQ_CHAT_URL, OPENAI_CHAT_URL};
    use crate::transport::{ProviderRequest, ProviderTransport, TransportError};

    #[derive(Default)]
    struct ScriptedTransport {
        state: Mutex<ScriptedState>,
    }

    #[derive(Default)]
    struct ScriptedState {
        responses: VecDeque<Result<Value, TransportError>>,
        requests: Vec<ProviderRequest>,
    }

    impl ScriptedTransport {
        fn with_script(responses: Vec<Result<Value, TransportError>>) -> Self {
            Self {
                state: Mutex::new(ScriptedState {
                    responses: responses.into(),
                    requests: Vec::new(),
                }),
            }
        }

        async fn requested_urls(&self) -> Vec<String> {
            self.state.lock().await.requests.iter().map(|request| request.url.clone()).collect()
        }

        async fn call_count(&self) -> usize {
            self.state.lock().await.requests.len()
        }
    }

    #[async_trait]
    impl ProviderTransport for ScriptedTransport {
        async fn post_json(&self, request: ProviderRequest) -> Result<Value, TransportError> {
            let mut state = self.state.lock().await;
            state.requests.push(request);
            state
                .responses
                .pop_front()
                .unwrap_or(Err(TransportError::Send("script exhausted".to_string())))
        }
    }

    fn keys(openai: bool, groq: bool, anthropic: bool, gemini: bool) -> ProvidersConfig {
        let key = |present: bool, value: &str| present.then(|| value.to_string().into());
        ProvidersConfig {
            openai_api_key: key(openai, "sk-openai"),
            groq_api_key: key(groq, "gsk-groq"),
            anthropic_api_key: key(anthropic, "sk-ant"),
            gemini_api_key: key(gemini, "g-key"),
            timeout_secs: 30,
        }
    }

    fn chat_ok(text: &str) -> Result<Value, TransportError> {
        Ok(json!({ "choices": [{ "message": { "content": text } }] }))
    }

    fn anthropic_ok(text: &str) -> Result<Value, TransportError> {
        Ok(json!({ "content": [{ "type": "text", "text": text }] }))
    }

    fn gemini_ok(text: &str) -> Result<Value, TransportError> {
        Ok(json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }))
    }

    #[tokio::test]
    async fn first_success_short_circuits_the_chain() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![chat_ok("  좋은 문구  ")]));
        let chain = FallbackChain::from_config(&keys(true, true, true, true), transport.clone());

        let completion = chain.complete("문구를 다듬어줘").await;

        assert_eq!(completion, "좋은 문구");
        assert_eq!(transport.call_count().await, 1);
        assert_eq!(transport.requested_urls().await, vec![OPENAI_CHAT_URL.to_string()]);
    }

    #[tokio::test]
    async fn failures_fall_through_in_priority_order() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![
            Err(TransportError::Status(500)),
            chat_ok("그록 응답"),
        ]));
        let chain = FallbackChain::from_config(&keys(true, true, false, false), transport.clone());

        let completion = chain.complete("질문").await;

        assert_eq!(completion, "그록 응답");
        assert_eq!(
            transport.requested_urls().await,
            vec![OPENAI_CHAT_URL.to_string(), GROQ_CHAT_URL.to_string()]
        );
    }

    #[tokio::test]
    async fn malformed_and_blank_responses_count_as_no_result() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![
            Ok(json!({ "error": "overloaded" })),
            Ok(json!({ "choices": [{ "message": { "content": "   " } }] })),
            anthropic_ok("앤트로픽 응답"),
        ]));
        let chain = FallbackChain::from_config(&keys(true, true, true, false), transport.clone());

        let completion = chain.complete("질문").await;

        assert_eq!(completion, "앤트로픽 응답");
        assert_eq!(transport.call_count().await, 3);
        assert_eq!(
            transport.requested_urls().await.last().map(String::as_str),
            Some(ANTHROPIC_MESSAGES_URL)
        );
    }

    #[tokio::test]
    async fn ineligible_providers_are_never_attempted() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![gemini_ok("제미니 응답")]));
        let chain = FallbackChain::from_config(&keys(false, false, false, true), transport.clone());

        let completion = chain.complete("질문").await;

        assert_eq!(completion, "제미니 응답");
        let urls = transport.requested_urls().await;
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0], format!("{GEMINI_GENERATE_URL}?key=g-key"));
    }

    #[tokio::test]
    async fn total_failure_returns_the_sentinel() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![
            Err(TransportError::Send("dns failure".to_string())),
            Err(TransportError::Status(429)),
        ]));
        let chain = FallbackChain::from_config(&keys(true, false, false, true), transport.clone());

        let completion = chain.complete("질문").await;

        assert_eq!(completion, GENERATION_FAILED_TEXT);
        assert_eq!(transport.call_count().await, 2);
    }

    #[tokio::test]
    async fn no_eligible_provider_returns_sentinel_without_calls() {
        let transport = Arc::new(ScriptedTransport::default());
        let chain = FallbackChain::from_config(&keys(false, false, false, false), transport.clone());

        let completion = chain.complete("질문").await;

        assert_eq!(completion, GENERATION_FAILED_TEXT);
        assert_eq!(transport.call_count().await, 0);
    }

    #[tokio::test]
    async fn blank_keys_do_not_make_a_provider_eligible() {
        let transport = Arc::new(ScriptedTransport::default());
        let config = ProvidersConfig {
            openai_api_key: Some("   ".to_string().into()),
            groq_api_key: None,
            anthropic_api_key: Some("sk-ant".to_string().into()),
            gemini_api_key: None,
            timeout_secs: 30,
        };

        let chain = FallbackChain::from_config(&config, transport);

        assert_eq!(chain.provider_names(), vec!["anthropic"]);
    }

    #[tokio::test]
    async fn eligibility_keeps_fixed_priority_order() {
        let transport = Arc::new(ScriptedTransport::default());
        let chain = FallbackChain::from_config(&keys(true, true, true, true), transport);

        assert_eq!(chain.provider_names(), vec!["openai", "groq", "anthropic", "gemini"]);
    }

    #[tokio::test]
    async fn generator_seam_never_errors() {
        let transport = Arc::new(ScriptedTransport::default());
        let chain = FallbackChain::from_config(&keys(false, false, false, false), transport);

        let generated = chain.generate("무엇이든").await;

        assert_eq!(generated, Ok(GENERATION_FAILED_TEXT.to_string()));
    }
}
