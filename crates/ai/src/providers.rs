use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::transport::{ProviderRequest, RequestAuth};

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
pub const GEMINI_GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

const OPENAI_MODEL: &str = "gpt-4o";
const GROQ_MODEL: &str = "llama3-70b-8192";
const ANTHROPIC_MODEL: &str = "claude-3-opus-20240229";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const CHAT_MAX_TOKENS: u32 = 500;
const ANTHROPIC_MAX_TOKENS: u32 = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Groq,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    /// Fixed fallback order. Eligibility filters this list but never
    /// reorders it.
    pub const PRIORITY: [ProviderKind; 4] =
        [ProviderKind::OpenAi, ProviderKind::Groq, ProviderKind::Anthropic, ProviderKind::Gemini];

    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Groq => "groq",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
        }
    }
}

/// One configured provider: a kind plus the credential that makes it
/// eligible. Shapes the request for the provider's endpoint and pulls the
/// completion text out of its response.
pub struct Provider {
    kind: ProviderKind,
    api_key: SecretString,
}

impl Provider {
    pub fn new(kind: ProviderKind, api_key: SecretString) -> Self {
        Self { kind, api_key }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn request(&self, prompt: &str) -> ProviderRequest {
        let key = self.api_key.expose_secret();
        match self.kind {
            ProviderKind::OpenAi => ProviderRequest {
                url: OPENAI_CHAT_URL.to_string(),
                auth: RequestAuth::Bearer(key.to_string()),
                headers: Vec::new(),
                body: chat_body(OPENAI_MODEL, prompt),
            },
            ProviderKind::Groq => ProviderRequest {
                url: GROQ_CHAT_URL.to_string(),
                auth: RequestAuth::Bearer(key.to_string()),
                headers: Vec::new(),
                body: chat_body(GROQ_MODEL, prompt),
            },
            ProviderKind::Anthropic => ProviderRequest {
                url: ANTHROPIC_MESSAGES_URL.to_string(),
                auth: RequestAuth::ApiKeyHeader(key.to_string()),
                headers: vec![("anthropic-version", ANTHROPIC_VERSION)],
                body: json!({
                    "model": ANTHROPIC_MODEL,
                    "max_tokens": ANTHROPIC_MAX_TOKENS,
                    "messages": [{ "role": "user", "content": prompt }],
                }),
            },
            ProviderKind::Gemini => ProviderRequest {
                url: format!("{GEMINI_GENERATE_URL}?key={key}"),
                auth: RequestAuth::None,
                headers: Vec::new(),
                body: json!({
                    "contents": [{ "parts": [{ "text": prompt }] }],
                }),
            },
        }
    }

    /// Pulls the completion text out of a raw response, trimmed. `None` for
    /// any shape mismatch or a blank completion; the chain treats both as
    /// "no result".
    pub fn extract_completion(&self, raw: &Value) -> Option<String> {
        let text = match self.kind {
            ProviderKind::OpenAi | ProviderKind::Groq => extract_chat_completion(raw),
            ProviderKind::Anthropic => extract_anthropic_completion(raw),
            ProviderKind::Gemini => extract_gemini_completion(raw),
        }?;

        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

fn chat_body(model: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
        "max_tokens": CHAT_MAX_TOKENS,
    })
}

// Response mirrors below are deliberately Option-heavy: providers under
// load return partial bodies, and a missing field means "no result", not a
// decode panic.

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

fn extract_chat_completion(raw: &Value) -> Option<String> {
    let response: ChatCompletionResponse = serde_json::from_value(raw.clone()).ok()?;
    response.choices?.into_iter().next()?.message?.content
}

#[derive(Deserialize)]
struct AnthropicMessagesResponse {
    content: Option<Vec<AnthropicContentBlock>>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    text: Option<String>,
}

fn extract_anthropic_completion(raw: &Value) -> Option<String> {
    let response: AnthropicMessagesResponse = serde_json::from_value(raw.clone()).ok()?;
    response.content?.into_iter().next()?.text
}

#[derive(Deserialize)]
struct GeminiGenerateResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    parts: Option<Vec<GeminiCandidatePart>>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

fn extract_gemini_completion(raw: &Value) -> Option<String> {
    let response: GeminiGenerateResponse = serde_json::from_value(raw.clone()).ok()?;
    response.candidates?.into_iter().next()?.content?.parts?.into_iter().next()?.text
}
