use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("provider request failed: {0}")]
    Send(String),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("provider response was not decodable json: {0}")]
    Decode(String),
}

/// Auth scheme for one provider call. Gemini carries its key as a query
/// parameter baked into the endpoint URL, so it needs no header.
#[derive(Clone, PartialEq, Eq)]
pub enum RequestAuth {
    Bearer(String),
    ApiKeyHeader(String),
    None,
}

impl fmt::Debug for RequestAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestAuth::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            RequestAuth::ApiKeyHeader(_) => f.write_str("ApiKeyHeader(<redacted>)"),
            RequestAuth::None => f.write_str("None"),
        }
    }
}

/// One fully shaped outbound provider call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderRequest {
    pub url: String,
    pub auth: RequestAuth,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Value,
}

/// Single-attempt JSON POST. Retries are not this layer's job; the chain
/// moves to the next provider instead.
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    async fn post_json(&self, request: ProviderRequest) -> Result<Value, TransportError>;
}

pub struct HttpProviderTransport {
    http: reqwest::Client,
}

impl HttpProviderTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ProviderTransport for HttpProviderTransport {
    async fn post_json(&self, request: ProviderRequest) -> Result<Value, TransportError> {
        let mut builder = self.http.post(&request.url).json(&request.body);

        builder = match &request.auth {
            RequestAuth::Bearer(token) => builder.bearer_auth(token),
            RequestAuth::ApiKeyHeader(key) => builder.header("x-api-key", key),
            RequestAuth::None => builder,
        };
        for (name, value) in &request.headers {
            builder = builder.header(*name, *value);
        }

        let response =
            builder.send().await.map_err(|err| TransportError::Send(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response.json().await.map_err(|err| TransportError::Decode(err.to_string()))
    }
}
