//! HTTP clients for the external embedding and rerank providers.
//!
//! Both capabilities are synchronous request/response JSON endpoints.
//! Inputs are truncated to a safe length before the call; responses are
//! order-preserving, one entry per input.

use quarry_core::config::ProviderConfig;
use quarry_core::errors::{ProviderError, QuarryError, QuarryResult};
use quarry_core::traits::{IEmbeddingProvider, IRerankProvider};
use serde::{Deserialize, Serialize};

/// Truncate text to at most `max_chars` characters, on a char boundary.
pub fn truncate_input(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => text[..byte].to_string(),
        None => text.to_string(),
    }
}

fn build_client(timeout_secs: u64) -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

fn check_credentials(config: &ProviderConfig, provider: &str) -> QuarryResult<()> {
    if config.api_key.is_empty() {
        return Err(ProviderError::MissingCredentials {
            provider: provider.to_string(),
        }
        .into());
    }
    Ok(())
}

fn classify_response(
    provider: &str,
    response: reqwest::blocking::Response,
) -> QuarryResult<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_server_error() {
        return Err(ProviderError::Transient {
            provider: provider.to_string(),
            reason: format!("HTTP {status}"),
        }
        .into());
    }
    if !status.is_success() {
        return Err(ProviderError::MalformedResponse {
            provider: provider.to_string(),
            reason: format!("HTTP {status}"),
        }
        .into());
    }
    Ok(response)
}

// --- Embedding provider ---

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embedding provider speaking a batch JSON protocol:
/// `{"input": [...]}` → `{"embeddings": [[...], ...]}`.
pub struct HttpEmbeddingProvider {
    client: reqwest::blocking::Client,
    config: ProviderConfig,
}

impl HttpEmbeddingProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_client(config.timeout_secs);
        Self { client, config }
    }
}

impl IEmbeddingProvider for HttpEmbeddingProvider {
    fn embed(&self, text: &str) -> QuarryResult<Vec<f32>> {
        let mut batch = self.embed_batch(&[text.to_string()])?;
        batch.pop().ok_or_else(|| {
            QuarryError::from(ProviderError::MalformedResponse {
                provider: self.name().to_string(),
                reason: "empty embedding batch".to_string(),
            })
        })
    }

    fn embed_batch(&self, texts: &[String]) -> QuarryResult<Vec<Vec<f32>>> {
        check_credentials(&self.config, self.name())?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<String> = texts
            .iter()
            .map(|t| truncate_input(t, self.config.max_input_chars))
            .collect();

        let response = self
            .client
            .post(&self.config.embedding_endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&EmbedRequest { input: &inputs })
            .send()
            .map_err(|e| ProviderError::Transient {
                provider: self.name().to_string(),
                reason: e.to_string(),
            })?;

        let parsed: EmbedResponse = classify_response(self.name(), response)?
            .json()
            .map_err(|e| ProviderError::MalformedResponse {
                provider: self.name().to_string(),
                reason: e.to_string(),
            })?;

        if parsed.embeddings.len() != texts.len() {
            return Err(ProviderError::MalformedResponse {
                provider: self.name().to_string(),
                reason: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    parsed.embeddings.len()
                ),
            }
            .into());
        }

        Ok(parsed.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "http-embedder"
    }

    fn is_available(&self) -> bool {
        !self.config.api_key.is_empty() && !self.config.embedding_endpoint.is_empty()
    }
}

// --- Rerank provider ---

#[derive(Serialize)]
struct RerankRequest<'a> {
    query: &'a str,
    documents: &'a [String],
}

#[derive(Deserialize)]
struct RerankResponse {
    scores: Vec<f32>,
}

/// Rerank provider: `{"query", "documents"}` → `{"scores": [...]}`.
///
/// A response with fewer scores than documents is returned as-is; the
/// adapter keeps fused scores for the unscored tail.
pub struct HttpRerankProvider {
    client: reqwest::blocking::Client,
    config: ProviderConfig,
}

impl HttpRerankProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_client(config.timeout_secs);
        Self { client, config }
    }
}

impl IRerankProvider for HttpRerankProvider {
    fn rerank(&self, query: &str, candidates: &[String]) -> QuarryResult<Vec<f32>> {
        check_credentials(&self.config, self.name())?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(&self.config.rerank_endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&RerankRequest {
                query,
                documents: candidates,
            })
            .send()
            .map_err(|e| ProviderError::Transient {
                provider: self.name().to_string(),
                reason: e.to_string(),
            })?;

        let parsed: RerankResponse = classify_response(self.name(), response)?
            .json()
            .map_err(|e| ProviderError::MalformedResponse {
                provider: self.name().to_string(),
                reason: e.to_string(),
            })?;

        Ok(parsed.scores)
    }

    fn name(&self) -> &str {
        "http-reranker"
    }

    fn is_available(&self) -> bool {
        !self.config.api_key.is_empty() && !self.config.rerank_endpoint.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_input("hello", 10), "hello");
        assert_eq!(truncate_input("hello", 3), "hel");
        // Multibyte chars are never split.
        assert_eq!(truncate_input("配置路由器", 2), "配置");
    }

    #[test]
    fn missing_credentials_is_fatal_not_transient() {
        let provider = HttpEmbeddingProvider::new(ProviderConfig::default());
        let err = provider.embed_batch(&["text".to_string()]).unwrap_err();
        match err {
            QuarryError::Provider(p) => assert!(!p.is_retryable()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unconfigured_provider_reports_unavailable() {
        let provider = HttpEmbeddingProvider::new(ProviderConfig::default());
        assert!(!provider.is_available());
        let reranker = HttpRerankProvider::new(ProviderConfig::default());
        assert!(!reranker.is_available());
    }
}
