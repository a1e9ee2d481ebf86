/// Errors from external embedding/rerank providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Missing API credentials. Fatal to the calling task, never retried.
    #[error("missing credentials for provider {provider}")]
    MissingCredentials { provider: String },

    /// Network failure or 5xx response. Retried with bounded backoff.
    #[error("transient failure from provider {provider}: {reason}")]
    Transient { provider: String, reason: String },

    /// Provider answered but the payload was unusable.
    #[error("malformed response from provider {provider}: {reason}")]
    MalformedResponse { provider: String, reason: String },
}

impl ProviderError {
    /// Whether a retry with backoff is worth attempting.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Transient { .. })
    }
}
