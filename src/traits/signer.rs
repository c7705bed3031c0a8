use async_trait::async_trait;

/// Deterministic one-way string digests used by the digest handlers.
#[async_trait]
pub trait DigestProvider: Send + Sync {
    /// Short checksum; safe to call concurrently.
    async fn checksum(&self, data: &str) -> String;

    /// Long fingerprint. Not reentrant: callers serialize it themselves.
    async fn fingerprint(&self, data: &str) -> String;

    fn name(&self) -> &'static str;
}
