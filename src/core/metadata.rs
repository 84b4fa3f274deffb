use crate::core::retry::{FetchState, RetryPolicy};
use crate::domain::model::Metadata;
use crate::domain::ports::{MetadataCache, MetadataSource};
use crate::utils::error::Result;
use tokio::sync::watch;

/// Fetches franchise metadata, retrying with exponential backoff.
///
/// Progress is published as [`FetchState`] on a watch channel. The retry loop
/// lives inside the future returned by [`MetadataFetcher::fetch`], so dropping
/// that future (or aborting its task) cancels any pending retry.
pub struct MetadataFetcher<S: MetadataSource, C: MetadataCache> {
    source: S,
    cache: C,
    policy: RetryPolicy,
    state: watch::Sender<FetchState<Metadata>>,
}

impl<S: MetadataSource, C: MetadataCache> MetadataFetcher<S, C> {
    pub fn new(source: S, cache: C, policy: RetryPolicy) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            source,
            cache,
            policy,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<Metadata>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FetchState<Metadata> {
        self.state.borrow().clone()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Last metadata that made it into the cache, without touching the network.
    pub async fn cached(&self) -> Result<Option<Metadata>> {
        self.cache.load().await
    }

    pub async fn fetch(&self, token: Option<&str>) -> Result<Metadata> {
        let mut attempt = 1;

        loop {
            self.state.send_replace(FetchState::Loading { attempt });

            match self.source.fetch_metadata(token).await {
                Ok(metadata) => {
                    if let Err(e) = self.cache.store(&metadata).await {
                        tracing::warn!("Could not cache metadata: {}", e);
                    }
                    tracing::info!(
                        attempt,
                        statuses = metadata.statuses.len(),
                        "Fetched franchise metadata"
                    );
                    self.state.send_replace(FetchState::Ready(metadata.clone()));
                    return Ok(metadata);
                }
                Err(e) => {
                    let next = FetchState::after_failure(attempt, e.to_string(), &self.policy);
                    match next {
                        FetchState::Retrying { delay, .. } => {
                            tracing::warn!(
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                "Failed to fetch metadata: {}, retrying",
                                e
                            );
                            self.state.send_replace(next);
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        _ => {
                            tracing::error!(attempt, "Failed to fetch metadata: {}", e);
                            self.state.send_replace(next);
                            return Err(e);
                        }
                    }
                }
            }
        }
    }
}
