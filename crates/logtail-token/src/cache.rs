//! Cached access token policy.
//!
//! A `TokenCache` holds at most one token. `CachedTokenProvider` consults it
//! before delegating to an inner provider, so a token is fetched once and
//! reused until something proves it bad: a failed fetch or a permission
//! failure reported by the stream clears the cache and the next call fetches
//! again. The cache never expires a token on its own.
//!
//! The cache is not keyed by parameters: whatever token is cached is returned
//! for any parameter set.

use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use async_trait::async_trait;
use logtail_core::{AccessToken, AccessTokenProvider, TokenParams, TokenResult};
use tracing::debug;

/// Process-wide cache instance
static GLOBAL_CACHE: LazyLock<Arc<TokenCache>> = LazyLock::new(|| Arc::new(TokenCache::new()));

/// Holds at most one access token.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<AccessToken>>,
    /// Serializes cache misses so concurrent callers share one fetch
    fetch_gate: tokio::sync::Mutex<()>,
}

impl TokenCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by every provider that asks for it.
    pub fn global() -> Arc<Self> {
        GLOBAL_CACHE.clone()
    }

    /// The cached token, if any.
    pub fn get(&self) -> Option<AccessToken> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Store a token, replacing any previous one.
    pub fn set(&self, token: AccessToken) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the cached token.
    pub fn clear(&self) {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Return the cached token or run `fetch` to fill the cache.
    ///
    /// On failure the cache is left empty and the error is returned.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> TokenResult<AccessToken>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = TokenResult<AccessToken>> + Send,
    {
        if let Some(token) = self.get() {
            return Ok(token);
        }

        let _gate = self.fetch_gate.lock().await;
        // Another caller may have filled the cache while we waited
        if let Some(token) = self.get() {
            return Ok(token);
        }

        match fetch().await {
            Ok(token) => {
                self.set(token.clone());
                Ok(token)
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }
}

/// Provider that reuses one cached token across calls.
pub struct CachedTokenProvider<P> {
    inner: P,
    cache: Arc<TokenCache>,
}

impl<P: AccessTokenProvider> CachedTokenProvider<P> {
    /// Wrap `inner` with the given cache.
    pub const fn new(inner: P, cache: Arc<TokenCache>) -> Self {
        Self { inner, cache }
    }

    /// Wrap `inner` with the process-wide cache.
    pub fn with_global_cache(inner: P) -> Self {
        Self::new(inner, TokenCache::global())
    }

    /// The cache backing this provider.
    pub const fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }
}

#[async_trait]
impl<P: AccessTokenProvider> AccessTokenProvider for CachedTokenProvider<P> {
    async fn fetch_access_token(&self, params: &TokenParams) -> TokenResult<AccessToken> {
        self.cache
            .get_or_fetch(|| async {
                debug!("Access token cache miss");
                self.inner.fetch_access_token(params).await
            })
            .await
    }

    fn invalidate(&self) {
        debug!("Invalidating cached access token");
        self.cache.clear();
        self.inner.invalidate();
    }
}
