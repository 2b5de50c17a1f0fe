//! Rate Limiting Infrastructure
//!
//! Fixed-window rate limiting over a shared counter store. Each identity
//! (a client IP) owns one counter key; the key is created on the first
//! request with a TTL equal to the window and is never refreshed, so all
//! requests inside the TTL share one bucket and the count restarts at 1
//! once the store expires the key.
//!
//! Known limitation of the fixed window: a client can spend a full budget
//! just before expiry and another full budget just after, up to twice the
//! threshold in a short span.
//!
//! The limiter holds no mutable state of its own. Correctness under
//! concurrent callers comes entirely from the store executing the
//! increment and the create-only expiry as one indivisible batch.

use std::time::Duration;

use thiserror::Error;

/// Namespace prefix for counter keys: `rate_limit:ip:<identity>`.
const KEY_PREFIX: &str = "rate_limit:ip";

/// Default store round-trip deadline.
const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Rate limit configuration
///
/// Fixed for the process lifetime; no runtime mutation is exposed.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Policy on counter-store failure: `true` admits, `false` denies.
    /// Denying is the conservative default.
    pub fail_open: bool,
    /// Deadline for the single store round trip per check
    pub store_timeout: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
            fail_open: false,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl RateLimitConfig {
    /// Create a config with the given threshold and window.
    ///
    /// Invalid values are clamped to the minimum (threshold 1, window 1s)
    /// instead of panicking.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window: Duration::from_secs(window_secs.max(1)),
            ..Default::default()
        }
    }

    /// Same config with the failure policy flipped to admit on store error.
    pub fn with_fail_open(mut self, fail_open: bool) -> Self {
        self.fail_open = fail_open;
        self
    }
}

/// Errors from a counter store backend
#[derive(Debug, Error)]
pub enum CounterError {
    /// Underlying Redis command or connection failure
    #[error("counter store error: {0}")]
    Backend(#[from] redis::RedisError),

    /// Store unreachable or otherwise unusable
    #[error("counter store unavailable: {0}")]
    Unavailable(String),
}

/// Trait for counter store backends
///
/// One logical operation: increment the counter under `key` (creating it at
/// 1 if absent) and attach a TTL of `window` only if the key carries none,
/// executed as a single atomic batch. Returns the post-increment count.
#[trait_variant::make(CounterStore: Send)]
pub trait LocalCounterStore {
    async fn incr_with_window(&self, key: &str, window: Duration) -> Result<i64, CounterError>;
}

/// Fixed-window rate limiter over a shared counter store.
///
/// Constructed once at startup with the store handle and config, then shared
/// across request tasks. Safe for concurrent use as long as the store handle
/// is.
pub struct RateLimiter<S>
where
    S: CounterStore,
{
    store: S,
    config: RateLimitConfig,
}

impl<S> RateLimiter<S>
where
    S: CounterStore + Sync,
{
    pub fn new(store: S, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Decide whether a request from `identity` is admitted.
    ///
    /// An empty identity is denied outright without touching the store.
    /// Store failure or timeout resolves to the configured failure policy;
    /// the caller cannot distinguish it from an exceeded budget.
    pub async fn allow(&self, identity: &str) -> bool {
        if identity.is_empty() {
            tracing::debug!("Rejecting request without client identity");
            return false;
        }

        let key = counter_key(identity);

        let count = match tokio::time::timeout(
            self.config.store_timeout,
            self.store.incr_with_window(&key, self.config.window),
        )
        .await
        {
            Ok(Ok(count)) => count,
            Ok(Err(e)) => {
                tracing::error!(error = %e, key = %key, "Counter store error during rate limit check");
                return self.config.fail_open;
            }
            Err(_) => {
                tracing::error!(key = %key, "Counter store call exceeded deadline");
                return self.config.fail_open;
            }
        };

        if count > i64::from(self.config.max_requests) {
            tracing::warn!(
                identity = %identity,
                count = count,
                max = self.config.max_requests,
                "Rate limit exceeded"
            );
            return false;
        }

        true
    }
}

fn counter_key(identity: &str) -> String {
    format!("{}:{}", KEY_PREFIX, identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Records every key it is asked about; always answers 1.
    #[derive(Clone, Default)]
    struct RecordingStore {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl CounterStore for RecordingStore {
        async fn incr_with_window(
            &self,
            key: &str,
            _window: Duration,
        ) -> Result<i64, CounterError> {
            self.calls.lock().unwrap().push(key.to_string());
            Ok(1)
        }
    }

    /// Counter store over a plain map; no TTL, eviction is explicit.
    #[derive(Clone, Default)]
    struct InMemoryStore {
        counters: Arc<Mutex<HashMap<String, i64>>>,
    }

    impl InMemoryStore {
        /// Simulate the store expiring every key.
        fn evict_all(&self) {
            self.counters.lock().unwrap().clear();
        }

        fn count(&self, key: &str) -> i64 {
            self.counters.lock().unwrap().get(key).copied().unwrap_or(0)
        }
    }

    impl CounterStore for InMemoryStore {
        async fn incr_with_window(
            &self,
            key: &str,
            _window: Duration,
        ) -> Result<i64, CounterError> {
            let mut counters = self.counters.lock().unwrap();
            let count = counters.entry(key.to_string()).or_insert(0);
            *count += 1;
            Ok(*count)
        }
    }

    #[derive(Clone)]
    struct FailingStore;

    impl CounterStore for FailingStore {
        async fn incr_with_window(
            &self,
            _key: &str,
            _window: Duration,
        ) -> Result<i64, CounterError> {
            Err(CounterError::Unavailable("connection refused".to_string()))
        }
    }

    /// Never answers; used to exercise the store deadline.
    #[derive(Clone)]
    struct HangingStore;

    impl CounterStore for HangingStore {
        async fn incr_with_window(
            &self,
            _key: &str,
            _window: Duration,
        ) -> Result<i64, CounterError> {
            std::future::pending().await
        }
    }

    #[test]
    fn test_counter_key_format() {
        assert_eq!(counter_key("1.2.3.4"), "rate_limit:ip:1.2.3.4");
    }

    #[test]
    fn test_config_clamps_invalid_values() {
        let config = RateLimitConfig::new(0, 0);
        assert_eq!(config.max_requests, 1);
        assert_eq!(config.window, Duration::from_secs(1));
        assert!(!config.fail_open);
    }

    #[tokio::test]
    async fn test_empty_identity_denied_without_store_access() {
        let store = RecordingStore::default();
        let limiter = RateLimiter::new(store.clone(), RateLimitConfig::new(5, 60));

        assert!(!limiter.allow("").await);
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_allows_up_to_threshold_then_denies() {
        let store = InMemoryStore::default();
        let limiter = RateLimiter::new(store.clone(), RateLimitConfig::new(5, 60));

        for _ in 0..5 {
            assert!(limiter.allow("1.2.3.4").await);
        }
        assert!(!limiter.allow("1.2.3.4").await);
        assert_eq!(store.count("rate_limit:ip:1.2.3.4"), 6);
    }

    #[tokio::test]
    async fn test_window_expiry_restarts_budget() {
        let store = InMemoryStore::default();
        let limiter = RateLimiter::new(store.clone(), RateLimitConfig::new(3, 60));

        for _ in 0..3 {
            assert!(limiter.allow("1.2.3.4").await);
        }
        assert!(!limiter.allow("1.2.3.4").await);

        // The store expiring the key opens a fresh window.
        store.evict_all();
        for _ in 0..3 {
            assert!(limiter.allow("1.2.3.4").await);
        }
        assert_eq!(store.count("rate_limit:ip:1.2.3.4"), 3);
    }

    #[tokio::test]
    async fn test_identities_have_independent_budgets() {
        let store = InMemoryStore::default();
        let limiter = RateLimiter::new(store, RateLimitConfig::new(2, 60));

        assert!(limiter.allow("1.1.1.1").await);
        assert!(limiter.allow("1.1.1.1").await);
        assert!(!limiter.allow("1.1.1.1").await);

        assert!(limiter.allow("2.2.2.2").await);
        assert!(limiter.allow("2.2.2.2").await);
    }

    #[tokio::test]
    async fn test_backend_failure_denies_by_default() {
        let limiter = RateLimiter::new(FailingStore, RateLimitConfig::new(5, 60));
        assert!(!limiter.allow("1.2.3.4").await);
    }

    #[tokio::test]
    async fn test_backend_failure_admits_when_fail_open() {
        let config = RateLimitConfig::new(5, 60).with_fail_open(true);
        let limiter = RateLimiter::new(FailingStore, config);
        assert!(limiter.allow("1.2.3.4").await);
    }

    #[tokio::test]
    async fn test_store_deadline_resolves_to_failure_policy() {
        let mut config = RateLimitConfig::new(5, 60);
        config.store_timeout = Duration::from_millis(10);
        let limiter = RateLimiter::new(HangingStore, config);
        assert!(!limiter.allow("1.2.3.4").await);

        let mut config = RateLimitConfig::new(5, 60).with_fail_open(true);
        config.store_timeout = Duration::from_millis(10);
        let limiter = RateLimiter::new(HangingStore, config);
        assert!(limiter.allow("1.2.3.4").await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_callers_share_one_budget() {
        let store = InMemoryStore::default();
        let limiter = Arc::new(RateLimiter::new(store.clone(), RateLimitConfig::new(5, 60)));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(
                async move { limiter.allow("1.2.3.4").await },
            ));
        }

        let mut admitted = 0;
        let mut rejected = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            } else {
                rejected += 1;
            }
        }

        // Exactly the threshold gets through; no increment is lost.
        assert_eq!(admitted, 5);
        assert_eq!(rejected, 3);
        assert_eq!(store.count("rate_limit:ip:1.2.3.4"), 8);
    }
}
