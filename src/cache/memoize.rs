//! Memoizing Wrapper Module
//!
//! Wraps an async operation so repeated calls with the same effective
//! arguments are answered from a [`Store`] until their TTL runs out.
//!
//! Per call: build the key, look it up, return the stored value on a hit,
//! otherwise run the operation, store a successful result and return it.
//! Failures of the operation are returned unchanged and never stored.
//! Concurrent calls for the same key are not de-duplicated: each may miss
//! and run the operation, and the last write wins.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStats, DisableSwitch, KeyArgs, OperationId, Store};
use crate::error::{CacheError, Result};

/// Derives a key prefix from the call context and arguments.
pub type PrefixFn<C, A> = Arc<dyn Fn(&C, &A) -> String + Send + Sync>;

// == Store Error Policy ==
/// What a wrapper does when the store fails, as opposed to a clean miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreErrorPolicy {
    /// Return the store error to the caller through its own error type.
    #[default]
    Propagate,
    /// Log the failure, run the operation directly and skip the write.
    Bypass,
}

// == Memo Config ==
/// Construction-time settings of a wrapper. Immutable once wrapped.
pub struct MemoConfig<C, A> {
    id: OperationId,
    get_prefix: Option<PrefixFn<C, A>>,
    ttl: Option<Duration>,
    on_store_error: StoreErrorPolicy,
}

impl<C, A> MemoConfig<C, A> {
    /// Settings for the operation `id`: no prefix, no expiry, store errors
    /// propagated.
    pub fn new(id: OperationId) -> Self {
        Self {
            id,
            get_prefix: None,
            ttl: None,
            on_store_error: StoreErrorPolicy::default(),
        }
    }

    /// Prepends a per-call prefix, e.g. the server a client talks to.
    pub fn prefix<P>(mut self, get_prefix: P) -> Self
    where
        P: Fn(&C, &A) -> String + Send + Sync + 'static,
    {
        self.get_prefix = Some(Arc::new(get_prefix));
        self
    }

    /// Stored results expire after this many minutes.
    pub fn minutes(self, minutes: u64) -> Self {
        self.ttl(Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// Stored results expire after `ttl`.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn on_store_error(mut self, policy: StoreErrorPolicy) -> Self {
        self.on_store_error = policy;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.id.owner.is_empty() || self.id.operation.is_empty() {
            return Err(CacheError::InvalidConfig(format!(
                "operation identity needs a non-empty owner and name, got `{}`",
                self.id
            )));
        }
        if self.ttl == Some(Duration::ZERO) {
            return Err(CacheError::InvalidConfig(format!(
                "TTL for `{}` must be greater than zero; omit it for entries that never expire",
                self.id
            )));
        }
        Ok(())
    }
}

impl<C, A> fmt::Debug for MemoConfig<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoConfig")
            .field("id", &self.id)
            .field("has_prefix", &self.get_prefix.is_some())
            .field("ttl", &self.ttl)
            .field("on_store_error", &self.on_store_error)
            .finish()
    }
}

// == Memoized ==
/// An operation `Fn(C, A) -> impl Future<Output = Result<T, E>>` with
/// persistent memoization. Call it through [`Memoized::call`].
pub struct Memoized<F, C, A> {
    operation: F,
    config: MemoConfig<C, A>,
    store: Arc<dyn Store>,
    switch: DisableSwitch,
    stats: Mutex<CacheStats>,
}

/// Wraps `operation` with memoization backed by `store`.
///
/// The configuration is checked here, so a wrapper that cannot work fails
/// when it is built rather than on its first call.
pub fn wrap<F, Fut, C, A>(
    operation: F,
    config: MemoConfig<C, A>,
    store: Arc<dyn Store>,
    switch: DisableSwitch,
) -> Result<Memoized<F, C, A>>
where
    F: Fn(C, A) -> Fut,
    Fut: Future,
{
    config.validate()?;

    Ok(Memoized {
        operation,
        config,
        store,
        switch,
        stats: Mutex::new(CacheStats::new()),
    })
}

impl<F, C, A> Memoized<F, C, A>
where
    A: KeyArgs,
{
    // == Call ==
    /// Invokes the operation, serving the result from the store when a fresh
    /// entry exists for this call.
    pub async fn call<Fut, T, E>(&self, ctx: C, args: A) -> std::result::Result<T, E>
    where
        F: Fn(C, A) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
    {
        if self.switch.is_disabled() {
            self.record(CacheStats::record_bypass);
            return (self.operation)(ctx, args).await;
        }

        let key = match self.key_for(&ctx, &args) {
            Ok(key) => key,
            Err(e) => match self.config.on_store_error {
                StoreErrorPolicy::Propagate => return Err(e.into()),
                StoreErrorPolicy::Bypass => {
                    warn!(
                        operation = %self.config.id,
                        error = %e,
                        "Cache key could not be built, calling operation directly"
                    );
                    self.record(CacheStats::record_bypass);
                    return (self.operation)(ctx, args).await;
                }
            },
        };

        match self.store.get(key.as_str()).await {
            Ok(Some(cached)) => match serde_json::from_value::<T>(cached) {
                Ok(value) => {
                    debug!(key = %key, "Cache hit");
                    self.record(CacheStats::record_hit);
                    return Ok(value);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Cached value no longer decodes, refreshing");
                }
            },
            Ok(None) => {}
            Err(e) => match self.config.on_store_error {
                StoreErrorPolicy::Propagate => return Err(e.into()),
                StoreErrorPolicy::Bypass => {
                    warn!(
                        key = %key,
                        error = %e,
                        "Cache store read failed, calling operation directly"
                    );
                    self.record(CacheStats::record_bypass);
                    return (self.operation)(ctx, args).await;
                }
            },
        }

        debug!(key = %key, "Cache miss");
        self.record(CacheStats::record_miss);

        let result = (self.operation)(ctx, args).await?;

        match self.persist(&key, &result).await {
            Ok(()) => {
                self.record(CacheStats::record_store);
                Ok(result)
            }
            Err(e) => match self.config.on_store_error {
                StoreErrorPolicy::Propagate => Err(e.into()),
                StoreErrorPolicy::Bypass => {
                    warn!(key = %key, error = %e, "Cache store write failed, result not cached");
                    self.record(CacheStats::record_bypass);
                    Ok(result)
                }
            },
        }
    }

    /// Key this wrapper would use for a call.
    pub fn key_for(&self, ctx: &C, args: &A) -> Result<CacheKey> {
        let prefix = self
            .config
            .get_prefix
            .as_ref()
            .map(|get_prefix| get_prefix(ctx, args))
            .unwrap_or_default();

        CacheKey::build(&prefix, self.config.id, args)
    }

    /// Drops the stored result for a call, if any.
    pub async fn invalidate(&self, ctx: &C, args: &A) -> Result<bool> {
        let key = self.key_for(ctx, args)?;
        self.store.delete(key.as_str()).await
    }

    async fn persist<T: Serialize>(&self, key: &CacheKey, result: &T) -> Result<()> {
        let value = serde_json::to_value(result)?;
        self.store.set(key.as_str(), value, self.config.ttl).await?;
        debug!(key = %key, ttl = ?self.config.ttl, "Stored result");
        Ok(())
    }
}

impl<F, C, A> Memoized<F, C, A> {
    pub fn id(&self) -> OperationId {
        self.config.id
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.config.ttl
    }

    /// Snapshot of this wrapper's counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, update: fn(&mut CacheStats)) {
        update(&mut self.stats.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl<F, C, A> fmt::Debug for Memoized<F, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("config", &self.config)
            .field("switch", &self.switch)
            .finish_non_exhaustive()
    }
}
