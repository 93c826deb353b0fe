// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The asynchronous, cache-backed keyed loader.

use std::any::Any;
use std::fmt::Debug;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use swatch_core::{ComputeError, Deliver, Handle, LoaderError, ValueLoader};

use crate::cache::ValueCache;
use crate::config::LoaderConfig;
use crate::dispatch::{Delivery, DeliveryBus};
use crate::pool::WorkerPool;
use crate::registry::ConsumerRegistry;
use crate::stats::{LoaderStats, LoaderStatsSnapshot};

type KeyOf<L> = <L as ValueLoader>::Key;
type ValueOf<L> = <L as ValueLoader>::Value;
type DeliveryOf<L, C> = Delivery<C, KeyOf<L>, ValueOf<L>>;

/// What `request` did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The value was cached and has already been delivered.
    Delivered,
    /// A computation was queued; the result arrives through a dispatch call.
    Scheduled,
}

/// State shared between the loader front-end and its worker jobs.
struct Shared<L: ValueLoader, C> {
    loader: L,
    cache: ValueCache<L::Key, L::Value>,
    registry: ConsumerRegistry<C, L::Key>,
    stats: LoaderStats,
    in_flight: AtomicUsize,
}

impl<L: ValueLoader, C> Shared<L, C> {
    fn compute(&self, key: &L::Key, params: L::Params) -> Result<L::Value, ComputeError> {
        self.stats.record_computation();
        match panic::catch_unwind(AssertUnwindSafe(|| self.loader.compute(key, params))) {
            Ok(result) => result,
            Err(payload) => Err(ComputeError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

/// Loads or computes a value per key and hands it to consumers without ever
/// applying a stale result.
///
/// * A cache hit is delivered synchronously from [`request`](Self::request).
/// * A miss is computed on the worker pool. The result is cached and queued on the
///   delivery bus; a dispatch method called on the delivery context applies it, but
///   only if the consumer still wants that key.
///
/// The thread that calls `request` and the dispatch methods is the delivery context.
/// `Deliver` implementations are never called from workers.
pub struct AsyncKeyedLoader<L: ValueLoader, C> {
    // Dropped first: workers are joined while the bus can still receive.
    pool: WorkerPool,
    shared: Arc<Shared<L, C>>,
    bus: DeliveryBus<DeliveryOf<L, C>>,
    config: LoaderConfig,
}

impl<L, C> AsyncKeyedLoader<L, C>
where
    L: ValueLoader,
    C: Clone + Eq + Hash + Debug + Send + Sync + 'static,
{
    /// Starts a loader with its own worker pool.
    ///
    /// ## Arguments
    /// * `loader` - Computes values for keys that are not cached.
    /// * `config` - Worker count, cache capacity and thread names.
    ///
    /// ## Returns
    /// The running loader, or [`LoaderError::InvalidConfig`] if `config` is rejected.
    pub fn new(loader: L, config: LoaderConfig) -> Result<Self, LoaderError> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.cache_capacity).ok_or_else(|| {
            LoaderError::InvalidConfig("cache_capacity must be at least 1".into())
        })?;

        let pool = WorkerPool::new(config.worker_count, &config.thread_name_prefix)?;

        Ok(Self {
            shared: Arc::new(Shared {
                loader,
                cache: ValueCache::new(capacity),
                registry: ConsumerRegistry::new(),
                stats: LoaderStats::default(),
                in_flight: AtomicUsize::new(0),
            }),
            bus: DeliveryBus::new(),
            pool,
            config,
        })
    }

    /// Starts a loader with [`LoaderConfig::default`].
    pub fn with_defaults(loader: L) -> Result<Self, LoaderError> {
        Self::new(loader, LoaderConfig::default())
    }

    /// Asks for the value of `key` on behalf of `consumer`.
    ///
    /// The consumer's previous request, if any, is superseded: its result will be
    /// dropped when it comes back. Never blocks on computation.
    ///
    /// ## Arguments
    /// * `key` - The key whose value is wanted.
    /// * `consumer` - Who the value is for. Its latest key decides staleness.
    /// * `params` - Forwarded to the computation on a miss. Not part of the cache key.
    /// * `sink` - Receives the value right away on a cache hit.
    ///
    /// ## Returns
    /// [`RequestOutcome::Delivered`] on a hit, [`RequestOutcome::Scheduled`] on a miss,
    /// or an error if the request is invalid or the loader is shut down.
    pub fn request<D>(
        &self,
        key: L::Key,
        consumer: C,
        params: L::Params,
        sink: &mut D,
    ) -> Result<RequestOutcome, LoaderError>
    where
        D: Deliver<C, L::Key, L::Value> + ?Sized,
    {
        if !self.pool.is_running() {
            return Err(LoaderError::ShutDown);
        }
        self.shared.loader.validate(&key, &params)?;

        let shared = &self.shared;
        shared.stats.record_request();
        shared.registry.register(consumer.clone(), key.clone());

        if let Some(value) = shared.cache.get(&key) {
            log::debug!("Cache hit for {key:?}, delivering to {consumer:?}.");
            shared.stats.record_hit();
            sink.deliver(&consumer, &key, &value);
            shared.stats.record_delivery();
            return Ok(RequestOutcome::Delivered);
        }

        log::debug!("Cache miss for {key:?}, scheduling for {consumer:?}.");
        shared.stats.record_miss();
        shared.in_flight.fetch_add(1, Ordering::SeqCst);

        let job_shared = Arc::clone(shared);
        let publisher = self.bus.publisher();
        let submitted = self.pool.submit(Box::new(move || {
            let result = job_shared.compute(&key, params).map(|value| {
                let value = Handle::new(value);
                job_shared.cache.insert(key.clone(), value.clone());
                value
            });

            if let Err(e) = &result {
                job_shared.stats.record_failure();
                log::warn!("Computing {key:?} failed: {e}. Nothing was cached.");
            }

            publisher.publish(Delivery {
                consumer,
                key,
                result,
            });
            // Decrement only after the message is on the bus so that "nothing in flight
            // and an empty bus" really means idle.
            job_shared.in_flight.fetch_sub(1, Ordering::SeqCst);
        }));

        if let Err(e) = submitted {
            shared.in_flight.fetch_sub(1, Ordering::SeqCst);
            return Err(e);
        }
        Ok(RequestOutcome::Scheduled)
    }

    /// Applies every result already waiting on the bus. Returns how many were applied.
    pub fn dispatch_pending<D>(&self, sink: &mut D) -> usize
    where
        D: Deliver<C, L::Key, L::Value> + ?Sized,
    {
        let mut applied = 0;
        while let Some(delivery) = self.bus.try_next() {
            if self.apply(delivery, sink) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits up to `timeout` for at least one result, then applies everything pending.
    pub fn dispatch_blocking<D>(&self, sink: &mut D, timeout: Duration) -> usize
    where
        D: Deliver<C, L::Key, L::Value> + ?Sized,
    {
        let Some(first) = self.bus.next_timeout(timeout) else {
            return 0;
        };
        let applied = usize::from(self.apply(first, sink));
        applied + self.dispatch_pending(sink)
    }

    /// Keeps dispatching until no computation is in flight and the bus is empty, or
    /// until `timeout` elapses.
    ///
    /// A timeout too large to be represented as a deadline (e.g. `Duration::MAX`)
    /// means "wait until idle".
    pub fn dispatch_until_idle<D>(&self, sink: &mut D, timeout: Duration) -> usize
    where
        D: Deliver<C, L::Key, L::Value> + ?Sized,
    {
        const POLL: Duration = Duration::from_millis(10);

        let deadline = Instant::now().checked_add(timeout);
        let mut applied = 0;
        loop {
            applied += self.dispatch_pending(sink);
            if self.is_idle() {
                return applied + self.dispatch_pending(sink);
            }
            let wait = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        log::debug!(
                            "Dispatch timed out with {} computation(s) in flight.",
                            self.in_flight()
                        );
                        return applied;
                    }
                    (deadline - now).min(POLL)
                }
                None => POLL,
            };
            if let Some(delivery) = self.bus.next_timeout(wait) {
                applied += usize::from(self.apply(delivery, sink));
            }
        }
    }

    /// Forgets a consumer. Results still in flight for it are discarded.
    pub fn release(&self, consumer: &C) -> bool {
        self.shared.registry.release(consumer)
    }

    /// The key the consumer most recently requested.
    pub fn current_key(&self, consumer: &C) -> Option<L::Key> {
        self.shared.registry.current_key(consumer)
    }

    /// Peeks at the cache without involving any consumer.
    pub fn cached(&self, key: &L::Key) -> Option<Handle<L::Value>> {
        self.shared.cache.peek(key)
    }

    /// Evicts one key so the next request recomputes it.
    pub fn invalidate(&self, key: &L::Key) -> bool {
        self.shared.cache.remove(key)
    }

    /// Evicts everything.
    pub fn clear_cache(&self) {
        self.shared.cache.clear();
    }

    /// Number of cached values.
    pub fn cache_len(&self) -> usize {
        self.shared.cache.len()
    }

    /// Computations queued or running whose result is not on the bus yet.
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.load(Ordering::SeqCst)
    }

    /// Returns `true` when nothing is computing and nothing waits to be dispatched.
    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0 && self.bus.is_empty()
    }

    /// Counter snapshot.
    pub fn stats(&self) -> LoaderStatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// The configuration the loader was started with.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The user-supplied loader.
    pub fn loader(&self) -> &L {
        &self.shared.loader
    }

    /// Stops accepting requests and waits for queued computations to finish.
    ///
    /// Their results stay on the bus and can still be dispatched.
    pub fn shutdown(&mut self) {
        self.pool.shutdown();
    }

    fn apply<D>(&self, delivery: DeliveryOf<L, C>, sink: &mut D) -> bool
    where
        D: Deliver<C, L::Key, L::Value> + ?Sized,
    {
        let Delivery {
            consumer,
            key,
            result,
        } = delivery;

        if !self.shared.registry.is_current(&consumer, &key) {
            log::trace!("Dropping stale result {key:?} for {consumer:?}.");
            self.shared.stats.record_stale();
            return false;
        }

        match result {
            Ok(value) => {
                sink.deliver(&consumer, &key, &value);
                self.shared.stats.record_delivery();
            }
            Err(error) => sink.compute_failed(&consumer, &key, &error),
        }
        true
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
