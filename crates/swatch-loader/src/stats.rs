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

//! Counters describing what a loader has been doing.

use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for a loader.
#[derive(Debug, Default)]
pub struct LoaderStats {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    computations: AtomicU64,
    failures: AtomicU64,
    delivered: AtomicU64,
    discarded_stale: AtomicU64,
}

/// A point-in-time copy of [`LoaderStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderStatsSnapshot {
    /// Accepted `request` calls.
    pub requests: u64,
    /// Requests served synchronously from the cache.
    pub cache_hits: u64,
    /// Requests that scheduled a computation.
    pub cache_misses: u64,
    /// Calls into `ValueLoader::compute`.
    pub computations: u64,
    /// Computations that returned an error or panicked.
    pub failures: u64,
    /// Values applied to consumers, from the cache or from workers.
    pub delivered: u64,
    /// Worker results dropped because the consumer moved on or was released.
    pub discarded_stale: u64,
}

impl LoaderStats {
    pub(crate) fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_computation(&self) {
        self.computations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivery(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale(&self) {
        self.discarded_stale.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current counter values.
    pub fn snapshot(&self) -> LoaderStatsSnapshot {
        LoaderStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            discarded_stale: self.discarded_stale.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_events() {
        let stats = LoaderStats::default();
        stats.record_request();
        stats.record_request();
        stats.record_hit();
        stats.record_miss();
        stats.record_computation();
        stats.record_delivery();
        stats.record_stale();

        assert_eq!(
            stats.snapshot(),
            LoaderStatsSnapshot {
                requests: 2,
                cache_hits: 1,
                cache_misses: 1,
                computations: 1,
                failures: 0,
                delivered: 1,
                discarded_stale: 1,
            }
        );
    }
}
