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

//! Bounded LRU storage for computed values.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use swatch_core::Handle;

/// A thread-safe, size-bounded map from keys to computed values.
///
/// Only fully computed values are ever inserted, so any hit is a valid substitute
/// for recomputation. Inserting an existing key replaces the value; values for the
/// same key are interchangeable, so racing inserts are harmless.
pub struct ValueCache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, Handle<V>>>,
}

impl<K: Hash + Eq, V> ValueCache<K, V> {
    /// Creates a cache holding at most `capacity` values.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Looks up `key`, marking it as most recently used.
    pub fn get(&self, key: &K) -> Option<Handle<V>> {
        self.lock().get(key).cloned()
    }

    /// Looks up `key` without touching its recency.
    pub fn peek(&self, key: &K) -> Option<Handle<V>> {
        self.lock().peek(key).cloned()
    }

    /// Stores `value` under `key`, evicting the least recently used entry when full.
    pub fn insert(&self, key: K, value: Handle<V>) {
        if self.lock().push(key, value).is_some() {
            log::trace!("Value cache replaced or evicted an entry.");
        }
    }

    /// Removes `key`. Returns `true` if it was present.
    pub fn remove(&self, key: &K) -> bool {
        self.lock().pop(key).is_some()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached values.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of cached values.
    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    // The LRU list stays consistent even if a holder panicked, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, LruCache<K, Handle<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> ValueCache<u32, String> {
        ValueCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn insert_then_get() {
        let cache = cache(4);
        assert!(cache.is_empty());
        cache.insert(1, Handle::new("one".to_string()));
        assert_eq!(cache.get(&1).as_deref().map(String::as_str), Some("one"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&2).is_none());
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = cache(2);
        cache.insert(1, Handle::new("one".into()));
        cache.insert(2, Handle::new("two".into()));
        // Touch 1 so that 2 becomes the eviction candidate.
        assert!(cache.get(&1).is_some());
        cache.insert(3, Handle::new("three".into()));

        assert!(cache.peek(&1).is_some());
        assert!(cache.peek(&2).is_none());
        assert!(cache.peek(&3).is_some());
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn last_write_wins() {
        let cache = cache(2);
        cache.insert(1, Handle::new("first".into()));
        cache.insert(1, Handle::new("second".into()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1).as_deref().map(String::as_str), Some("second"));
    }

    #[test]
    fn remove_and_clear() {
        let cache = cache(4);
        cache.insert(1, Handle::new("one".into()));
        cache.insert(2, Handle::new("two".into()));
        assert!(cache.remove(&1));
        assert!(!cache.remove(&1));
        cache.clear();
        assert!(cache.is_empty());
    }
}
