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

//! Tracks the latest key each consumer asked for.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Maps each consumer to the key it most recently requested.
///
/// Results coming back from workers are checked against this map before they are
/// applied: a consumer that has since asked for another key, or has been released,
/// does not receive them. The registry stores consumer identifiers only, never the
/// consumer objects, so it does not keep anything alive.
pub struct ConsumerRegistry<C, K> {
    current: RwLock<HashMap<C, K>>,
}

impl<C: Hash + Eq, K: PartialEq + Clone> ConsumerRegistry<C, K> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(HashMap::new()),
        }
    }

    /// Records `key` as the consumer's latest request. Returns the key it replaces.
    pub fn register(&self, consumer: C, key: K) -> Option<K> {
        self.write().insert(consumer, key)
    }

    /// Returns `true` if `key` is still what the consumer wants.
    pub fn is_current(&self, consumer: &C, key: &K) -> bool {
        self.read().get(consumer).is_some_and(|current| current == key)
    }

    /// The consumer's latest requested key, if it is registered.
    pub fn current_key(&self, consumer: &C) -> Option<K> {
        self.read().get(consumer).cloned()
    }

    /// Forgets a consumer. Returns `true` if it was registered.
    pub fn release(&self, consumer: &C) -> bool {
        self.write().remove(consumer).is_some()
    }

    /// Number of registered consumers.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if no consumer is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<C, K>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<C, K>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Hash + Eq, K: PartialEq + Clone> Default for ConsumerRegistry<C, K> {
    fn default() -> Self {
        Self::new()
    }
}
