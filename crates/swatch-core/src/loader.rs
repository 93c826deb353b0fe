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

//! The two pluggable halves of keyed loading: computing a value and applying it.

use std::{fmt::Debug, hash::Hash};

use crate::{ComputeError, Handle, LoaderError};

/// Produces the derived value for a key.
///
/// Implementations are shared between worker threads, so `compute` takes `&self` and
/// must not rely on running on any particular thread. It may be expensive (I/O,
/// CPU-bound rendering); it never runs on the delivery context.
///
/// # Examples
///
/// ```
/// use swatch_core::{ComputeError, ValueLoader};
///
/// struct Squares;
///
/// impl ValueLoader for Squares {
///     type Key = u32;
///     type Params = ();
///     type Value = u64;
///
///     fn compute(&self, key: &u32, _params: ()) -> Result<u64, ComputeError> {
///         Ok(u64::from(*key) * u64::from(*key))
///     }
/// }
///
/// assert_eq!(Squares.compute(&12, ()), Ok(144));
/// ```
pub trait ValueLoader: Send + Sync + 'static {
    /// Identifies a unit of derived data. Values for equal keys are interchangeable.
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;
    /// Extra inputs forwarded to `compute`. They are not part of the cache key.
    type Params: Send + 'static;
    /// The derived artifact.
    type Value: Send + Sync + 'static;

    /// Checks a request before anything is recorded or scheduled.
    ///
    /// Runs synchronously on the caller's thread; an error is returned from `request`
    /// unchanged.
    fn validate(&self, _key: &Self::Key, _params: &Self::Params) -> Result<(), LoaderError> {
        Ok(())
    }

    /// Computes the value for `key`.
    fn compute(&self, key: &Self::Key, params: Self::Params) -> Result<Self::Value, ComputeError>;
}

/// Applies computed values to consumers.
///
/// A `Deliver` implementation owns (or can reach) the consumer objects. It is only
/// ever called on the delivery context: from `request` on a cache hit, and from the
/// dispatch methods for results coming back from workers.
pub trait Deliver<C, K, V> {
    /// Applies `value`, computed for `key`, to `consumer`.
    fn deliver(&mut self, consumer: &C, key: &K, value: &Handle<V>);

    /// Called when the computation for the consumer's current key failed.
    ///
    /// Nothing was cached, so requesting the key again retries it.
    fn compute_failed(&mut self, _consumer: &C, _key: &K, _error: &ComputeError) {}
}

impl<C, K, V, F> Deliver<C, K, V> for F
where
    F: FnMut(&C, &K, &Handle<V>),
{
    fn deliver(&mut self, consumer: &C, key: &K, value: &Handle<V>) {
        self(consumer, key, value)
    }
}
