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

//! Asynchronous, cache-backed keyed loading.
//!
//! [`AsyncKeyedLoader`] computes values for keys on a pool of worker threads, caches
//! them in a bounded LRU cache and hands them to consumers on a single delivery
//! context. Each consumer only ever receives the value of the key it asked for last.
//!
//! The building blocks are public so they can be reused on their own:
//! - [`ValueCache`]: the bounded, thread-safe value cache.
//! - [`ConsumerRegistry`]: the consumer → latest key map used to drop stale results.
//! - [`WorkerPool`]: named worker threads fed by a `crossbeam-channel` queue.
//! - [`DeliveryBus`]: the `flume` channel workers use to hand results back.

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod loader;
pub mod pool;
pub mod registry;
pub mod stats;

pub use cache::ValueCache;
pub use config::LoaderConfig;
pub use dispatch::{Delivery, DeliveryBus, DeliveryPublisher};
pub use loader::{AsyncKeyedLoader, RequestOutcome};
pub use pool::{Job, WorkerPool};
pub use registry::ConsumerRegistry;
pub use stats::{LoaderStats, LoaderStatsSnapshot};

pub use swatch_core::{ComputeError, Deliver, Handle, LoaderError, ValueLoader};
