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

//! Stress: many producers, randomized computation delays, one delivery context.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use rand::Rng;
use swatch_loader::{AsyncKeyedLoader, ComputeError, Handle, LoaderConfig, ValueLoader};

const WAIT: Duration = Duration::from_secs(10);
const PRODUCERS: u32 = 8;

/// Sleeps for the requested delay, then multiplies the key by ten.
struct DelayedLoader;

impl ValueLoader for DelayedLoader {
    type Key = u32;
    type Params = Duration;
    type Value = u64;

    fn compute(&self, key: &u32, delay: Duration) -> Result<u64, ComputeError> {
        thread::sleep(delay);
        Ok(u64::from(*key) * 10)
    }
}

fn loader(cache_capacity: usize) -> AsyncKeyedLoader<DelayedLoader, &'static str> {
    let config = LoaderConfig {
        worker_count: 6,
        cache_capacity,
        thread_name_prefix: "stress".into(),
    };
    AsyncKeyedLoader::new(DelayedLoader, config).unwrap()
}

fn random_delay(rng: &mut impl Rng) -> Duration {
    Duration::from_micros(rng.random_range(0..3_000))
}

#[test]
fn one_consumer_many_keys_ends_on_its_latest_key() {
    const KEYS: u32 = 128;
    let loader = loader(256);
    let finished = AtomicUsize::new(0);
    let mut applied: Vec<u64> = Vec::new();

    thread::scope(|scope| {
        for producer in 0..PRODUCERS {
            let loader = &loader;
            let finished = &finished;
            scope.spawn(move || {
                let mut rng = rand::rng();
                let mut ignore = |_: &&'static str, _: &u32, _: &Handle<u64>| {};
                for key in (0..KEYS).filter(|k| k % PRODUCERS == producer) {
                    loader
                        .request(key, "V1", random_delay(&mut rng), &mut ignore)
                        .unwrap();
                    thread::sleep(Duration::from_micros(rng.random_range(0..500)));
                }
                finished.fetch_add(1, Ordering::SeqCst);
            });
        }

        // This thread is the delivery context while producers are running.
        let mut sink = |_: &&'static str, _: &u32, value: &Handle<u64>| applied.push(**value);
        while finished.load(Ordering::SeqCst) < PRODUCERS as usize {
            loader.dispatch_blocking(&mut sink, Duration::from_millis(5));
        }
        loader.dispatch_until_idle(&mut sink, WAIT);
    });

    let latest = loader.current_key(&"V1").expect("V1 is registered");
    assert_eq!(applied.last().copied(), Some(u64::from(latest) * 10));

    let stats = loader.stats();
    assert_eq!(stats.requests, u64::from(KEYS));
    assert_eq!(stats.cache_hits, 0);
    assert_eq!(stats.computations, u64::from(KEYS));
    assert_eq!(stats.delivered + stats.discarded_stale, u64::from(KEYS));
    assert_eq!(stats.delivered as usize, applied.len());
    assert_eq!(loader.cache_len(), KEYS as usize);
    assert!(loader.is_idle());
}

#[test]
fn many_consumers_shared_keys_keep_counters_consistent() {
    const REQUESTS_PER_PRODUCER: u32 = 64;
    const KEYS: u32 = 24;
    const CONSUMERS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];
    let loader = loader(16);
    let hits_seen = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..PRODUCERS {
            let loader = &loader;
            let hits_seen = &hits_seen;
            scope.spawn(move || {
                let mut rng = rand::rng();
                let mut count_hit = |_: &&'static str, key: &u32, value: &Handle<u64>| {
                    assert_eq!(**value, u64::from(*key) * 10);
                    hits_seen.fetch_add(1, Ordering::SeqCst);
                };
                for _ in 0..REQUESTS_PER_PRODUCER {
                    let key = rng.random_range(0..KEYS);
                    let consumer = CONSUMERS[rng.random_range(0..CONSUMERS.len())];
                    loader
                        .request(key, consumer, random_delay(&mut rng), &mut count_hit)
                        .unwrap();
                }
            });
        }
    });

    let mut delivered: HashMap<&'static str, Vec<(u32, u64)>> = HashMap::new();
    let mut sink = |consumer: &&'static str, key: &u32, value: &Handle<u64>| {
        delivered.entry(*consumer).or_default().push((*key, **value));
    };
    loader.dispatch_until_idle(&mut sink, WAIT);

    let stats = loader.stats();
    let total = u64::from(PRODUCERS * REQUESTS_PER_PRODUCER);
    assert_eq!(stats.requests, total);
    assert_eq!(stats.cache_hits + stats.cache_misses, total);
    assert_eq!(stats.cache_hits as usize, hits_seen.load(Ordering::SeqCst));
    assert_eq!(stats.computations, stats.cache_misses);
    assert_eq!(stats.failures, 0);
    assert!(loader.cache_len() <= 16);
    assert!(loader.is_idle());

    // Every worker result applied after the producers stopped matches the consumer's
    // final key, and carries the right value for its key.
    for (consumer, values) in &delivered {
        let current = loader.current_key(consumer).expect("consumer is registered");
        for (key, value) in values {
            assert_eq!(*key, current);
            assert_eq!(*value, u64::from(*key) * 10);
        }
    }
}
