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

//! A fixed-size pool of named worker threads fed from a shared job queue.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use swatch_core::LoaderError;

/// A unit of work executed on a worker thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs submitted jobs on a fixed set of threads.
///
/// The queue is unbounded so `submit` never blocks. Shutting down closes the queue;
/// workers finish whatever is already queued and exit.
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `count` threads named `{prefix}-{index}`.
    pub fn new(count: usize, prefix: &str) -> Result<Self, LoaderError> {
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();

        let mut pool = Self {
            sender: Some(sender),
            workers: Vec::with_capacity(count),
        };

        for index in 0..count {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("{prefix}-{index}"))
                .spawn(move || worker_loop(receiver))
                .map_err(LoaderError::WorkerSpawn)?;
            pool.workers.push(handle);
        }

        log::info!("Worker pool started with {count} thread(s).");
        Ok(pool)
    }

    /// Queues a job. Fails once the pool has been shut down.
    pub fn submit(&self, job: Job) -> Result<(), LoaderError> {
        let sender = self.sender.as_ref().ok_or(LoaderError::ShutDown)?;
        sender.send(job).map_err(|_| LoaderError::ShutDown)
    }

    /// Returns `true` until [`shutdown`](Self::shutdown) is called.
    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Closes the queue and waits for every worker to drain it and exit.
    pub fn shutdown(&mut self) {
        if self.sender.take().is_none() {
            return;
        }
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("A worker thread panicked outside of a job.");
            }
        }
        log::info!("Worker pool stopped.");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(receiver: Receiver<Job>) {
    let name = thread::current().name().unwrap_or("worker").to_string();
    log::trace!("{name} waiting for jobs.");

    // `iter` ends once every sender is dropped and the queue is empty.
    for job in receiver.iter() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            log::error!("{name}: job panicked, worker keeps running.");
        }
    }

    log::trace!("{name} exiting.");
}
