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

//! Error types shared by loaders and the dispatch machinery.

use thiserror::Error;

/// Errors returned synchronously by the loader API.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The request was rejected by [`ValueLoader::validate`](crate::ValueLoader::validate).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The loader no longer accepts work.
    #[error("loader has been shut down")]
    ShutDown,
    /// The configuration cannot be used to build a loader.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A worker thread could not be started.
    #[error("failed to spawn worker thread")]
    WorkerSpawn(#[source] std::io::Error),
}

/// Errors produced while computing a value on a worker thread.
///
/// These never surface from `request`: the failed result is dropped and the
/// delivery side may observe it through [`Deliver::compute_failed`](crate::Deliver::compute_failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputeError {
    /// The loader reported a failure.
    #[error("computation failed: {0}")]
    Failed(String),
    /// The loader panicked; the payload message is kept when it is a string.
    #[error("computation panicked: {0}")]
    Panicked(String),
}

impl ComputeError {
    /// Shorthand for [`ComputeError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
