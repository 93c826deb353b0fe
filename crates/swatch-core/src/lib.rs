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

//! Contracts and shared types for Swatch's asynchronous keyed loading.
//!
//! This crate is the "common language" of the workspace. It defines what a loader
//! computes and how a result reaches its consumer, but it has no knowledge of caches,
//! threads or queues. Those live in `swatch-loader`.

#![warn(missing_docs)]

pub mod color;
pub mod error;
pub mod handle;
pub mod loader;

pub use color::{Color, ParseColorError};
pub use error::{ComputeError, LoaderError};
pub use handle::Handle;
pub use loader::{Deliver, ValueLoader};
