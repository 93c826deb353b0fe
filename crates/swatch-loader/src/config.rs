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

//! Configuration for [`AsyncKeyedLoader`](crate::AsyncKeyedLoader).

use std::path::Path;
use std::thread;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use swatch_core::LoaderError;

/// Tuning knobs for the worker pool and the cache.
///
/// Every field has a default, so a RON document only needs to name what it changes:
///
/// ```
/// use swatch_loader::LoaderConfig;
///
/// let config = LoaderConfig::from_ron_str("(worker_count: 2)").unwrap();
/// assert_eq!(config.worker_count, 2);
/// assert_eq!(config.cache_capacity, LoaderConfig::default().cache_capacity);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Number of worker threads computing values.
    pub worker_count: usize,
    /// Maximum number of values kept in the cache before the least recently used is evicted.
    pub cache_capacity: usize,
    /// Worker threads are named `{prefix}-{index}`.
    pub thread_name_prefix: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        let parallelism = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2);
        Self {
            worker_count: parallelism.clamp(1, 8),
            cache_capacity: 64,
            thread_name_prefix: "swatch-worker".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Parses and validates a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source).context("Failed to parse loader config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a RON file.
    pub fn from_ron_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read loader config '{}'", path.display()))?;
        Self::from_ron_str(&source)
    }

    /// Rejects configurations the loader cannot run with.
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.worker_count == 0 {
            return Err(LoaderError::InvalidConfig(
                "worker_count must be at least 1".into(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(LoaderError::InvalidConfig(
                "cache_capacity must be at least 1".into(),
            ));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(LoaderError::InvalidConfig(
                "thread_name_prefix must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_valid() {
        let config = LoaderConfig::default();
        assert!(config.validate().is_ok());
        assert!((1..=8).contains(&config.worker_count));
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let config = LoaderConfig::from_ron_str(
            r#"(cache_capacity: 8, thread_name_prefix: "preview")"#,
        )
        .unwrap();
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.thread_name_prefix, "preview");
        assert_eq!(config.worker_count, LoaderConfig::default().worker_count);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let err = LoaderConfig::from_ron_str("(worker_count: 0)").unwrap_err();
        assert!(format!("{err:#}").contains("worker_count"));

        let config = LoaderConfig {
            cache_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LoaderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn malformed_documents_report_context() {
        let err = LoaderConfig::from_ron_str("(worker_count: \"many\")").unwrap_err();
        assert!(err.to_string().contains("Failed to parse loader config"));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(worker_count: 3, cache_capacity: 5)").unwrap();

        let config = LoaderConfig::from_ron_file(file.path()).unwrap();
        assert_eq!(config.worker_count, 3);
        assert_eq!(config.cache_capacity, 5);

        assert!(LoaderConfig::from_ron_file(file.path().with_extension("missing")).is_err());
    }
}
