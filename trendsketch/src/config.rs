// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Configuration for the trending pipeline.
//!
//! ```rust
//! # use trendsketch::config::TrendConfig;
//! let config = TrendConfig::builder()
//!     .window_size(5)
//!     .top_k(3)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.candidate_cap(), 12);
//! ```

use std::collections::HashSet;
use std::time::Duration;

use crate::countmin;
use crate::countmin::CountMinSketch;
use crate::countmin::MAX_SKETCH_CELLS;
use crate::error::Error;
use crate::normalize::stopwords::default_stopwords;

/// Default sketch relative error.
pub const DEFAULT_EPSILON: f64 = 0.001;
/// Default sketch failure probability.
pub const DEFAULT_DELTA: f64 = 0.01;
/// Default number of documents in the sliding window.
pub const DEFAULT_WINDOW_SIZE: usize = 20;
/// Default number of ranked words.
pub const DEFAULT_TOP_K: usize = 10;
/// Default candidate cap is this multiple of `top_k`.
pub const CANDIDATE_CAP_FACTOR: usize = 4;
/// Default interval between polls of the document source.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3500);
/// Default seed from which every sketch's row seeds are derived.
pub const DEFAULT_HASH_SEED: u64 = countmin::DEFAULT_SEED;

/// Validated configuration shared by the aggregator and the pipeline.
#[derive(Debug, Clone)]
pub struct TrendConfig {
    epsilon: f64,
    delta: f64,
    window_size: usize,
    top_k: usize,
    candidate_cap: usize,
    stopwords: HashSet<String>,
    poll_interval: Duration,
    hash_seed: u64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            delta: DEFAULT_DELTA,
            window_size: DEFAULT_WINDOW_SIZE,
            top_k: DEFAULT_TOP_K,
            candidate_cap: DEFAULT_TOP_K * CANDIDATE_CAP_FACTOR,
            stopwords: default_stopwords(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            hash_seed: DEFAULT_HASH_SEED,
        }
    }
}

impl TrendConfig {
    /// Create a new builder for TrendConfig
    pub fn builder() -> TrendConfigBuilder {
        TrendConfigBuilder::default()
    }

    /// Sketch relative error.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Sketch failure probability.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Number of documents held by the sliding window.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of words in each published ranking.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Maximum number of candidate words remembered per document.
    pub fn candidate_cap(&self) -> usize {
        self.candidate_cap
    }

    /// Words removed during normalization.
    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    /// Interval between polls of the document source.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Seed from which every sketch's row seeds are derived.
    pub fn hash_seed(&self) -> u64 {
        self.hash_seed
    }
}

/// Builder for TrendConfig
///
/// Unset options keep their defaults. `candidate_cap` defaults to
/// `4 * top_k` of the final `top_k`, whatever order the setters are called in.
#[derive(Debug, Clone)]
pub struct TrendConfigBuilder {
    epsilon: f64,
    delta: f64,
    window_size: usize,
    top_k: usize,
    candidate_cap: Option<usize>,
    stopwords: HashSet<String>,
    poll_interval: Duration,
    hash_seed: u64,
}

impl Default for TrendConfigBuilder {
    fn default() -> Self {
        let defaults = TrendConfig::default();
        Self {
            epsilon: defaults.epsilon,
            delta: defaults.delta,
            window_size: defaults.window_size,
            top_k: defaults.top_k,
            candidate_cap: None,
            stopwords: defaults.stopwords,
            poll_interval: defaults.poll_interval,
            hash_seed: defaults.hash_seed,
        }
    }
}

impl TrendConfigBuilder {
    /// Set sketch relative error. Must be in (0, 1).
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set sketch failure probability. Must be in (0, 1).
    pub fn delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Set the sliding window capacity. Must be positive.
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the number of ranked words. Must be positive.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the per-document candidate cap. Must be at least `top_k`.
    pub fn candidate_cap(mut self, candidate_cap: usize) -> Self {
        self.candidate_cap = Some(candidate_cap);
        self
    }

    /// Replace the stopword set.
    pub fn stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = stopwords.into_iter().map(Into::into).collect();
        self
    }

    /// Add words to the stopword set.
    pub fn extra_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords.extend(stopwords.into_iter().map(Into::into));
        self
    }

    /// Set the source poll interval. Must be non-zero.
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the seed from which sketch row seeds are derived.
    pub fn hash_seed(mut self, hash_seed: u64) -> Self {
        self.hash_seed = hash_seed;
        self
    }

    /// Validate and build the TrendConfig.
    pub fn build(self) -> Result<TrendConfig, Error> {
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(Error::config_invalid("epsilon must be in (0, 1)")
                .with_context("epsilon", self.epsilon));
        }
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(Error::config_invalid("delta must be in (0, 1)")
                .with_context("delta", self.delta));
        }
        let num_buckets = (2.0 / self.epsilon).ceil();
        let num_hashes = CountMinSketch::suggest_num_hashes(self.delta);
        if num_buckets * f64::from(num_hashes) > MAX_SKETCH_CELLS as f64 {
            return Err(
                Error::config_invalid("sketch table too large for epsilon and delta")
                    .with_context("epsilon", self.epsilon)
                    .with_context("delta", self.delta)
                    .with_context("max_cells", MAX_SKETCH_CELLS),
            );
        }
        if self.window_size == 0 {
            return Err(Error::config_invalid("window_size must be positive"));
        }
        if self.top_k == 0 {
            return Err(Error::config_invalid("top_k must be positive"));
        }
        let candidate_cap = self
            .candidate_cap
            .unwrap_or(self.top_k * CANDIDATE_CAP_FACTOR);
        if candidate_cap < self.top_k {
            return Err(
                Error::config_invalid("candidate_cap must not be smaller than top_k")
                    .with_context("candidate_cap", candidate_cap)
                    .with_context("top_k", self.top_k),
            );
        }
        if self.poll_interval.is_zero() {
            return Err(Error::config_invalid("poll_interval must be non-zero"));
        }

        Ok(TrendConfig {
            epsilon: self.epsilon,
            delta: self.delta,
            window_size: self.window_size,
            top_k: self.top_k,
            candidate_cap,
            stopwords: self.stopwords,
            poll_interval: self.poll_interval,
            hash_seed: self.hash_seed,
        })
    }
}
