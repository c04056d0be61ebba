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

use std::hash::Hash;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::TrendConfig;

/// Seed used when none is supplied.
pub const DEFAULT_SEED: u64 = 9001;

/// Largest table a sketch may allocate, in counters (128 MiB of `u64`).
pub const MAX_SKETCH_CELLS: u64 = 1 << 24;

const MIN_NUM_BUCKETS: u32 = 3;
const MAX_NUM_HASHES: u8 = 64;

/// Count-Min sketch over hashable items with `u64` counters.
///
/// See [`crate::countmin`] for an overview and error guarantees.
#[derive(Debug, Clone)]
pub struct CountMinSketch {
    num_hashes: u8,
    num_buckets: u32,
    seed: u64,
    row_seeds: Vec<u32>,
    table: Vec<u64>,
    total_weight: u64,
}

impl CountMinSketch {
    /// Creates a sketch sized for relative error `epsilon` and failure probability
    /// `delta`, using [`DEFAULT_SEED`].
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` or `delta` is not in (0, 1).
    pub fn new(epsilon: f64, delta: f64) -> Self {
        Self::with_seed(epsilon, delta, DEFAULT_SEED)
    }

    /// Creates a sketch sized for `epsilon` and `delta` whose row seeds are derived
    /// from `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` or `delta` is not in (0, 1).
    pub fn with_seed(epsilon: f64, delta: f64, seed: u64) -> Self {
        let num_buckets = Self::suggest_num_buckets(epsilon);
        let num_hashes = Self::suggest_num_hashes(delta);
        Self::with_dimensions(num_hashes, num_buckets, seed)
    }

    /// Creates a sketch from the sketch parameters of a validated configuration.
    pub fn from_config(config: &TrendConfig) -> Self {
        Self::with_seed(config.epsilon(), config.delta(), config.hash_seed())
    }

    /// Creates a sketch with explicit dimensions.
    ///
    /// # Panics
    ///
    /// Panics if `num_hashes` is zero, `num_buckets` is less than three, or the
    /// table would exceed [`MAX_SKETCH_CELLS`] counters.
    pub fn with_dimensions(num_hashes: u8, num_buckets: u32, seed: u64) -> Self {
        assert!(num_hashes >= 1, "num_hashes must be at least 1");
        assert!(
            num_buckets >= MIN_NUM_BUCKETS,
            "num_buckets must be at least {MIN_NUM_BUCKETS}"
        );
        assert!(
            u64::from(num_hashes) * u64::from(num_buckets) <= MAX_SKETCH_CELLS,
            "sketch table must not exceed {MAX_SKETCH_CELLS} cells, got {num_hashes} x {num_buckets}"
        );
        let mut rng = StdRng::seed_from_u64(seed);
        let row_seeds = (0..num_hashes).map(|_| rng.random::<u32>()).collect();
        Self {
            num_hashes,
            num_buckets,
            seed,
            row_seeds,
            table: vec![0; num_hashes as usize * num_buckets as usize],
            total_weight: 0,
        }
    }

    /// Suggests the number of buckets per row for relative error `epsilon`.
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` is not in (0, 1), or so small that the bucket count does
    /// not fit in a `u32`.
    pub fn suggest_num_buckets(epsilon: f64) -> u32 {
        assert!(
            epsilon > 0.0 && epsilon < 1.0,
            "epsilon must be in (0, 1), got {epsilon}"
        );
        let buckets = (2.0 / epsilon).ceil();
        assert!(
            buckets <= f64::from(u32::MAX),
            "epsilon {epsilon} needs more than u32::MAX buckets"
        );
        // In range, so the cast is exact.
        (buckets as u32).max(MIN_NUM_BUCKETS)
    }

    /// Suggests the number of rows for failure probability `delta`.
    ///
    /// # Panics
    ///
    /// Panics if `delta` is not in (0, 1).
    pub fn suggest_num_hashes(delta: f64) -> u8 {
        assert!(
            delta > 0.0 && delta < 1.0,
            "delta must be in (0, 1), got {delta}"
        );
        let hashes = (1.0 / delta).ln().ceil();
        (hashes as u8).clamp(1, MAX_NUM_HASHES)
    }

    /// Returns the number of rows.
    pub fn num_hashes(&self) -> u8 {
        self.num_hashes
    }

    /// Returns the number of buckets per row.
    pub fn num_buckets(&self) -> u32 {
        self.num_buckets
    }

    /// Returns the seed the row seeds were derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the sum of all update weights.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Returns true if the sketch has not been updated.
    pub fn is_empty(&self) -> bool {
        self.total_weight == 0
    }

    /// Returns the relative error implied by the row width.
    pub fn relative_error(&self) -> f64 {
        2.0 / self.num_buckets as f64
    }

    /// Increments the count of `item` by one.
    pub fn update<T: Hash>(&mut self, item: T) {
        self.update_with_weight(item, 1);
    }

    /// Increments the count of `item` by `weight`, one counter per row.
    pub fn update_with_weight<T: Hash>(&mut self, item: T, weight: u64) {
        if weight == 0 {
            return;
        }
        self.total_weight += weight;
        for row in 0..self.num_hashes as usize {
            let index = self.cell(row, &item);
            self.table[index] += weight;
        }
    }

    /// Returns the estimated count of `item`: the minimum of its counters across rows.
    ///
    /// Never smaller than the true count.
    pub fn estimate<T: Hash>(&self, item: T) -> u64 {
        (0..self.num_hashes as usize)
            .map(|row| self.table[self.cell(row, &item)])
            .min()
            .unwrap_or(0)
    }

    /// Returns an upper bound on the true count of `item`, valid with probability
    /// at least `1 - delta`.
    pub fn upper_bound<T: Hash>(&self, item: T) -> u64 {
        let slack = self.relative_error() * self.total_weight as f64;
        self.estimate(item) + slack as u64
    }

    fn cell<T: Hash>(&self, row: usize, item: &T) -> usize {
        let mut hasher = mur3::Hasher128::with_seed(self.row_seeds[row]);
        item.hash(&mut hasher);
        let (h1, _) = hasher.finish128();
        row * self.num_buckets as usize + (h1 % self.num_buckets as u64) as usize
    }
}
