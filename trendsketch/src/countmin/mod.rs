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

//! Count-Min sketch implementation for per-document frequency estimation.
//!
//! The Count-Min sketch provides approximate frequency counts with fixed memory,
//! regardless of vocabulary size. Estimates are one-sided: they may exceed the true
//! count because of hash collisions, but never fall below it.
//!
//! The dimensions come from the configured error bounds: `W = ceil(2 / epsilon)`
//! buckets per row and `D = ceil(ln(1 / delta))` rows. Row seeds are derived from a
//! fixed seed, so two sketches built with the same parameters hash identically.
//! A table is capped at [`MAX_SKETCH_CELLS`] counters; configurations asking for
//! more are rejected when the configuration is built.
//!
//! # Usage
//!
//! ```rust
//! # use trendsketch::countmin::CountMinSketch;
//! let mut sketch = CountMinSketch::new(0.01, 0.01);
//! sketch.update("inflation");
//! sketch.update_with_weight("markets", 3);
//! assert!(sketch.estimate("markets") >= 3);
//! assert_eq!(sketch.estimate("never-seen"), 0);
//! ```
//!
//! # Configuration Helpers
//!
//! ```rust
//! # use trendsketch::countmin::CountMinSketch;
//! assert_eq!(CountMinSketch::suggest_num_buckets(0.001), 2000);
//! assert_eq!(CountMinSketch::suggest_num_hashes(0.01), 5);
//! ```

mod sketch;
pub use self::sketch::CountMinSketch;
pub use self::sketch::DEFAULT_SEED;
pub use self::sketch::MAX_SKETCH_CELLS;
