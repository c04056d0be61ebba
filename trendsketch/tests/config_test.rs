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

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::contains_substring;
use trendsketch::config::DEFAULT_HASH_SEED;
use trendsketch::config::DEFAULT_POLL_INTERVAL;
use trendsketch::config::TrendConfig;
use trendsketch::countmin::CountMinSketch;
use trendsketch::countmin::DEFAULT_SEED;
use trendsketch::countmin::MAX_SKETCH_CELLS;
use trendsketch::error::ErrorKind;

#[test]
fn test_defaults() {
    let config = TrendConfig::default();
    assert_eq!(config.epsilon(), 0.001);
    assert_eq!(config.delta(), 0.01);
    assert_eq!(config.window_size(), 20);
    assert_eq!(config.top_k(), 10);
    assert_eq!(config.candidate_cap(), 40);
    assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
    assert_eq!(config.poll_interval(), Duration::from_millis(3500));
    assert_eq!(config.hash_seed(), DEFAULT_HASH_SEED);
    assert_eq!(DEFAULT_HASH_SEED, DEFAULT_SEED);
    assert_eq!(
        CountMinSketch::from_config(&config).seed(),
        CountMinSketch::new(config.epsilon(), config.delta()).seed()
    );
    assert!(config.stopwords().contains("the"));

    let built = TrendConfig::builder().build().unwrap();
    assert_eq!(built.candidate_cap(), config.candidate_cap());
    assert_eq!(built.stopwords(), config.stopwords());
}

#[test]
fn test_candidate_cap_follows_top_k() {
    let config = TrendConfig::builder().top_k(3).build().unwrap();
    assert_eq!(config.candidate_cap(), 12);

    let config = TrendConfig::builder()
        .candidate_cap(5)
        .top_k(5)
        .build()
        .unwrap();
    assert_eq!(config.candidate_cap(), 5);
}

#[test]
fn test_stopword_overrides() {
    let config = TrendConfig::builder()
        .stopwords(["alpha", "beta"])
        .build()
        .unwrap();
    assert_eq!(config.stopwords().len(), 2);
    assert!(!config.stopwords().contains("the"));

    let config = TrendConfig::builder()
        .extra_stopwords(["reuters".to_owned()])
        .build()
        .unwrap();
    assert!(config.stopwords().contains("reuters"));
    assert!(config.stopwords().contains("the"));
}

#[test]
fn test_invalid_epsilon() {
    for epsilon in [0.0, 1.0, -0.5, f64::NAN] {
        let err = TrendConfig::builder().epsilon(epsilon).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_that!(err.message(), contains_substring("epsilon"));
    }
}

#[test]
fn test_invalid_delta() {
    let err = TrendConfig::builder().delta(1.5).build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(err.message(), contains_substring("delta must be in (0, 1)"));
    assert_that!(err.to_string(), contains_substring("delta: 1.5"));
}

#[test]
fn test_invalid_sizes() {
    let err = TrendConfig::builder().window_size(0).build().unwrap_err();
    assert_that!(err.message(), contains_substring("window_size"));

    let err = TrendConfig::builder().top_k(0).build().unwrap_err();
    assert_that!(err.message(), contains_substring("top_k"));

    let err = TrendConfig::builder()
        .top_k(10)
        .candidate_cap(9)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(
        err.message(),
        contains_substring("candidate_cap must not be smaller than top_k")
    );

    let err = TrendConfig::builder()
        .poll_interval(Duration::ZERO)
        .build()
        .unwrap_err();
    assert_that!(err.message(), contains_substring("poll_interval"));
}

#[test]
fn test_oversized_sketch_rejected() {
    for epsilon in [1e-7, 1e-12, f64::MIN_POSITIVE] {
        let err = TrendConfig::builder().epsilon(epsilon).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_that!(err.message(), contains_substring("sketch table too large"));
        assert!(err.to_string().contains(&format!("max_cells: {MAX_SKETCH_CELLS}")));
    }

    let epsilon = 1.0 / f64::from(1u32 << 20);
    let config = TrendConfig::builder().epsilon(epsilon).build().unwrap();
    let num_buckets = CountMinSketch::suggest_num_buckets(config.epsilon());
    let num_hashes = CountMinSketch::suggest_num_hashes(config.delta());
    assert_eq!(num_buckets, 1 << 21);
    assert!(u64::from(num_hashes) * u64::from(num_buckets) <= MAX_SKETCH_CELLS);
}
