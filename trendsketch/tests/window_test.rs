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

use trendsketch::config::TrendConfig;
use trendsketch::snapshot::DocumentSnapshot;
use trendsketch::window::SlidingWindow;

fn small_config() -> TrendConfig {
    TrendConfig::builder()
        .epsilon(0.1)
        .delta(0.1)
        .top_k(2)
        .build()
        .unwrap()
}

fn seqs(window: &SlidingWindow) -> Vec<u64> {
    window.snapshots().map(|snapshot| snapshot.seq()).collect()
}

#[test]
fn test_push_below_capacity_keeps_order() {
    let config = small_config();
    let mut window = SlidingWindow::new(3);
    assert!(window.is_empty());
    assert!(!window.push(DocumentSnapshot::empty(0, &config)));
    assert!(!window.push(DocumentSnapshot::empty(1, &config)));
    assert_eq!(window.len(), 2);
    assert!(!window.is_full());
    assert_eq!(seqs(&window), [0, 1]);
}

#[test]
fn test_overflow_evicts_oldest() {
    let config = small_config();
    let mut window = SlidingWindow::new(3);
    let evictions: Vec<bool> = (0..5)
        .map(|seq| window.push(DocumentSnapshot::empty(seq, &config)))
        .collect();
    assert_eq!(evictions, [false, false, false, true, true]);
    assert_eq!(window.len(), 3);
    assert_eq!(window.capacity(), 3);
    assert!(window.is_full());
    assert_eq!(seqs(&window), [2, 3, 4]);
}

#[test]
fn test_capacity_one_holds_latest() {
    let config = small_config();
    let mut window = SlidingWindow::new(1);
    for seq in 0..4 {
        window.push(DocumentSnapshot::build(seq, &["fed"], &config));
    }
    assert_eq!(seqs(&window), [3]);
}

#[test]
fn test_snapshots_iterator_is_restartable() {
    let config = small_config();
    let mut window = SlidingWindow::new(4);
    for seq in 0..3 {
        window.push(DocumentSnapshot::build(seq, &["fed", "rates"], &config));
    }
    let iter = window.snapshots();
    let first: Vec<u64> = iter.clone().map(|s| s.seq()).collect();
    let second: Vec<u64> = iter.map(|s| s.seq()).collect();
    assert_eq!(first, second);
    assert_eq!((&window).into_iter().count(), 3);
}

#[test]
fn test_snapshot_contents() {
    let config = small_config();
    let snapshot = DocumentSnapshot::build(7, &["fed", "rates", "fed"], &config);
    assert_eq!(snapshot.seq(), 7);
    assert_eq!(snapshot.num_tokens(), 3);
    assert!(!snapshot.is_empty());
    assert_eq!(snapshot.candidates().count("fed"), 2);
    assert_eq!(snapshot.candidates().count("rates"), 1);
    assert!(snapshot.estimate("fed") >= 2);
    assert_eq!(snapshot.sketch().total_weight(), 3);

    let empty = DocumentSnapshot::empty(8, &config);
    assert!(empty.is_empty());
    assert!(empty.candidates().is_empty());
    assert!(empty.sketch().is_empty());
}

#[test]
#[should_panic(expected = "window capacity must be positive")]
fn test_zero_capacity() {
    SlidingWindow::new(0);
}
