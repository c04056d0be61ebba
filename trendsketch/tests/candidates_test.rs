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

use trendsketch::candidates::CandidateSet;

fn words(set: &CandidateSet) -> Vec<&str> {
    set.candidates().collect()
}

#[test]
fn test_keeps_everything_below_capacity() {
    let mut set = CandidateSet::new(4);
    assert!(set.is_empty());
    assert!(set.observe("fed", 2));
    assert!(set.observe("rates", 1));
    assert!(set.observe("inflation", 1));
    assert_eq!(set.len(), 3);
    assert_eq!(words(&set), ["fed", "rates", "inflation"]);
    assert_eq!(set.count("fed"), 2);
    assert_eq!(set.count("markets"), 0);
    assert_eq!(set.min_count(), Some(1));
}

#[test]
fn test_existing_word_count_is_replaced() {
    let mut set = CandidateSet::new(2);
    set.observe("fed", 1);
    set.observe("fed", 4);
    assert_eq!(set.len(), 1);
    assert_eq!(set.count("fed"), 4);
    assert_eq!(set.min_count(), Some(4));
}

#[test]
fn test_full_set_drops_word_not_above_minimum() {
    let mut set = CandidateSet::new(2);
    set.observe("a", 3);
    set.observe("b", 2);
    assert!(!set.observe("c", 2));
    assert!(!set.contains("c"));
    assert_eq!(words(&set), ["a", "b"]);
}

#[test]
fn test_full_set_evicts_minimum() {
    let mut set = CandidateSet::new(2);
    set.observe("a", 3);
    set.observe("b", 1);
    assert!(set.observe("c", 2));
    assert!(!set.contains("b"));
    assert_eq!(words(&set), ["a", "c"]);
}

#[test]
fn test_tied_minimum_evicts_latest_arrival() {
    let mut set = CandidateSet::new(3);
    set.observe("a", 1);
    set.observe("b", 1);
    set.observe("c", 5);
    set.observe("d", 2);
    assert_eq!(words(&set), ["a", "c", "d"]);
}

#[test]
fn test_retains_heavy_hitters() {
    let counts = [1, 5, 2, 8, 1, 7, 3, 1, 6, 2];
    let mut set = CandidateSet::new(3);
    for (i, count) in counts.iter().enumerate() {
        set.observe(&format!("w{i}"), *count);
    }
    let heaviest: Vec<_> = set
        .heaviest()
        .into_iter()
        .map(|candidate| (candidate.word().to_owned(), candidate.count()))
        .collect();
    assert_eq!(
        heaviest,
        [
            ("w3".to_owned(), 8),
            ("w5".to_owned(), 7),
            ("w8".to_owned(), 6)
        ]
    );
}

#[test]
fn test_heaviest_breaks_ties_by_arrival() {
    let mut set = CandidateSet::new(4);
    set.observe("x", 1);
    set.observe("y", 2);
    set.observe("z", 2);
    let order: Vec<_> = set.heaviest().iter().map(|c| c.word()).collect();
    assert_eq!(order, ["y", "z", "x"]);
}

#[test]
#[should_panic(expected = "capacity must be positive")]
fn test_zero_capacity() {
    CandidateSet::new(0);
}
