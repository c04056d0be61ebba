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

//! Bounded heavy-hitter candidate tracking.
//!
//! A Count-Min sketch answers point queries but cannot list its keys. Every
//! per-document sketch is therefore paired with a [`CandidateSet`]: a capped map
//! from word to its exact count within the document, which records *which* words
//! are worth querying.
//!
//! When the set is full, a new word replaces the current minimum only if its count
//! is strictly larger; otherwise it is dropped. Words with the largest counts are
//! always retained, but the set is not an exact top-N under adversarial input.
//!
//! # Examples
//!
//! ```
//! # use trendsketch::candidates::CandidateSet;
//! let mut candidates = CandidateSet::new(2);
//! candidates.observe("fed", 3);
//! candidates.observe("rates", 1);
//! candidates.observe("inflation", 2);
//! assert_eq!(candidates.candidates().collect::<Vec<_>>(), ["fed", "inflation"]);
//! ```

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    count: u64,
    // Arrival order, used for deterministic iteration and tie breaking.
    seq: u64,
}

/// Result row for candidate queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    word: &'a str,
    count: u64,
}

impl<'a> Candidate<'a> {
    /// Returns the candidate word.
    pub fn word(&self) -> &'a str {
        self.word
    }

    /// Returns the recorded local count.
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Capped map of candidate words with min-count eviction.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    capacity: usize,
    next_seq: u64,
    entries: HashMap<String, Entry>,
    // Eviction order: lowest count first; among equal counts the latest arrival
    // goes first so earlier words keep their place.
    by_count: BTreeSet<(u64, Reverse<u64>, String)>,
}

impl CandidateSet {
    /// Creates an empty set holding at most `capacity` words.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        Self {
            capacity,
            next_seq: 0,
            entries: HashMap::with_capacity(capacity),
            by_count: BTreeSet::new(),
        }
    }

    /// Returns the maximum number of tracked words.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of tracked words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no word is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the recorded count of `word`, or zero if it is not tracked.
    pub fn count(&self, word: &str) -> u64 {
        self.entries.get(word).map_or(0, |entry| entry.count)
    }

    /// Returns true if `word` is tracked.
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Returns the smallest tracked count, or `None` if the set is empty.
    pub fn min_count(&self) -> Option<u64> {
        self.by_count.first().map(|(count, _, _)| *count)
    }

    /// Records `word` with its local count.
    ///
    /// A tracked word has its count replaced. A new word is inserted while there is
    /// room; once the set is full it evicts the minimum entry only if `local_count`
    /// exceeds that minimum. Returns true if the word is tracked afterwards.
    pub fn observe(&mut self, word: &str, local_count: u64) -> bool {
        if let Some(entry) = self.entries.get_mut(word) {
            let old = *entry;
            entry.count = local_count;
            self.by_count
                .remove(&(old.count, Reverse(old.seq), word.to_owned()));
            self.by_count
                .insert((local_count, Reverse(old.seq), word.to_owned()));
            return true;
        }

        if self.entries.len() >= self.capacity {
            match self.min_count() {
                Some(min) if local_count > min => {
                    if let Some((_, _, evicted)) = self.by_count.pop_first() {
                        self.entries.remove(&evicted);
                    }
                }
                _ => return false,
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            word.to_owned(),
            Entry {
                count: local_count,
                seq,
            },
        );
        self.by_count
            .insert((local_count, Reverse(seq), word.to_owned()));
        true
    }

    /// Returns the tracked words in arrival order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|candidate| candidate.word)
    }

    /// Returns the tracked words and counts in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = Candidate<'_>> + '_ {
        let mut rows: Vec<_> = self.entries.iter().collect();
        rows.sort_by_key(|(_, entry)| entry.seq);
        rows.into_iter().map(|(word, entry)| Candidate {
            word: word.as_str(),
            count: entry.count,
        })
    }

    /// Returns the tracked words sorted by count descending, ties in arrival order.
    pub fn heaviest(&self) -> Vec<Candidate<'_>> {
        let mut rows: Vec<_> = self.iter().collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows
    }
}
