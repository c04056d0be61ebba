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

//! Per-document snapshots: a frequency sketch paired with its candidate words.

use std::collections::HashMap;

use crate::candidates::CandidateSet;
use crate::config::TrendConfig;
use crate::countmin::CountMinSketch;

/// The immutable record of one processed document.
///
/// A snapshot is built once from the document's tokens and never mutated
/// afterwards. It lives exactly as long as it occupies a slot in the
/// [`SlidingWindow`](crate::window::SlidingWindow).
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    seq: u64,
    num_tokens: usize,
    sketch: CountMinSketch,
    candidates: CandidateSet,
}

impl DocumentSnapshot {
    /// Builds the snapshot for a document's normalized tokens.
    ///
    /// Every token updates the sketch. Each distinct word is then offered to the
    /// candidate set with its exact count in this document, in order of first
    /// appearance.
    pub fn build<S: AsRef<str>>(seq: u64, tokens: &[S], config: &TrendConfig) -> Self {
        let mut sketch = CountMinSketch::from_config(config);
        let mut candidates = CandidateSet::new(config.candidate_cap());

        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut local_counts: Vec<(&str, u64)> = Vec::new();
        for token in tokens {
            let word = token.as_ref();
            sketch.update(word);
            match positions.get(word) {
                Some(&pos) => local_counts[pos].1 += 1,
                None => {
                    positions.insert(word, local_counts.len());
                    local_counts.push((word, 1));
                }
            }
        }
        for (word, count) in local_counts {
            candidates.observe(word, count);
        }

        Self {
            seq,
            num_tokens: tokens.len(),
            sketch,
            candidates,
        }
    }

    /// Builds a snapshot for a document without any tokens.
    pub fn empty(seq: u64, config: &TrendConfig) -> Self {
        Self::build::<&str>(seq, &[], config)
    }

    /// Returns the arrival sequence number assigned when the document was processed.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Returns the number of tokens the document contributed.
    pub fn num_tokens(&self) -> usize {
        self.num_tokens
    }

    /// Returns true if the document contributed no tokens.
    pub fn is_empty(&self) -> bool {
        self.num_tokens == 0
    }

    /// Returns the document's frequency sketch.
    pub fn sketch(&self) -> &CountMinSketch {
        &self.sketch
    }

    /// Returns the document's candidate words.
    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Returns the sketch estimate of `word` within this document.
    pub fn estimate(&self, word: &str) -> u64 {
        self.sketch.estimate(word)
    }
}
