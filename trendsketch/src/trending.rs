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

//! Trending word aggregation over the sliding window.
//!
//! The enumeration domain for ranking is recomputed on every call as the union of
//! all candidate sets currently in the window. Words that first become popular in
//! the newest documents are therefore always eligible. Restricting the domain to
//! previously ranked words would hide them forever.
//!
//! # Examples
//!
//! ```
//! # use trendsketch::config::TrendConfig;
//! # use trendsketch::trending::TrendingAggregator;
//! let config = TrendConfig::builder().window_size(3).top_k(3).build().unwrap();
//! let mut aggregator = TrendingAggregator::new(config);
//! aggregator.ingest("Fed raises rates again amid inflation fears");
//! aggregator.ingest("Markets react to Fed rate hike");
//! aggregator.ingest("Inflation fears grip global markets");
//!
//! let trending = aggregator.current();
//! assert_eq!(trending.words().next(), Some("fed"));
//! assert!((trending.iter().map(|w| w.probability()).sum::<f64>() - 1.0).abs() < 1e-9);
//! ```

use std::collections::HashSet;

use serde::Serialize;
use serde::Serializer;

use crate::config::TrendConfig;
use crate::normalize::Normalizer;
use crate::snapshot::DocumentSnapshot;
use crate::window::SlidingWindow;

const PREVIEW_CHARS: usize = 250;

/// One ranked word of a [`TrendingResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankedWord {
    word: String,
    estimate: u64,
    probability: f64,
}

impl RankedWord {
    /// Returns the word.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Returns the aggregated estimate across the window.
    pub fn estimate(&self) -> u64 {
        self.estimate
    }

    /// Returns the estimate normalized over the returned words.
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

/// Immutable ranked top-K result, highest estimate first.
///
/// Serializes as a `{word: probability}` object with keys in rank order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendingResult {
    ranked: Vec<RankedWord>,
}

impl TrendingResult {
    /// Returns true if no word is ranked.
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Returns the number of ranked words.
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Returns the ranked words, highest first.
    pub fn iter(&self) -> std::slice::Iter<'_, RankedWord> {
        self.ranked.iter()
    }

    /// Returns the words in rank order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.ranked.iter().map(|ranked| ranked.word.as_str())
    }

    /// Returns the probability of `word`, or `None` if it is not ranked.
    pub fn probability(&self, word: &str) -> Option<f64> {
        self.ranked
            .iter()
            .find(|ranked| ranked.word == word)
            .map(|ranked| ranked.probability)
    }

    /// Returns `(word, probability)` pairs in rank order.
    pub fn to_pairs(&self) -> Vec<(String, f64)> {
        self.ranked
            .iter()
            .map(|ranked| (ranked.word.clone(), ranked.probability))
            .collect()
    }
}

impl<'a> IntoIterator for &'a TrendingResult {
    type Item = &'a RankedWord;
    type IntoIter = std::slice::Iter<'a, RankedWord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for TrendingResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.ranked
                .iter()
                .map(|ranked| (ranked.word.as_str(), ranked.probability)),
        )
    }
}

/// Computes the top `k` words over every snapshot in `window`.
///
/// 1. The candidate domain is the union of all snapshot candidate sets, in order of
///    first appearance (oldest snapshot first).
/// 2. A word's aggregated estimate is the sum of sketch estimates over the snapshots
///    that list it as a candidate; other snapshots contribute zero.
/// 3. Words are ranked by aggregated estimate descending, ties by first appearance.
/// 4. The first `k` are kept and their estimates normalized to sum to one. If they
///    are all zero every probability is zero.
///
/// An empty window, or one without candidates, yields an empty result.
pub fn compute_top_k(window: &SlidingWindow, k: usize) -> TrendingResult {
    if k == 0 || window.is_empty() {
        return TrendingResult::default();
    }

    let mut seen = HashSet::new();
    let mut domain: Vec<&str> = Vec::new();
    for snapshot in window.snapshots() {
        for word in snapshot.candidates().candidates() {
            if seen.insert(word) {
                domain.push(word);
            }
        }
    }

    let mut scored: Vec<(&str, u64)> = domain
        .into_iter()
        .map(|word| (word, aggregate_estimate(window, word)))
        .collect();
    // Stable sort keeps first-appearance order among equal estimates.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(k);

    let total: u64 = scored.iter().map(|(_, estimate)| estimate).sum();
    let ranked = scored
        .into_iter()
        .map(|(word, estimate)| RankedWord {
            word: word.to_owned(),
            estimate,
            probability: if total == 0 {
                0.0
            } else {
                estimate as f64 / total as f64
            },
        })
        .collect();
    TrendingResult { ranked }
}

fn aggregate_estimate(window: &SlidingWindow, word: &str) -> u64 {
    window
        .snapshots()
        .filter(|snapshot| snapshot.candidates().contains(word))
        .map(|snapshot| snapshot.estimate(word))
        .sum()
}

/// What happened to a document handed to [`TrendingAggregator::ingest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The document produced tokens and its snapshot joined the window.
    Accepted {
        /// Sequence number of the new snapshot.
        seq: u64,
        /// Number of tokens after normalization.
        num_tokens: usize,
    },
    /// The document normalized to nothing; an empty snapshot still joined the
    /// window so that the window keeps counting documents.
    Empty {
        /// Sequence number of the new snapshot.
        seq: u64,
    },
}

/// Owns the normalizer and the sliding window, and produces trending results.
///
/// There is no shared global state: the pipeline holds the aggregator and hands
/// only computed [`TrendingResult`] values to the outside.
#[derive(Debug)]
pub struct TrendingAggregator {
    config: TrendConfig,
    normalizer: Normalizer,
    window: SlidingWindow,
    next_seq: u64,
}

impl TrendingAggregator {
    /// Creates an aggregator with an empty window.
    pub fn new(config: TrendConfig) -> Self {
        let normalizer = Normalizer::new(config.stopwords().clone());
        let window = SlidingWindow::new(config.window_size());
        Self {
            config,
            normalizer,
            window,
            next_seq: 0,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Returns the current window.
    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    /// Normalizes `text`, builds its snapshot, and pushes it into the window.
    pub fn ingest(&mut self, text: &str) -> ProcessOutcome {
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::debug!(seq, preview = %preview(text), "received document");

        let tokens = self.normalizer.tokenize(text);
        let outcome = if tokens.is_empty() {
            tracing::debug!(seq, "document has no tokens after normalization");
            self.window.push(DocumentSnapshot::empty(seq, &self.config));
            ProcessOutcome::Empty { seq }
        } else {
            let num_tokens = tokens.len();
            self.window
                .push(DocumentSnapshot::build(seq, &tokens, &self.config));
            ProcessOutcome::Accepted { seq, num_tokens }
        };
        tracing::debug!(seq, window_len = self.window.len(), "window advanced");
        outcome
    }

    /// Computes the current top-K over the window.
    pub fn current(&self) -> TrendingResult {
        compute_top_k(&self.window, self.config.top_k())
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "é".repeat(PREVIEW_CHARS + 10);
        assert_eq!(preview(&text).chars().count(), PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
