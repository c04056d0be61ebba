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

//! Text normalization for incoming documents.
//!
//! A document is lowercased, every run of characters outside `[a-z0-9]` is
//! collapsed into a single separator, and the resulting tokens are filtered:
//! tokens shorter than [`MIN_TOKEN_LEN`] characters and configured stopwords are
//! dropped.
//!
//! # Usage
//!
//! ```rust
//! # use trendsketch::normalize::Normalizer;
//! let normalizer = Normalizer::default();
//! let tokens = normalizer.tokenize("Fed raises rates again amid inflation fears");
//! assert_eq!(tokens, ["fed", "raises", "rates", "amid", "inflation", "fears"]);
//! ```

use std::collections::HashSet;

pub mod stopwords;

/// Shortest token that is kept.
pub const MIN_TOKEN_LEN: usize = 3;

/// Lowercasing, alphanumeric tokenizer with stopword filtering.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(stopwords::default_stopwords())
    }
}

impl Normalizer {
    /// Creates a normalizer that drops the given stopwords.
    pub fn new(stopwords: HashSet<String>) -> Self {
        Self { stopwords }
    }

    /// Returns the configured stopword set.
    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    /// Splits `text` into normalized tokens, in order of appearance.
    ///
    /// Empty input, or input made only of stopwords and short words, yields an
    /// empty vector.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        lowered
            .split(|c: char| !is_token_char(c))
            .filter(|token| self.keep(token))
            .map(str::to_owned)
            .collect()
    }

    fn keep(&self, token: &str) -> bool {
        token.len() >= MIN_TOKEN_LEN && !self.stopwords.contains(token)
    }
}

// Only ASCII letters and digits survive; lowercasing has already happened, but
// non-ASCII uppercase may lowercase into non-ASCII and is treated as a separator.
fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}
