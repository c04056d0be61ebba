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

use std::collections::HashSet;

use trendsketch::normalize::Normalizer;
use trendsketch::normalize::stopwords::DEFAULT_STOPWORDS;

fn joined(normalizer: &Normalizer, text: &str) -> String {
    normalizer.tokenize(text).join(" ")
}

#[test]
fn test_headline_tokens() {
    let normalizer = Normalizer::default();
    insta::assert_snapshot!(
        joined(&normalizer, "Fed raises rates again amid inflation fears"),
        @"fed raises rates amid inflation fears"
    );
    insta::assert_snapshot!(
        joined(&normalizer, "Markets react to Fed rate hike"),
        @"markets react fed rate hike"
    );
    insta::assert_snapshot!(
        joined(&normalizer, "Inflation fears grip global markets"),
        @"inflation fears grip global markets"
    );
}

#[test]
fn test_punctuation_and_case() {
    let normalizer = Normalizer::default();
    insta::assert_snapshot!(
        joined(&normalizer, "BREAKING: G20 summit opens in São Paulo -- leaders meet (2024)"),
        @"g20 summit opens paulo leaders meet 2024"
    );
}

#[test]
fn test_empty_and_stopword_only_input() {
    let normalizer = Normalizer::default();
    assert!(normalizer.tokenize("").is_empty());
    assert!(normalizer.tokenize("   \n\t ").is_empty());
    assert!(
        normalizer
            .tokenize("The news, according to sources, said this")
            .is_empty()
    );
}

#[test]
fn test_custom_stopwords() {
    let stopwords: HashSet<String> = ["fed".to_owned()].into_iter().collect();
    let normalizer = Normalizer::new(stopwords);
    assert_eq!(
        normalizer.tokenize("Fed raises rates again"),
        ["raises", "rates", "again"]
    );
    assert!(normalizer.stopwords().contains("fed"));
}

#[test]
fn test_default_stopwords_are_lowercase() {
    for word in DEFAULT_STOPWORDS {
        assert_eq!(*word, word.to_lowercase());
    }
    assert!(Normalizer::default().stopwords().contains("exclusive"));
}
