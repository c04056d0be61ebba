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

use std::fs;

use googletest::assert_that;
use googletest::prelude::contains_substring;
use trendsketch::config::TrendConfig;
use trendsketch::error::ErrorKind;
use trendsketch::sink::JsonFileSink;
use trendsketch::sink::LogSink;
use trendsketch::sink::MemorySink;
use trendsketch::sink::TrendSink;
use trendsketch::trending::TrendingAggregator;
use trendsketch::trending::TrendingResult;

fn trending(texts: &[&str]) -> TrendingResult {
    let config = TrendConfig::builder().top_k(3).build().unwrap();
    let mut aggregator = TrendingAggregator::new(config);
    for text in texts {
        aggregator.ingest(text);
    }
    aggregator.current()
}

#[test]
fn test_json_file_sink_writes_ranked_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trending.json");
    let mut sink = JsonFileSink::new(&path);
    assert_eq!(sink.path(), path);

    sink.publish(&trending(&["alpha alpha alpha beta"])).unwrap();
    insta::assert_snapshot!(fs::read_to_string(&path).unwrap(), @r#"{"alpha":0.75,"beta":0.25}"#);

    sink.publish(&trending(&["gamma"])).unwrap();
    insta::assert_snapshot!(fs::read_to_string(&path).unwrap(), @r#"{"gamma":1.0}"#);

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, ["trending.json"]);
}

#[test]
fn test_json_file_sink_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trending.json");
    JsonFileSink::new(&path)
        .publish(&TrendingResult::default())
        .unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}

#[test]
fn test_json_file_sink_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("trending.json");
    let err = JsonFileSink::new(&path)
        .publish(&trending(&["alpha"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SinkFailure);
    assert_that!(err.message(), contains_substring("failed to write trending words"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_json_file_sink_failure_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trending.json");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep"), "occupied").unwrap();

    let err = JsonFileSink::new(&path)
        .publish(&trending(&["alpha"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SinkFailure);

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, ["trending.json"]);
}

#[test]
fn test_memory_sink_keeps_history() {
    let mut sink = MemorySink::default();
    assert!(sink.latest().is_none());
    sink.publish(&trending(&["alpha"])).unwrap();
    sink.publish(&trending(&["beta"])).unwrap();
    assert_eq!(sink.published().len(), 2);
    assert_eq!(sink.latest().unwrap().words().collect::<Vec<_>>(), ["beta"]);
}

#[test]
fn test_log_sink_never_fails() {
    let mut sink = LogSink;
    sink.publish(&trending(&["alpha beta"])).unwrap();
    sink.publish(&TrendingResult::default()).unwrap();
}
