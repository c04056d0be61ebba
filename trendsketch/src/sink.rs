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

//! Sinks that receive every published trending result.
//!
//! A sink owns its storage format and durability. Failures are reported as
//! [`ErrorKind::SinkFailure`]; the pipeline logs them and keeps going, since the
//! next document produces a fresher result anyway.
//!
//! [`ErrorKind::SinkFailure`]: crate::error::ErrorKind::SinkFailure

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::error::Error;
use crate::trending::TrendingResult;

/// Receives the ranked result once per processed document.
pub trait TrendSink {
    /// Publishes `ranked`.
    fn publish(&mut self, ranked: &TrendingResult) -> Result<(), Error>;
}

impl<S: TrendSink + ?Sized> TrendSink for Box<S> {
    fn publish(&mut self, ranked: &TrendingResult) -> Result<(), Error> {
        (**self).publish(ranked)
    }
}

impl<S: TrendSink + ?Sized> TrendSink for &mut S {
    fn publish(&mut self, ranked: &TrendingResult) -> Result<(), Error> {
        (**self).publish(ranked)
    }
}

/// Writes each result to a JSON file as a `{word: probability}` object.
///
/// The file is replaced atomically: the result is written to a temporary file in
/// the target's directory which is then renamed over the target, so readers never
/// see a partial file. The temporary file is removed if any step fails.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Creates a sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the target path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl TrendSink for JsonFileSink {
    fn publish(&mut self, ranked: &TrendingResult) -> Result<(), Error> {
        let bytes = serde_json::to_vec(ranked).map_err(|err| {
            Error::sink_failure("failed to encode trending words").set_source(err)
        })?;

        let write = || -> std::io::Result<()> {
            let mut file = NamedTempFile::new_in(self.dir())?;
            file.write_all(&bytes)?;
            file.as_file().sync_all()?;
            file.persist(&self.path)?;
            Ok(())
        };
        write().map_err(|err| {
            Error::sink_failure("failed to write trending words")
                .with_context("path", self.path.display())
                .set_source(err)
        })
    }
}

/// Logs each result at `info` level, one line per ranked word.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TrendSink for LogSink {
    fn publish(&mut self, ranked: &TrendingResult) -> Result<(), Error> {
        tracing::info!(words = ranked.len(), "top trending words");
        for (rank, word) in ranked.iter().enumerate() {
            tracing::info!(
                rank = rank + 1,
                word = word.word(),
                estimate = word.estimate(),
                probability = word.probability(),
                "trending word"
            );
        }
        Ok(())
    }
}

/// Keeps every published result in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    published: Vec<TrendingResult>,
}

impl MemorySink {
    /// Returns all published results, oldest first.
    pub fn published(&self) -> &[TrendingResult] {
        &self.published
    }

    /// Returns the most recent result.
    pub fn latest(&self) -> Option<&TrendingResult> {
        self.published.last()
    }
}

impl TrendSink for MemorySink {
    fn publish(&mut self, ranked: &TrendingResult) -> Result<(), Error> {
        self.published.push(ranked.clone());
        Ok(())
    }
}
